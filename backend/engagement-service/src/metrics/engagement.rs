use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Like toggles processed, segmented by outcome (liked/unliked).
    pub static ref TOGGLE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "engagement_toggle_total",
        "Like toggles processed segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register engagement_toggle_total");

    /// Trending requests segmented by strategy (likes/comments/engagement).
    pub static ref TRENDING_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "trending_request_total",
        "Trending requests segmented by ranking strategy",
        &["strategy"]
    )
    .expect("failed to register trending_request_total");

    /// Duration of trending requests by strategy.
    pub static ref TRENDING_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "trending_request_duration_seconds",
        "Trending request duration segmented by ranking strategy",
        &["strategy"]
    )
    .expect("failed to register trending_request_duration_seconds");

    /// Feed page requests segmented by data source (db only today; the label
    /// keeps the taxonomy aligned with the cacheable read paths).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Feed page requests segmented by data source",
        &["source"]
    )
    .expect("failed to register feed_request_total");

    /// Cache events (hit/miss/error) across the engagement cache.
    pub static ref CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "engagement_cache_events_total",
        "Engagement cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register engagement_cache_events_total");
}
