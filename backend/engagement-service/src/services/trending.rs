/// Trending service - the three ranked views over the post store
///
/// by-likes and by-comments order in SQL; by-engagement scores a bounded
/// candidate window in Rust with a single `now` captured per request, so
/// every candidate decays against the same clock.
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::EngagementCache;
use crate::config::TrendingConfig;
use crate::db::post_repo;
use crate::error::Result;
use crate::metrics::engagement::{TRENDING_REQUEST_DURATION_SECONDS, TRENDING_REQUEST_TOTAL};
use crate::models::{PostWithAuthor, TrendingPost};

pub struct TrendingService {
    pool: PgPool,
    cache: Option<Arc<EngagementCache>>,
    config: TrendingConfig,
}

impl TrendingService {
    pub fn new(pool: PgPool, config: TrendingConfig) -> Self {
        Self {
            pool,
            cache: None,
            config,
        }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<EngagementCache>, config: TrendingConfig) -> Self {
        Self {
            pool,
            cache: Some(cache),
            config,
        }
    }

    /// Most-liked posts, like count descending.
    pub async fn top_by_likes(&self) -> Result<Vec<TrendingPost>> {
        TRENDING_REQUEST_TOTAL.with_label_values(&["likes"]).inc();
        let timer = TRENDING_REQUEST_DURATION_SECONDS
            .with_label_values(&["likes"])
            .start_timer();

        if let Some(list) = self.read_cached("likes").await {
            timer.observe_duration();
            return Ok(list);
        }

        let rows = post_repo::top_posts_by_likes(&self.pool, self.config.result_limit).await?;
        let list: Vec<TrendingPost> = rows.into_iter().map(TrendingPost::from).collect();

        self.write_cached("likes", &list).await;
        timer.observe_duration();
        Ok(list)
    }

    /// Most-discussed posts, comment count descending.
    pub async fn top_by_comments(&self) -> Result<Vec<TrendingPost>> {
        TRENDING_REQUEST_TOTAL
            .with_label_values(&["comments"])
            .inc();
        let timer = TRENDING_REQUEST_DURATION_SECONDS
            .with_label_values(&["comments"])
            .start_timer();

        if let Some(list) = self.read_cached("comments").await {
            timer.observe_duration();
            return Ok(list);
        }

        let rows = post_repo::top_posts_by_comments(&self.pool, self.config.result_limit).await?;
        let list: Vec<TrendingPost> = rows.into_iter().map(TrendingPost::from).collect();

        self.write_cached("comments", &list).await;
        timer.observe_duration();
        Ok(list)
    }

    /// Top posts by time-decayed engagement score.
    pub async fn top_by_engagement(&self) -> Result<Vec<TrendingPost>> {
        TRENDING_REQUEST_TOTAL
            .with_label_values(&["engagement"])
            .inc();
        let timer = TRENDING_REQUEST_DURATION_SECONDS
            .with_label_values(&["engagement"])
            .start_timer();

        if let Some(list) = self.read_cached("engagement").await {
            timer.observe_duration();
            return Ok(list);
        }

        let candidates =
            post_repo::recent_posts_with_authors(&self.pool, self.config.max_candidates).await?;
        let list = rank_by_engagement(candidates, Utc::now(), &self.config);

        self.write_cached("engagement", &list).await;
        timer.observe_duration();
        Ok(list)
    }

    async fn read_cached(&self, strategy: &str) -> Option<Vec<TrendingPost>> {
        let cache = self.cache.as_ref()?;
        match cache.read_trending(strategy).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::debug!(%strategy, "trending cache read failed: {}", err);
                None
            }
        }
    }

    async fn write_cached(&self, strategy: &str, list: &[TrendingPost]) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.write_trending(strategy, list).await {
                tracing::debug!(%strategy, "trending cache write failed: {}", err);
            }
        }
    }
}

/// Weighted engagement rate with hyperbolic time decay.
///
/// The `+ 1.0` keeps the denominator finite for posts created in the same
/// instant as the query and gives recency its dominant early boost.
pub fn engagement_score(
    like_count: i64,
    comment_count: i64,
    hours_since_posted: f64,
    config: &TrendingConfig,
) -> f64 {
    (config.like_weight * like_count as f64 + config.comment_weight * comment_count as f64)
        / (hours_since_posted + 1.0)
}

/// Score candidates against one shared `now`, sort score descending with the
/// stable (created_at, id) tie-break, and truncate to the result limit.
pub fn rank_by_engagement(
    candidates: Vec<PostWithAuthor>,
    now: DateTime<Utc>,
    config: &TrendingConfig,
) -> Vec<TrendingPost> {
    let mut ranked: Vec<TrendingPost> = candidates
        .into_iter()
        .map(|row| {
            let hours_since_posted =
                ((now - row.created_at).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
            let score = engagement_score(
                row.like_count,
                row.comment_count,
                hours_since_posted,
                config,
            );

            let mut post = TrendingPost::from(row);
            post.engagement_score = Some(score);
            post
        })
        .collect();

    ranked.sort_by(|a, b| {
        let score_a = a.engagement_score.unwrap_or(0.0);
        let score_b = b.engagement_score.unwrap_or(0.0);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });

    ranked.truncate(config.result_limit as usize);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn candidate(
        likes: i64,
        comments: i64,
        created_at: DateTime<Utc>,
    ) -> PostWithAuthor {
        PostWithAuthor {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "ada".to_string(),
            content: "hello".to_string(),
            like_count: likes,
            comment_count: comments,
            created_at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn score_weights_match_ranking_constants() {
        let config = TrendingConfig::default();
        // Fresh post: denominator is exactly 1.
        assert_eq!(engagement_score(10, 5, 0.0, &config), 8.0);
        // One hour old: halves.
        assert_eq!(engagement_score(10, 5, 1.0, &config), 4.0);
    }

    #[test]
    fn fresher_post_scores_strictly_higher_at_equal_counts() {
        let config = TrendingConfig::default();
        let newer = engagement_score(7, 3, 2.0, &config);
        let older = engagement_score(7, 3, 2.5, &config);
        assert!(newer > older);
    }

    #[test]
    fn zero_engagement_scores_zero_regardless_of_age() {
        let config = TrendingConfig::default();
        assert_eq!(engagement_score(0, 0, 0.0, &config), 0.0);
        assert_eq!(engagement_score(0, 0, 100.0, &config), 0.0);
    }

    #[test]
    fn ranks_decayed_heavyweight_below_fresh_mover() {
        let config = TrendingConfig::default();
        let t = now();

        // 100 likes, two days old: 60 / 49 ≈ 1.22
        let old_heavy = candidate(100, 0, t - Duration::hours(48));
        // 10 likes, one hour old: 6 / 2 = 3.0
        let fresh_mover = candidate(10, 0, t - Duration::hours(1));

        let ranked = rank_by_engagement(vec![old_heavy.clone(), fresh_mover.clone()], t, &config);
        assert_eq!(ranked[0].id, fresh_mover.id);
        assert_eq!(ranked[1].id, old_heavy.id);
    }

    #[test]
    fn equal_scores_tie_break_newest_first() {
        let config = TrendingConfig::default();
        let t = now();

        // Identical counts and identical age → identical score.
        let at = t - Duration::hours(3);
        let a = candidate(4, 2, at);
        let b = candidate(4, 2, at - Duration::hours(1));

        let ranked = rank_by_engagement(vec![a.clone(), b.clone()], t, &config);
        // b is older, so it decays more and sorts second even before the
        // timestamp tie-break; shift b to the same instant to force the tie.
        assert_eq!(ranked[0].id, a.id);

        let c = candidate(4, 2, at);
        let d = candidate(4, 2, at);
        let ranked = rank_by_engagement(vec![c.clone(), d.clone()], t, &config);
        let expected_first = if c.id > d.id { c.id } else { d.id };
        assert_eq!(ranked[0].id, expected_first);
    }

    #[test]
    fn truncates_to_result_limit() {
        let config = TrendingConfig::default();
        let t = now();
        let candidates: Vec<_> = (0..25)
            .map(|i| candidate(i, 0, t - Duration::minutes(i)))
            .collect();

        let ranked = rank_by_engagement(candidates, t, &config);
        assert_eq!(ranked.len(), config.result_limit as usize);
    }

    #[test]
    fn every_ranked_post_carries_its_score() {
        let config = TrendingConfig::default();
        let t = now();
        let ranked = rank_by_engagement(vec![candidate(1, 1, t)], t, &config);
        assert!(ranked[0].engagement_score.is_some());
    }

    #[test]
    fn empty_candidates_rank_empty() {
        let config = TrendingConfig::default();
        assert!(rank_by_engagement(Vec::new(), now(), &config).is_empty());
    }
}
