/// Feed service - assembles chronological feed pages and owns the
/// accumulator that feed consumers merge pages into.
///
/// Offset pagination under concurrent writes can produce boundary duplicates
/// (or, rarely, skipped items) when posts are created between page fetches;
/// the accumulator's identifier set-difference merge absorbs the duplicates.
use crate::error::Result;
use crate::metrics::engagement::FEED_REQUEST_TOTAL;
use crate::models::{FeedPage, Pagination, PostView};
use crate::services::PostService;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

pub struct FeedService {
    posts: PostService,
    default_page_size: i64,
}

impl FeedService {
    pub fn new(pool: PgPool, default_page_size: i64) -> Self {
        Self {
            posts: PostService::new(pool),
            default_page_size,
        }
    }

    /// Fetch one feed page. Each page is independently fetchable; callers
    /// paginating a live feed deduplicate with a `FeedAccumulator`.
    pub async fn fetch_page(&self, page: Option<i64>, limit: Option<i64>) -> Result<FeedPage> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(self.default_page_size);

        let (posts, total) = self.posts.get_posts_page(page, limit).await?;

        FEED_REQUEST_TOTAL.with_label_values(&["db"]).inc();

        Ok(build_feed_page(posts, total, page, limit))
    }
}

/// Assemble a page with its pagination metadata. `has_more` is true iff the
/// page came back full; a short page tells the caller to stop.
pub fn build_feed_page(posts: Vec<PostView>, total: i64, page: i64, limit: i64) -> FeedPage {
    let has_more = posts.len() as i64 == limit;
    let pages = if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    };

    FeedPage {
        posts,
        pagination: Pagination {
            total,
            page,
            limit,
            pages,
            has_more,
        },
    }
}

/// Accumulator owned by a feed consumer: the running list of loaded posts,
/// merged by identifier set-difference on each page arrival.
#[derive(Debug, Default)]
pub struct FeedAccumulator {
    seen: HashSet<Uuid>,
    posts: Vec<PostView>,
    has_more: bool,
}

impl FeedAccumulator {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            posts: Vec::new(),
            has_more: true,
        }
    }

    /// Merge an arriving page, dropping posts already seen.
    /// Returns the number of posts actually appended.
    pub fn merge_page(&mut self, page: FeedPage) -> usize {
        self.has_more = page.pagination.has_more;

        let mut appended = 0;
        for post in page.posts {
            if self.seen.insert(post.id) {
                self.posts.push(post);
                appended += 1;
            }
        }
        appended
    }

    /// Whether the consumer should request another page.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn posts(&self) -> &[PostView] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorView;
    use chrono::{Duration, TimeZone, Utc};

    fn test_post(seq: i64) -> PostView {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        PostView {
            id: Uuid::new_v4(),
            content: format!("post {}", seq),
            user: AuthorView {
                id: Uuid::new_v4(),
                username: "ada".to_string(),
            },
            like_count: 0,
            comment_count: 0,
            created_at: base - Duration::minutes(seq),
        }
    }

    #[test]
    fn full_page_has_more() {
        let posts: Vec<_> = (0..15).map(test_post).collect();
        let page = build_feed_page(posts, 23, 1, 15);
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.total, 23);
        assert_eq!(page.pagination.pages, 2);
    }

    #[test]
    fn short_page_stops_pagination() {
        let posts: Vec<_> = (0..8).map(test_post).collect();
        let page = build_feed_page(posts, 23, 2, 15);
        assert!(!page.pagination.has_more);
        assert_eq!(page.posts.len(), 8);
    }

    #[test]
    fn empty_store_has_zero_pages() {
        let page = build_feed_page(Vec::new(), 0, 1, 15);
        assert!(!page.pagination.has_more);
        assert_eq!(page.pagination.pages, 0);
    }

    #[test]
    fn accumulator_walks_23_posts_in_two_pages() {
        let all: Vec<_> = (0..23).map(test_post).collect();

        let mut acc = FeedAccumulator::new();
        assert!(acc.has_more());

        let first = build_feed_page(all[..15].to_vec(), 23, 1, 15);
        assert_eq!(acc.merge_page(first), 15);
        assert!(acc.has_more());

        let second = build_feed_page(all[15..].to_vec(), 23, 2, 15);
        assert_eq!(acc.merge_page(second), 8);
        assert!(!acc.has_more());

        assert_eq!(acc.len(), 23);
        // Ordering preserved: newest-first across page boundaries.
        let times: Vec<_> = acc.posts().iter().map(|p| p.created_at).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(times, sorted);
    }

    #[test]
    fn accumulator_drops_boundary_duplicates() {
        let all: Vec<_> = (0..20).map(test_post).collect();

        let mut acc = FeedAccumulator::new();
        let first = build_feed_page(all[..10].to_vec(), 20, 1, 10);
        assert_eq!(acc.merge_page(first), 10);

        // A post created between fetches shifts the offset window: the second
        // page re-serves the last item of the first page.
        let mut shifted = vec![all[9].clone()];
        shifted.extend_from_slice(&all[10..19]);
        let second = build_feed_page(shifted, 21, 2, 10);
        assert_eq!(acc.merge_page(second), 9);

        assert_eq!(acc.len(), 19);
        let distinct: HashSet<_> = acc.posts().iter().map(|p| p.id).collect();
        assert_eq!(distinct.len(), acc.len());
    }
}
