/// HTTP handlers for engagement endpoints
///
/// This module contains handlers for:
/// - Posts: create, read, delete posts and list a user's posts
/// - Feed: paginated global feed
/// - Reactions: like toggle and like-status reads
/// - Comments: create and list comments
/// - Trending: the three ranked trending views
pub mod comments;
pub mod feed;
pub mod posts;
pub mod reactions;
pub mod trending;

// Re-export handler functions at module level
pub use comments::{create_comment, list_comments};
pub use feed::get_feed;
pub use posts::{create_post, delete_post, get_post, get_user_posts};
pub use reactions::{like_status, toggle_like};
pub use trending::{trending_comments, trending_engagement, trending_likes};
