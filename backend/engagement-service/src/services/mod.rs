/// Business logic layer for engagement-service
///
/// This module provides high-level operations:
/// - Post service: post creation, retrieval, pagination queries
/// - Reaction service: like toggling and like-status reads
/// - Comment service: comment creation and listing
/// - Feed service: feed page assembly and the client-side accumulator
/// - Trending service: the three ranked trending views
/// - Deletion service: cascading post deletion
pub mod comments;
pub mod deletion;
pub mod feed;
pub mod posts;
pub mod reactions;
pub mod trending;

// Re-export commonly used services
pub use comments::CommentService;
pub use deletion::DeletionService;
pub use feed::{FeedAccumulator, FeedService};
pub use posts::PostService;
pub use reactions::ReactionService;
pub use trending::TrendingService;
