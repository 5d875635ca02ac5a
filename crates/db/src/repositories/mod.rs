//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod assistant_repo;
pub mod bookmark_repo;
pub mod discussion_repo;
pub mod milestone_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod session_repo;
pub mod user_repo;

pub use assistant_repo::AssistantRepo;
pub use bookmark_repo::BookmarkRepo;
pub use discussion_repo::DiscussionRepo;
pub use milestone_repo::{DueMilestone, MilestoneRepo};
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
