//! Business logic services.

pub mod auth;
pub mod follow;

pub use auth::{AuthService, Claims};
pub use follow::{FollowService, ToggleResult};
pub use follows_db::repositories::{FollowAction, FollowerEntry, FollowingEntry};
