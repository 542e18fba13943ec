//! Repositories wrapping database access for each entity.

pub mod follow;
pub mod user;

pub use follow::{FollowAction, FollowRepository, FollowerEntry, FollowingEntry};
pub use user::UserRepository;
