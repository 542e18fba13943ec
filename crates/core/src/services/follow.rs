//! Follow service.

use follows_common::{AppError, AppResult};
use follows_db::repositories::{
    FollowAction, FollowRepository, FollowerEntry, FollowingEntry, UserRepository,
};

const TOGGLE_MISSING_TARGET: &str = "팔로우하려는 유저를 지정해주세요.";
const TOGGLE_TARGET_NOT_FOUND: &str = "존재하지 않는 유저입니다.";
const CANNOT_FOLLOW_SELF: &str = "스스로를 팔로우할 수는 없습니다.";
const LIST_MISSING_USER: &str = "userId는 필수로 입력되어야합니다.";
const LIST_USER_NOT_FOUND: &str = "해당 유저를 찾을 수 없습니다.";
const INVALID_USER_ID: &str = "userId는 양의 정수여야 합니다.";

/// Result of a toggle-follow request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResult {
    /// Whether the edge was created or removed.
    pub action: FollowAction,
    /// Nickname of the user that was (un)followed.
    pub target_nickname: String,
}

impl ToggleResult {
    /// Human readable message describing what happened.
    #[must_use]
    pub fn message(&self) -> String {
        match self.action {
            FollowAction::Followed => format!("{}님을 팔로우하였습니다.", self.target_nickname),
            FollowAction::Unfollowed => format!("{}님을 언팔로우했습니다.", self.target_nickname),
        }
    }
}

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    /// Follow `target` if `actor_id` does not follow them yet, otherwise unfollow.
    ///
    /// `target` is the raw path parameter. Validation happens before any write.
    pub async fn toggle_follow(&self, actor_id: i32, target: &str) -> AppResult<ToggleResult> {
        let target_id = parse_user_id(target, TOGGLE_MISSING_TARGET)?;

        let target_user = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(TOGGLE_TARGET_NOT_FOUND.to_string()))?;

        if actor_id == target_id {
            return Err(AppError::InvalidOperation(CANNOT_FOLLOW_SELF.to_string()));
        }

        let action = self.follow_repo.toggle(actor_id, target_id).await?;

        match action {
            FollowAction::Followed => {
                tracing::info!(follower_id = actor_id, following_id = target_id, "Followed user");
            }
            FollowAction::Unfollowed => {
                tracing::info!(follower_id = actor_id, following_id = target_id, "Unfollowed user");
            }
        }

        Ok(ToggleResult {
            action,
            target_nickname: target_user.nickname,
        })
    }

    /// Users that `user` follows, most recently followed first.
    pub async fn list_following(&self, user: &str) -> AppResult<Vec<FollowingEntry>> {
        let user_id = self.resolve_listed_user(user).await?;
        self.follow_repo.list_following(user_id).await
    }

    /// Users that follow `user`, most recent follower first.
    pub async fn list_followers(&self, user: &str) -> AppResult<Vec<FollowerEntry>> {
        let user_id = self.resolve_listed_user(user).await?;
        self.follow_repo.list_followers(user_id).await
    }

    async fn resolve_listed_user(&self, user: &str) -> AppResult<i32> {
        let user_id = parse_user_id(user, LIST_MISSING_USER)?;

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound(LIST_USER_NOT_FOUND.to_string()));
        }

        Ok(user_id)
    }
}

/// Parse a user id path parameter.
///
/// Empty input is a missing parameter; anything other than a positive
/// integer is invalid.
fn parse_user_id(raw: &str, missing_message: &str) -> AppResult<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::MissingParameter(missing_message.to_string()));
    }

    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidParameter(INVALID_USER_ID.to_string()))
}
