//! Follow endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use follows_common::AppResult;
use follows_core::{FollowAction, FollowerEntry, FollowingEntry};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Following list item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingItemResponse {
    pub following_id: i32,
    pub nickname: String,
}

impl From<FollowingEntry> for FollowingItemResponse {
    fn from(entry: FollowingEntry) -> Self {
        Self {
            following_id: entry.following_id,
            nickname: entry.nickname,
        }
    }
}

/// Follower list item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerItemResponse {
    pub follower_id: i32,
    pub nickname: String,
}

impl From<FollowerEntry> for FollowerItemResponse {
    fn from(entry: FollowerEntry) -> Self {
        Self {
            follower_id: entry.follower_id,
            nickname: entry.nickname,
        }
    }
}

/// Follow the user, or unfollow them if already following.
async fn toggle_follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let result = state
        .follow_service
        .toggle_follow(user.user_id, &user_id)
        .await?;

    let status = match result.action {
        FollowAction::Followed => StatusCode::CREATED,
        FollowAction::Unfollowed => StatusCode::OK,
    };

    Ok(ApiResponse::message(status, result.message()))
}

/// List the users a user follows.
async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<FollowingItemResponse>>> {
    let entries = state.follow_service.list_following(&user_id).await?;

    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

/// List the users following a user.
async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<FollowerItemResponse>>> {
    let entries = state.follow_service.list_followers(&user_id).await?;

    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

/// Create the follow router, nested under `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}/follows", post(toggle_follow))
        .route("/{user_id}/following", get(following))
        .route("/{user_id}/follower", get(followers))
}
