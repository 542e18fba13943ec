//! Follow entity (follow edges between users).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    /// Assigned by the database; newer edges have larger ids
    #[sea_orm(primary_key)]
    pub follow_id: i32,

    /// The user who is following
    pub follower_id: i32,

    /// The user being followed
    pub following_id: i32,

    /// Set by the database on insert
    pub created_at: DateTimeWithTimeZone,
}

/// The two users an edge connects.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The user who follows.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowerId",
        to = "super::user::Column::UserId",
        on_delete = "Cascade"
    )]
    Follower,

    /// The user being followed.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FollowingId",
        to = "super::user::Column::UserId",
        on_delete = "Cascade"
    )]
    Following,
}

impl ActiveModelBehavior for ActiveModel {}
