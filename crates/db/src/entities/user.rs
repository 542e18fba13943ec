//! User entity.
//!
//! Users are managed elsewhere; follows-rs only reads their id and nickname.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Numeric user id, exposed as `userId`
    #[sea_orm(primary_key)]
    pub user_id: i32,

    /// Display name shown in follow messages and lists
    pub nickname: String,

    /// Set by the database on insert
    pub created_at: DateTimeWithTimeZone,
}

/// Users have no outgoing relations; follow edges point at them.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
