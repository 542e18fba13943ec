//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow, user};
use follows_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    Statement, TransactionTrait, sea_query::OnConflict,
};

/// Outcome of toggling a follow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    /// A new edge was created.
    Followed,
    /// The existing edge was removed.
    Unfollowed,
}

/// A user someone follows, with the followed user's nickname.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct FollowingEntry {
    /// The followed user
    pub following_id: i32,
    /// The followed user's nickname
    pub nickname: String,
}

/// A follower of someone, with the follower's nickname.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct FollowerEntry {
    /// The follower
    pub follower_id: i32,
    /// The follower's nickname
    pub nickname: String,
}

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the edge for a (follower, following) pair.
    pub async fn find_by_pair(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Follow if the edge is absent, unfollow if it is present.
    ///
    /// Runs in a single transaction holding an advisory lock on the pair, so
    /// toggles of the same pair are serialized. The insert is conditional on
    /// the unique `(follower_id, following_id)` index; when it does not take
    /// effect the edge already exists and is deleted instead.
    pub async fn toggle(&self, follower_id: i32, following_id: i32) -> AppResult<FollowAction> {
        self.toggle_in_transaction(follower_id, following_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn toggle_in_transaction(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<FollowAction, DbErr> {
        let txn = self.db.begin().await?;

        txn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_advisory_xact_lock($1, $2)",
            [follower_id.into(), following_id.into()],
        ))
        .await?;

        let inserted = Follow::insert(follow::ActiveModel {
            follower_id: Set(follower_id),
            following_id: Set(following_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([follow::Column::FollowerId, follow::Column::FollowingId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        let action = if inserted > 0 {
            FollowAction::Followed
        } else {
            let deleted = Follow::delete_many()
                .filter(follow::Column::FollowerId.eq(follower_id))
                .filter(follow::Column::FollowingId.eq(following_id))
                .exec(&txn)
                .await?;

            // Only a cascading user delete can remove the edge under the lock.
            if deleted.rows_affected == 0 {
                tracing::warn!(follower_id, following_id, "Conflicting follow edge vanished");
                return Err(DbErr::RecordNotUpdated);
            }
            FollowAction::Unfollowed
        };

        txn.commit().await?;
        Ok(action)
    }

    /// Users that `user_id` follows, most recent edge first.
    pub async fn list_following(&self, user_id: i32) -> AppResult<Vec<FollowingEntry>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowingId)
            .column_as(user::Column::Nickname, "nickname")
            .join(JoinType::InnerJoin, follow::Relation::Following.def())
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::FollowId)
            .into_model::<FollowingEntry>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Users following `user_id`, most recent edge first.
    pub async fn list_followers(&self, user_id: i32) -> AppResult<Vec<FollowerEntry>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .column_as(user::Column::Nickname, "nickname")
            .join(JoinType::InnerJoin, follow::Relation::Follower.def())
            .filter(follow::Column::FollowingId.eq(user_id))
            .order_by_desc(follow::Column::FollowId)
            .into_model::<FollowerEntry>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn create_test_follow(id: i32, follower_id: i32, following_id: i32) -> follow::Model {
        follow::Model {
            follow_id: id,
            follower_id,
            following_id,
            created_at: Utc::now().into(),
        }
    }

    const fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_follow(1, 1, 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_pair(1, 2).await.unwrap();

        assert_eq!(result, Some(edge));
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_pair(1, 3).await.unwrap();

        assert!(result.is_none());
    }

    /// SQL sent to the mock, without transaction control statements.
    fn statements(db: Arc<DatabaseConnection>) -> Vec<String> {
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .filter(|sql| !matches!(sql.as_str(), "BEGIN" | "COMMIT" | "ROLLBACK"))
            .collect()
    }

    #[tokio::test]
    async fn test_toggle_creates_missing_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );

        let repo = FollowRepository::new(Arc::clone(&db));
        let action = repo.toggle(1, 2).await.unwrap();
        drop(repo);

        assert_eq!(action, FollowAction::Followed);

        let sql = statements(db);
        assert!(sql[0].contains("pg_advisory_xact_lock"));
        assert!(sql[1].starts_with(r#"INSERT INTO "follows""#));
        assert!(sql[1].contains("ON CONFLICT"));
        assert!(sql.iter().all(|s| !s.starts_with("DELETE")));
    }

    #[tokio::test]
    async fn test_toggle_removes_existing_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0), exec(1)])
                .into_connection(),
        );

        let repo = FollowRepository::new(Arc::clone(&db));
        let action = repo.toggle(1, 2).await.unwrap();
        drop(repo);

        assert_eq!(action, FollowAction::Unfollowed);

        let sql = statements(db);
        assert!(sql[0].contains("pg_advisory_xact_lock"));
        assert!(sql[2].starts_with(r#"DELETE FROM "follows""#));
    }

    #[tokio::test]
    async fn test_toggle_fails_when_nothing_changes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0), exec(0)])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.toggle(1, 2).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_toggle_maps_database_errors() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_errors([DbErr::Custom("insert failed".to_string())])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.toggle(1, 2).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_following_projects_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "following_id" => Value::Int(Some(4)),
                        "nickname" => Value::from("dora"),
                    },
                    maplit::btreemap! {
                        "following_id" => Value::Int(Some(3)),
                        "nickname" => Value::from("carol"),
                    },
                ]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.list_following(1).await.unwrap();

        assert_eq!(
            result,
            vec![
                FollowingEntry {
                    following_id: 4,
                    nickname: "dora".to_string(),
                },
                FollowingEntry {
                    following_id: 3,
                    nickname: "carol".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_following_joins_followed_user_newest_first() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(Arc::clone(&db));
        repo.list_following(1).await.unwrap();
        drop(repo);

        let sql = statements(db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains(
            r#"INNER JOIN "users" ON "follows"."following_id" = "users"."user_id""#
        ));
        assert!(sql[0].contains(r#"WHERE "follows"."follower_id" = $1"#));
        assert!(sql[0].contains(r#"ORDER BY "follows"."follow_id" DESC"#));
    }

    #[tokio::test]
    async fn test_list_followers_joins_follower_newest_first() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(Arc::clone(&db));
        repo.list_followers(1).await.unwrap();
        drop(repo);

        let sql = statements(db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains(
            r#"INNER JOIN "users" ON "follows"."follower_id" = "users"."user_id""#
        ));
        assert!(sql[0].contains(r#"WHERE "follows"."following_id" = $1"#));
        assert!(sql[0].contains(r#"ORDER BY "follows"."follow_id" DESC"#));
    }

    #[tokio::test]
    async fn test_list_followers_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.list_followers(1).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_followers_projects_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "follower_id" => Value::Int(Some(9)),
                    "nickname" => Value::from("ivan"),
                }]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.list_followers(1).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].follower_id, 9);
        assert_eq!(result[0].nickname, "ivan");
    }
}
