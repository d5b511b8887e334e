use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use super::db::DbConnection;
use crate::domain::models::family::{Child, Parent};
use crate::storage::traits::FamilyStorage;

/// Parent/child graph lookups over the `parents` and `children` tables.
#[derive(Clone)]
pub struct FamilyRepository {
    db: DbConnection,
}

impl FamilyRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FamilyStorage for FamilyRepository {
    async fn get_parent_by_user(&self, user_id: i64) -> Result<Option<Parent>> {
        let row = sqlx::query("SELECT parent_id, user_id, name FROM parents WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| Parent {
            parent_id: r.get("parent_id"),
            user_id: r.get("user_id"),
            name: r.get("name"),
        }))
    }

    async fn get_child(&self, child_id: i64) -> Result<Option<Child>> {
        let row = sqlx::query("SELECT child_id, parent_id, name FROM children WHERE child_id = ?")
            .bind(child_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| Child {
            child_id: r.get("child_id"),
            parent_id: r.get("parent_id"),
            name: r.get("name"),
        }))
    }
}
