use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::db::DbConnection;
use crate::domain::models::catalog::{NewSavedMeal, SavedMeal};
use crate::storage::traits::SavedMealStorage;

/// Storage for named favorites. A saved meal and its item links are written
/// in one transaction.
#[derive(Clone)]
pub struct SavedMealRepository {
    db: DbConnection,
}

impl SavedMealRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn get_item_ids(&self, saved_meal_id: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT item_id FROM saved_meal_items WHERE saved_meal_id = ? ORDER BY item_id",
        )
        .bind(saved_meal_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|r| r.get("item_id")).collect())
    }
}

#[async_trait]
impl SavedMealStorage for SavedMealRepository {
    async fn create_saved_meal(&self, saved_meal: &NewSavedMeal) -> Result<i64> {
        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query(
            "INSERT INTO saved_meals (parent_id, child_id, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(saved_meal.parent_id)
        .bind(saved_meal.child_id)
        .bind(&saved_meal.name)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        let saved_meal_id = result.last_insert_rowid();

        for item_id in &saved_meal.item_ids {
            sqlx::query("INSERT INTO saved_meal_items (saved_meal_id, item_id) VALUES (?, ?)")
                .bind(saved_meal_id)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(saved_meal_id)
    }

    async fn get_saved_meal(&self, saved_meal_id: i64) -> Result<Option<SavedMeal>> {
        let row = sqlx::query(
            "SELECT saved_meal_id, parent_id, child_id, name FROM saved_meals WHERE saved_meal_id = ?",
        )
        .bind(saved_meal_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_ids = self.get_item_ids(saved_meal_id).await?;

        Ok(Some(SavedMeal {
            saved_meal_id: row.get("saved_meal_id"),
            parent_id: row.get("parent_id"),
            child_id: row.get("child_id"),
            name: row.get("name"),
            item_ids,
        }))
    }

    async fn list_saved_meals(&self, parent_id: i64) -> Result<Vec<SavedMeal>> {
        let rows = sqlx::query(
            r#"
            SELECT saved_meal_id, parent_id, child_id, name
            FROM saved_meals WHERE parent_id = ?
            ORDER BY created_at DESC, saved_meal_id DESC
            "#,
        )
        .bind(parent_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut saved_meals = Vec::with_capacity(rows.len());
        for row in rows {
            let saved_meal_id: i64 = row.get("saved_meal_id");
            saved_meals.push(SavedMeal {
                saved_meal_id,
                parent_id: row.get("parent_id"),
                child_id: row.get("child_id"),
                name: row.get("name"),
                item_ids: self.get_item_ids(saved_meal_id).await?,
            });
        }

        Ok(saved_meals)
    }

    async fn delete_saved_meal(&self, saved_meal_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_meals WHERE saved_meal_id = ?")
            .bind(saved_meal_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::test_support::TestContext;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_and_list_saved_meals() {
        let ctx = TestContext::new().await;
        let parent_id = ctx.seed_parent(10, "Dana").await;
        let child_id = ctx.seed_child(parent_id, "Riley").await;
        let apple = ctx.seed_item("Apple", dec!(1.00)).await;
        let juice = ctx.seed_item("Juice Box", dec!(1.50)).await;

        let repo = SavedMealRepository::new(ctx.db.clone());
        let id = repo
            .create_saved_meal(&NewSavedMeal {
                parent_id,
                child_id,
                name: "Riley's usual".to_string(),
                item_ids: vec![apple, juice],
            })
            .await
            .unwrap();

        let meal = repo.get_saved_meal(id).await.unwrap().unwrap();
        assert_eq!(meal.name, "Riley's usual");
        assert_eq!(meal.item_ids, vec![apple, juice]);

        let listed = repo.list_saved_meals(parent_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].saved_meal_id, id);

        // Other parents see nothing
        assert!(repo.list_saved_meals(parent_id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_item_rolls_back() {
        let ctx = TestContext::new().await;
        let parent_id = ctx.seed_parent(10, "Dana").await;
        let child_id = ctx.seed_child(parent_id, "Riley").await;

        let repo = SavedMealRepository::new(ctx.db.clone());
        let result = repo
            .create_saved_meal(&NewSavedMeal {
                parent_id,
                child_id,
                name: "Broken".to_string(),
                item_ids: vec![9999],
            })
            .await;

        assert!(result.is_err());
        assert!(repo.list_saved_meals(parent_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_saved_meal() {
        let ctx = TestContext::new().await;
        let parent_id = ctx.seed_parent(10, "Dana").await;
        let child_id = ctx.seed_child(parent_id, "Riley").await;
        let apple = ctx.seed_item("Apple", dec!(1.00)).await;

        let repo = SavedMealRepository::new(ctx.db.clone());
        let id = repo
            .create_saved_meal(&NewSavedMeal {
                parent_id,
                child_id,
                name: "To remove".to_string(),
                item_ids: vec![apple],
            })
            .await
            .unwrap();

        assert!(repo.delete_saved_meal(id).await.unwrap());
        assert!(repo.get_saved_meal(id).await.unwrap().is_none());
        assert!(!repo.delete_saved_meal(id).await.unwrap());
    }
}
