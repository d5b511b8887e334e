use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use super::db::DbConnection;
use super::parse_decimal;
use crate::domain::models::catalog::{Item, PreMadeMeal};
use crate::domain::models::custom_meal::Nutrition;
use crate::storage::traits::CatalogStorage;

/// Catalog lookups over the `items`, `item_allergies` and `premade_meals`
/// tables. Allergy tags are resolved here so the domain sees plain strings.
#[derive(Clone)]
pub struct CatalogRepository {
    db: DbConnection,
}

impl CatalogRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn get_item_allergies(&self, item_id: i64) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT allergy FROM item_allergies WHERE item_id = ? ORDER BY allergy",
        )
        .bind(item_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|r| r.get("allergy")).collect())
    }
}

#[async_trait]
impl CatalogStorage for CatalogRepository {
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT item_id, name, category, unit_price, description,
                   calories, protein_g, carbs_g, fat_g
            FROM items WHERE item_id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let allergies = self.get_item_allergies(item_id).await?;
        let calories: i64 = row.get("calories");

        Ok(Some(Item {
            item_id: row.get("item_id"),
            name: row.get("name"),
            category: row.get("category"),
            unit_price: parse_decimal(row.get("unit_price"), "items.unit_price")?,
            description: row.get("description"),
            nutrition: Nutrition {
                calories: u32::try_from(calories).unwrap_or(0),
                protein_g: parse_decimal(row.get("protein_g"), "items.protein_g")?,
                carbs_g: parse_decimal(row.get("carbs_g"), "items.carbs_g")?,
                fat_g: parse_decimal(row.get("fat_g"), "items.fat_g")?,
            },
            allergies,
        }))
    }

    async fn get_meal(&self, meal_id: i64) -> Result<Option<PreMadeMeal>> {
        let row = sqlx::query(
            "SELECT meal_id, name, description, image_url, fixed_price FROM premade_meals WHERE meal_id = ?",
        )
        .bind(meal_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(PreMadeMeal {
                meal_id: row.get("meal_id"),
                name: row.get("name"),
                description: row.get("description"),
                image_url: row.get("image_url"),
                fixed_price: parse_decimal(row.get("fixed_price"), "premade_meals.fixed_price")?,
            })),
            None => Ok(None),
        }
    }
}
