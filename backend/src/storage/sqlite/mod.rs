//! SQLite implementations of the storage traits.
//!
//! Money columns are stored as decimal TEXT and re-parsed on read; nothing in
//! this layer ever goes through floating point.

mod catalog_repository;
mod db;
mod family_repository;
mod order_repository;
mod saved_meal_repository;
mod session_repository;

pub use catalog_repository::CatalogRepository;
pub use db::DbConnection;
pub use family_repository::FamilyRepository;
pub use order_repository::OrderRepository;
pub use saved_meal_repository::SavedMealRepository;
pub use session_repository::SessionRepository;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// Parse a decimal TEXT column, naming the column in the error.
fn parse_decimal(text: String, column: &str) -> Result<Decimal> {
    text.parse::<Decimal>()
        .with_context(|| format!("invalid decimal in {}: {:?}", column, text))
}

#[cfg(test)]
pub mod test_support {
    //! Seeding helpers for tests that need catalog and family fixtures.

    use super::DbConnection;
    use rust_decimal::Decimal;

    pub struct TestContext {
        pub db: DbConnection,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let db = DbConnection::init_test()
                .await
                .expect("Failed to create test database");
            Self { db }
        }

        pub async fn seed_parent(&self, user_id: i64, name: &str) -> i64 {
            sqlx::query("INSERT INTO parents (user_id, name) VALUES (?, ?)")
                .bind(user_id)
                .bind(name)
                .execute(self.db.pool())
                .await
                .expect("Failed to seed parent")
                .last_insert_rowid()
        }

        pub async fn seed_child(&self, parent_id: i64, name: &str) -> i64 {
            sqlx::query("INSERT INTO children (parent_id, name) VALUES (?, ?)")
                .bind(parent_id)
                .bind(name)
                .execute(self.db.pool())
                .await
                .expect("Failed to seed child")
                .last_insert_rowid()
        }

        pub async fn seed_item(&self, name: &str, unit_price: Decimal) -> i64 {
            self.seed_item_with_allergies(name, unit_price, &[]).await
        }

        pub async fn seed_item_with_allergies(
            &self,
            name: &str,
            unit_price: Decimal,
            allergies: &[&str],
        ) -> i64 {
            let item_id = sqlx::query(
                r#"
                INSERT INTO items (name, category, unit_price, description, calories, protein_g, carbs_g, fat_g)
                VALUES (?, 'snack', ?, ?, 95, '0.5', '25.0', '0.3')
                "#,
            )
            .bind(name)
            .bind(unit_price.to_string())
            .bind(format!("{} from the test catalog", name))
            .execute(self.db.pool())
            .await
            .expect("Failed to seed item")
            .last_insert_rowid();

            for allergy in allergies {
                sqlx::query("INSERT INTO item_allergies (item_id, allergy) VALUES (?, ?)")
                    .bind(item_id)
                    .bind(allergy)
                    .execute(self.db.pool())
                    .await
                    .expect("Failed to seed item allergy");
            }

            item_id
        }

        pub async fn seed_meal(&self, name: &str, fixed_price: Decimal) -> i64 {
            sqlx::query(
                "INSERT INTO premade_meals (name, description, image_url, fixed_price) VALUES (?, ?, ?, ?)",
            )
            .bind(name)
            .bind(format!("{} from the test menu", name))
            .bind(Option::<String>::None)
            .bind(fixed_price.to_string())
            .execute(self.db.pool())
            .await
            .expect("Failed to seed meal")
            .last_insert_rowid()
        }
    }
}
