use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:lunchbox.db";

/// DbConnection manages the SQLite pool shared by all repositories.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Foreign keys must hold on every pooled connection so the composite
        // order write can rely on them inside its transaction.
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique in-memory name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS session_values (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS parents (
                parent_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS children (
                child_id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER NOT NULL REFERENCES parents(parent_id),
                name TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS items (
                item_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                unit_price TEXT NOT NULL,
                description TEXT,
                calories INTEGER NOT NULL DEFAULT 0,
                protein_g TEXT NOT NULL DEFAULT '0',
                carbs_g TEXT NOT NULL DEFAULT '0',
                fat_g TEXT NOT NULL DEFAULT '0'
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS item_allergies (
                item_id INTEGER NOT NULL REFERENCES items(item_id),
                allergy TEXT NOT NULL,
                PRIMARY KEY (item_id, allergy)
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS premade_meals (
                meal_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                image_url TEXT,
                fixed_price TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                order_id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER NOT NULL REFERENCES parents(parent_id),
                child_id INTEGER NOT NULL REFERENCES children(child_id),
                order_date TEXT NOT NULL,
                delivery_date TEXT NOT NULL,
                status TEXT NOT NULL,
                total_amount TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS order_lines (
                order_line_id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id INTEGER NOT NULL REFERENCES orders(order_id),
                premade_meal_id INTEGER REFERENCES premade_meals(meal_id),
                item_id INTEGER REFERENCES items(item_id),
                quantity INTEGER NOT NULL CHECK (quantity >= 1),
                CHECK ((premade_meal_id IS NULL) <> (item_id IS NULL))
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                payment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id INTEGER NOT NULL REFERENCES orders(order_id),
                amount TEXT NOT NULL,
                payment_date TEXT NOT NULL,
                method TEXT NOT NULL,
                status TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS saved_meals (
                saved_meal_id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER NOT NULL REFERENCES parents(parent_id),
                child_id INTEGER NOT NULL REFERENCES children(child_id),
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS saved_meal_items (
                saved_meal_id INTEGER NOT NULL
                    REFERENCES saved_meals(saved_meal_id) ON DELETE CASCADE,
                item_id INTEGER NOT NULL REFERENCES items(item_id),
                PRIMARY KEY (saved_meal_id, item_id)
            );
            "#,
        ];

        for statement in statements {
            sqlx::query(statement).execute(pool).await?;
        }

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        // Running the schema setup again must not fail
        DbConnection::setup_schema(db.pool()).await.expect("Schema re-run failed");
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        // A child pointing at a missing parent must be rejected
        let result = sqlx::query("INSERT INTO children (parent_id, name) VALUES (?, ?)")
            .bind(999_i64)
            .bind("Orphan")
            .execute(db.pool())
            .await;

        assert!(result.is_err(), "FK violation should be rejected");
    }
}
