use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

use super::db::DbConnection;
use super::parse_decimal;
use crate::domain::models::order::{
    NewOrder, NewOrderLine, NewPayment, Order, OrderLine, OrderLineRef, OrderStatus,
};
use crate::storage::traits::OrderStorage;

/// Durable order storage. The order header, its lines and its payment are
/// written inside a single transaction; a failure at any step rolls the whole
/// aggregate back so no partial order is ever visible.
#[derive(Clone)]
pub struct OrderRepository {
    db: DbConnection,
}

impl OrderRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn parse_order_date(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid order_date: {:?}", text))
}

fn parse_delivery_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid delivery_date: {:?}", text))
}

fn line_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<OrderLine> {
    let meal_id: Option<i64> = row.get("premade_meal_id");
    let item_id: Option<i64> = row.get("item_id");
    let quantity: i64 = row.get("quantity");

    let reference = match (meal_id, item_id) {
        (Some(id), None) => OrderLineRef::Meal(id),
        (None, Some(id)) => OrderLineRef::Item(id),
        _ => return Err(anyhow!("order line must reference exactly one of meal or item")),
    };

    Ok(OrderLine {
        order_id: row.get("order_id"),
        reference,
        quantity: u32::try_from(quantity).context("order line quantity out of range")?,
    })
}

#[async_trait]
impl OrderStorage for OrderRepository {
    async fn create_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
        payment: &NewPayment,
    ) -> Result<i64> {
        let mut tx = self.db.pool().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (parent_id, child_id, order_date, delivery_date, status, total_amount)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.parent_id)
        .bind(order.child_id)
        .bind(order.order_date.to_rfc3339())
        .bind(order.delivery_date.format("%Y-%m-%d").to_string())
        .bind(order.status.as_str())
        .bind(order.total_amount.to_string())
        .execute(&mut *tx)
        .await?;

        let order_id = result.last_insert_rowid();

        for line in lines {
            let (meal_id, item_id) = match line.reference {
                OrderLineRef::Meal(id) => (Some(id), None),
                OrderLineRef::Item(id) => (None, Some(id)),
            };

            sqlx::query(
                "INSERT INTO order_lines (order_id, premade_meal_id, item_id, quantity) VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(meal_id)
            .bind(item_id)
            .bind(i64::from(line.quantity))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO payments (order_id, amount, payment_date, method, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(payment.amount.to_string())
        .bind(payment.payment_date.to_rfc3339())
        .bind(payment.method.as_str())
        .bind(payment.status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order_id)
    }

    async fn get_order_with_lines(
        &self,
        order_id: i64,
    ) -> Result<Option<(Order, Vec<OrderLine>)>> {
        let row = sqlx::query(
            r#"
            SELECT order_id, parent_id, child_id, order_date, delivery_date, status, total_amount
            FROM orders WHERE order_id = ?
            "#,
        )
        .bind(order_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_text: String = row.get("status");
        let order = Order {
            order_id: row.get("order_id"),
            parent_id: row.get("parent_id"),
            child_id: row.get("child_id"),
            order_date: parse_order_date(row.get("order_date"))?,
            delivery_date: parse_delivery_date(row.get("delivery_date"))?,
            status: OrderStatus::parse(&status_text)
                .ok_or_else(|| anyhow!("unknown order status: {:?}", status_text))?,
            total_amount: parse_decimal(row.get("total_amount"), "orders.total_amount")?,
        };

        let line_rows = sqlx::query(
            r#"
            SELECT order_id, premade_meal_id, item_id, quantity
            FROM order_lines WHERE order_id = ? ORDER BY order_line_id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.db.pool())
        .await?;

        let lines = line_rows
            .iter()
            .map(line_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some((order, lines)))
    }
}
