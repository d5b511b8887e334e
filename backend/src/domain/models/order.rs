use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery status of a placed order. The only field of an order that may
/// change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OrderStatus::Pending),
            "Processing" => Some(OrderStatus::Processing),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "card" => Some(PaymentMethod::Card),
            "cash" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    /// Card payments are captured immediately; cash settles on delivery.
    /// This is a deterministic flag, not a gateway integration.
    pub fn for_method(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => PaymentStatus::Completed,
            PaymentMethod::Cash => PaymentStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PaymentStatus::Pending),
            "Completed" => Some(PaymentStatus::Completed),
            _ => None,
        }
    }
}

/// A persisted order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub parent_id: i64,
    pub child_id: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub total_amount: Decimal,
}

/// Order header fields as handed to the store for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub parent_id: i64,
    pub child_id: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub total_amount: Decimal,
}

/// What an order line points at: exactly one of a pre-made meal or a base
/// item, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderLineRef {
    Meal(i64),
    Item(i64),
}

/// A snapshot of one cart entry at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: i64,
    pub reference: OrderLineRef,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub reference: OrderLineRef,
    pub quantity: u32,
}

/// Payment record created alongside the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub order_id: i64,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}
