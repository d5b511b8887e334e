use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::{info, warn};

use crate::domain::cart_store::CartStore;
use crate::domain::commands::checkout::{CheckoutCommand, CheckoutResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::cart::CartEntryKind;
use crate::domain::models::order::{
    NewOrder, NewOrderLine, NewPayment, OrderLineRef, OrderStatus, PaymentStatus,
};
use crate::domain::resolve_parent;
use crate::storage::traits::{FamilyStorage, OrderStorage};

/// Turns a validated cart into a persisted order.
///
/// Validation runs in a fixed sequence so the caller always sees the most
/// actionable problem first: an empty cart, then a missing child selection,
/// then ownership, then the delivery date. Only after all four pass does
/// anything get written, and the order, its lines, and the payment go in as
/// one transaction.
#[derive(Clone)]
pub struct CheckoutService {
    store: CartStore,
    family: Arc<dyn FamilyStorage>,
    orders: Arc<dyn OrderStorage>,
}

impl CheckoutService {
    pub fn new(
        store: CartStore,
        family: Arc<dyn FamilyStorage>,
        orders: Arc<dyn OrderStorage>,
    ) -> Self {
        Self {
            store,
            family,
            orders,
        }
    }

    pub async fn checkout(&self, command: CheckoutCommand) -> DomainResult<CheckoutResult> {
        info!(
            "Checkout requested by user {} for delivery on {}",
            command.user_id, command.delivery_date
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;

        let cart = self.store.load_cart(parent.parent_id).await?;
        if cart.is_empty() {
            return Err(DomainError::EmptyCart("your cart is empty".to_string()));
        }

        let child_id = self
            .store
            .load_selected_child(parent.parent_id)
            .await?
            .ok_or_else(|| {
                DomainError::MissingSelection("no child selected for this order".to_string())
            })?;

        // Ownership is re-checked here, not just at selection time; the
        // family may have changed since the child was picked.
        let child = self.family.get_child(child_id).await?;
        if !child.is_some_and(|c| c.belongs_to(&parent)) {
            return Err(DomainError::Authorization(format!(
                "child {} does not belong to your account",
                child_id
            )));
        }

        let today = Local::now().date_naive();
        if command.delivery_date <= today {
            return Err(DomainError::PastDeliveryDate(format!(
                "delivery date {} must be after {}",
                command.delivery_date, today
            )));
        }

        let total_amount = cart.total();
        let now = Utc::now();

        let new_order = NewOrder {
            parent_id: parent.parent_id,
            child_id,
            order_date: now,
            delivery_date: command.delivery_date,
            status: OrderStatus::Pending,
            total_amount,
        };

        let lines: Vec<NewOrderLine> = cart
            .entries()
            .map(|entry| NewOrderLine {
                reference: match entry.kind {
                    CartEntryKind::PremadeMeal => OrderLineRef::Meal(entry.reference_id),
                    CartEntryKind::BaseItem => OrderLineRef::Item(entry.reference_id),
                },
                quantity: entry.quantity,
            })
            .collect();

        let payment = NewPayment {
            amount: total_amount,
            payment_date: now,
            method: command.payment_method,
            status: PaymentStatus::for_method(command.payment_method),
        };

        let order_id = self.orders.create_order(&new_order, &lines, &payment).await?;

        // The order is committed; a failed cleanup must not turn success into
        // an error the caller would retry.
        if let Err(e) = self.store.clear_cart(parent.parent_id).await {
            warn!("Order {} placed but cart cleanup failed: {}", order_id, e);
        }
        if let Err(e) = self.store.clear_selected_child(parent.parent_id).await {
            warn!(
                "Order {} placed but child selection cleanup failed: {}",
                order_id, e
            );
        }

        info!(
            "Order {} placed for parent {} (total {})",
            order_id, parent.parent_id, total_amount
        );

        Ok(CheckoutResult {
            order_id,
            total_amount,
        })
    }
}
