//! Lunchbox backend: cart, custom meal builder, checkout, and reorder
//! services over SQLite, exposed through a REST API.

use std::sync::Arc;

pub mod domain;
pub mod rest;
pub mod storage;

use domain::{
    CartService, CartStore, CheckoutService, CustomMealService, ReorderService, SavedMealService,
};
use storage::sqlite::{
    CatalogRepository, DbConnection, FamilyRepository, OrderRepository, SavedMealRepository,
    SessionRepository,
};

/// All services wired against one database connection.
#[derive(Clone)]
pub struct Backend {
    pub cart_service: CartService,
    pub custom_meal_service: CustomMealService,
    pub checkout_service: CheckoutService,
    pub reorder_service: ReorderService,
    pub saved_meal_service: SavedMealService,
}

impl Backend {
    pub fn new(db: DbConnection) -> Self {
        let store = CartStore::new(Arc::new(SessionRepository::new(db.clone())));
        let catalog = Arc::new(CatalogRepository::new(db.clone()));
        let family = Arc::new(FamilyRepository::new(db.clone()));
        let orders = Arc::new(OrderRepository::new(db.clone()));
        let saved_meals = Arc::new(SavedMealRepository::new(db));

        let cart_service = CartService::new(store.clone(), catalog.clone(), family.clone());
        let custom_meal_service = CustomMealService::new(
            store.clone(),
            catalog.clone(),
            family.clone(),
            saved_meals.clone(),
            cart_service.clone(),
        );
        let checkout_service = CheckoutService::new(store, family.clone(), orders.clone());
        let reorder_service = ReorderService::new(
            catalog,
            family.clone(),
            orders,
            saved_meals.clone(),
            cart_service.clone(),
        );
        let saved_meal_service = SavedMealService::new(family, saved_meals);

        Self {
            cart_service,
            custom_meal_service,
            checkout_service,
            reorder_service,
            saved_meal_service,
        }
    }
}
