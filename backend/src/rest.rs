//! REST surface: axum handlers mapping the shared DTOs onto the domain
//! services and domain errors onto HTTP statuses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;

use shared::{
    AddCustomMealItemRequest, AddToCartRequest, AdjustCustomMealItemRequest, AdjustQuantityRequest,
    CartEntryView, CartView, CheckoutRequest, CheckoutResponse, CustomMealEntryView,
    CustomMealView, DeleteSavedMealResponse, ErrorResponse, NutritionView,
    RemoveCustomMealItemRequest, RemoveFromCartRequest, ReorderResponse, SaveFavoriteRequest,
    SavedMealView, SelectChildRequest, SelectChildResponse, UserRequest,
};

use crate::domain::commands::cart::{
    AddMealToCartCommand, AdjustQuantityCommand, CartSnapshot, RemoveEntryCommand,
    SelectChildCommand,
};
use crate::domain::commands::checkout::CheckoutCommand;
use crate::domain::commands::custom_meal::{
    AddItemCommand, AdjustItemCommand, RemoveItemCommand, SaveFavoriteCommand,
};
use crate::domain::commands::reorder::{
    ReorderOrderCommand, ReorderResult, ReorderSavedMealCommand,
};
use crate::domain::commands::saved_meal::{DeleteSavedMealCommand, ListSavedMealsCommand};
use crate::domain::models::cart::{Cart, CartEntryKey, CartEntryKind};
use crate::domain::models::catalog::SavedMeal;
use crate::domain::models::custom_meal::CustomMeal;
use crate::domain::models::order::PaymentMethod;
use crate::domain::{
    CartService, CheckoutService, CustomMealService, DomainError, ReorderService, SavedMealService,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cart_service: CartService,
    pub custom_meal_service: CustomMealService,
    pub checkout_service: CheckoutService,
    pub reorder_service: ReorderService,
    pub saved_meal_service: SavedMealService,
}

/// All API routes, nested under `/api` by the caller.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(view_cart))
        .route("/cart/meals", post(add_meal_to_cart))
        .route("/cart/adjust", post(adjust_cart_quantity))
        .route("/cart/remove", post(remove_from_cart))
        .route("/cart/clear", post(clear_cart))
        .route("/cart/select-child", post(select_child))
        .route("/checkout", post(checkout))
        .route("/custom-meal", get(view_custom_meal))
        .route("/custom-meal/items", post(add_custom_meal_item))
        .route("/custom-meal/adjust", post(adjust_custom_meal_item))
        .route("/custom-meal/remove", post(remove_custom_meal_item))
        .route("/custom-meal/clear", post(clear_custom_meal))
        .route("/custom-meal/promote", post(promote_custom_meal))
        .route("/custom-meal/save", post(save_favorite))
        .route("/saved-meals", get(list_saved_meals))
        .route("/saved-meals/:id", delete(delete_saved_meal))
        .route("/saved-meals/:id/reorder", post(reorder_saved_meal))
        .route("/orders/:id/reorder", post(reorder_order))
}

fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Authorization(_) => StatusCode::FORBIDDEN,
        DomainError::Persistence(_) => {
            tracing::error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    };
    let body = ErrorResponse {
        kind: e.kind().to_string(),
        message: e.to_string(),
    };
    (status, Json(body)).into_response()
}

fn kind_to_view(kind: CartEntryKind) -> shared::CartEntryKind {
    match kind {
        CartEntryKind::PremadeMeal => shared::CartEntryKind::PremadeMeal,
        CartEntryKind::BaseItem => shared::CartEntryKind::BaseItem,
    }
}

fn kind_from_view(kind: shared::CartEntryKind) -> CartEntryKind {
    match kind {
        shared::CartEntryKind::PremadeMeal => CartEntryKind::PremadeMeal,
        shared::CartEntryKind::BaseItem => CartEntryKind::BaseItem,
    }
}

fn payment_method_from_view(method: shared::PaymentMethod) -> PaymentMethod {
    match method {
        shared::PaymentMethod::Card => PaymentMethod::Card,
        shared::PaymentMethod::Cash => PaymentMethod::Cash,
    }
}

/// Render a cart with entries in a stable order for the caller.
fn cart_view(cart: &Cart, selected_child_id: Option<i64>) -> CartView {
    let mut entries: Vec<CartEntryView> = cart
        .entries()
        .map(|e| CartEntryView {
            kind: kind_to_view(e.kind),
            reference_id: e.reference_id,
            name: e.name.clone(),
            unit_price: e.unit_price,
            quantity: e.quantity,
            image_url: e.image_url.clone(),
            description: e.description.clone(),
        })
        .collect();
    entries.sort_by_key(|e| (e.kind != shared::CartEntryKind::PremadeMeal, e.reference_id));

    CartView {
        total: cart.total(),
        entries,
        selected_child_id,
    }
}

fn snapshot_view(snapshot: &CartSnapshot) -> CartView {
    cart_view(&snapshot.cart, snapshot.selected_child_id)
}

fn custom_meal_view(meal: &CustomMeal) -> CustomMealView {
    let mut entries: Vec<CustomMealEntryView> = meal
        .entries()
        .map(|e| CustomMealEntryView {
            item_id: e.item_id,
            name: e.name.clone(),
            unit_price: e.unit_price,
            quantity: e.quantity,
            nutrition: NutritionView {
                calories: e.nutrition.calories,
                protein_g: e.nutrition.protein_g,
                carbs_g: e.nutrition.carbs_g,
                fat_g: e.nutrition.fat_g,
            },
            allergies: e.allergies.clone(),
        })
        .collect();
    entries.sort_by_key(|e| e.item_id);

    CustomMealView {
        total: meal.total(),
        entries,
    }
}

fn saved_meal_view(meal: &SavedMeal) -> SavedMealView {
    SavedMealView {
        saved_meal_id: meal.saved_meal_id,
        child_id: meal.child_id,
        name: meal.name.clone(),
        item_ids: meal.item_ids.clone(),
    }
}

fn reorder_view(result: &ReorderResult, selected_child_id: Option<i64>) -> ReorderResponse {
    ReorderResponse {
        cart: cart_view(&result.cart, selected_child_id),
        merged_lines: result.merged_lines,
        skipped_lines: result.skipped_lines,
    }
}

/// Render a reorder result with the selected-child marker the result alone
/// does not carry.
async fn render_reorder(state: &AppState, user_id: i64, result: &ReorderResult) -> Response {
    match state.cart_service.view_cart(user_id).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(reorder_view(result, snapshot.selected_child_id)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Render the caller's cart after a mutation, including the selected-child
/// marker the mutation result alone does not carry.
async fn render_snapshot(state: &AppState, user_id: i64) -> Response {
    match state.cart_service.view_cart(user_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot_view(&snapshot))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for GET /api/cart
pub async fn view_cart(
    State(state): State<AppState>,
    Query(query): Query<UserRequest>,
) -> impl IntoResponse {
    info!("GET /api/cart - user: {}", query.user_id);

    match state.cart_service.view_cart(query.user_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot_view(&snapshot))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/cart/meals
pub async fn add_meal_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> impl IntoResponse {
    info!("POST /api/cart/meals - request: {:?}", request);

    let command = AddMealToCartCommand {
        user_id: request.user_id,
        meal_id: request.meal_id,
        quantity: request.quantity,
    };

    match state.cart_service.add_meal(command).await {
        Ok(_) => render_snapshot(&state, request.user_id).await,
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/cart/adjust
pub async fn adjust_cart_quantity(
    State(state): State<AppState>,
    Json(request): Json<AdjustQuantityRequest>,
) -> impl IntoResponse {
    info!("POST /api/cart/adjust - request: {:?}", request);

    let command = AdjustQuantityCommand {
        user_id: request.user_id,
        key: CartEntryKey {
            kind: kind_from_view(request.kind),
            reference_id: request.reference_id,
        },
        delta: request.delta,
    };

    match state.cart_service.adjust_quantity(command).await {
        Ok(_) => render_snapshot(&state, request.user_id).await,
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/cart/remove
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> impl IntoResponse {
    info!("POST /api/cart/remove - request: {:?}", request);

    let command = RemoveEntryCommand {
        user_id: request.user_id,
        key: CartEntryKey {
            kind: kind_from_view(request.kind),
            reference_id: request.reference_id,
        },
    };

    match state.cart_service.remove_entry(command).await {
        Ok(_) => render_snapshot(&state, request.user_id).await,
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/cart/clear
pub async fn clear_cart(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> impl IntoResponse {
    info!("POST /api/cart/clear - user: {}", request.user_id);

    match state.cart_service.clear_cart(request.user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/cart/select-child
pub async fn select_child(
    State(state): State<AppState>,
    Json(request): Json<SelectChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/cart/select-child - request: {:?}", request);

    let command = SelectChildCommand {
        user_id: request.user_id,
        child_id: request.child_id,
    };

    match state.cart_service.select_child(command).await {
        Ok(result) => (
            StatusCode::OK,
            Json(SelectChildResponse {
                child_id: result.child.child_id,
                name: result.child.name,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> impl IntoResponse {
    info!("POST /api/checkout - request: {:?}", request);

    let command = CheckoutCommand {
        user_id: request.user_id,
        delivery_date: request.delivery_date,
        payment_method: payment_method_from_view(request.payment_method),
    };

    match state.checkout_service.checkout(command).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(CheckoutResponse {
                order_id: result.order_id,
                total_amount: result.total_amount,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for GET /api/custom-meal
pub async fn view_custom_meal(
    State(state): State<AppState>,
    Query(query): Query<UserRequest>,
) -> impl IntoResponse {
    info!("GET /api/custom-meal - user: {}", query.user_id);

    match state.custom_meal_service.view(query.user_id).await {
        Ok(meal) => (StatusCode::OK, Json(custom_meal_view(&meal))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/custom-meal/items
pub async fn add_custom_meal_item(
    State(state): State<AppState>,
    Json(request): Json<AddCustomMealItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/custom-meal/items - request: {:?}", request);

    let command = AddItemCommand {
        user_id: request.user_id,
        item_id: request.item_id,
        quantity: request.quantity,
    };

    match state.custom_meal_service.add_item(command).await {
        Ok(meal) => (StatusCode::OK, Json(custom_meal_view(&meal))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/custom-meal/adjust
pub async fn adjust_custom_meal_item(
    State(state): State<AppState>,
    Json(request): Json<AdjustCustomMealItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/custom-meal/adjust - request: {:?}", request);

    let command = AdjustItemCommand {
        user_id: request.user_id,
        item_id: request.item_id,
        delta: request.delta,
    };

    match state.custom_meal_service.adjust_item(command).await {
        Ok(meal) => (StatusCode::OK, Json(custom_meal_view(&meal))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/custom-meal/remove
pub async fn remove_custom_meal_item(
    State(state): State<AppState>,
    Json(request): Json<RemoveCustomMealItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/custom-meal/remove - request: {:?}", request);

    let command = RemoveItemCommand {
        user_id: request.user_id,
        item_id: request.item_id,
    };

    match state.custom_meal_service.remove_item(command).await {
        Ok(meal) => (StatusCode::OK, Json(custom_meal_view(&meal))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/custom-meal/clear
pub async fn clear_custom_meal(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> impl IntoResponse {
    info!("POST /api/custom-meal/clear - user: {}", request.user_id);

    match state.custom_meal_service.clear(request.user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/custom-meal/promote
pub async fn promote_custom_meal(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> impl IntoResponse {
    info!("POST /api/custom-meal/promote - user: {}", request.user_id);

    match state
        .custom_meal_service
        .promote_to_cart(request.user_id)
        .await
    {
        Ok(_) => render_snapshot(&state, request.user_id).await,
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/custom-meal/save
pub async fn save_favorite(
    State(state): State<AppState>,
    Json(request): Json<SaveFavoriteRequest>,
) -> impl IntoResponse {
    info!("POST /api/custom-meal/save - request: {:?}", request);

    let command = SaveFavoriteCommand {
        user_id: request.user_id,
        child_id: request.child_id,
        name: request.name,
    };

    match state.custom_meal_service.save_favorite(command).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(saved_meal_view(&result.saved_meal)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for GET /api/saved-meals
pub async fn list_saved_meals(
    State(state): State<AppState>,
    Query(query): Query<UserRequest>,
) -> impl IntoResponse {
    info!("GET /api/saved-meals - user: {}", query.user_id);

    let command = ListSavedMealsCommand {
        user_id: query.user_id,
    };

    match state.saved_meal_service.list_saved_meals(command).await {
        Ok(result) => {
            let views: Vec<SavedMealView> = result.saved_meals.iter().map(saved_meal_view).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Axum handler for DELETE /api/saved-meals/:id
pub async fn delete_saved_meal(
    State(state): State<AppState>,
    Path(saved_meal_id): Path<i64>,
    Query(query): Query<UserRequest>,
) -> impl IntoResponse {
    info!(
        "DELETE /api/saved-meals/{} - user: {}",
        saved_meal_id, query.user_id
    );

    let command = DeleteSavedMealCommand {
        user_id: query.user_id,
        saved_meal_id,
    };

    match state.saved_meal_service.delete_saved_meal(command).await {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteSavedMealResponse {
                message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/orders/:id/reorder
pub async fn reorder_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(request): Json<UserRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/orders/{}/reorder - user: {}",
        order_id, request.user_id
    );

    let command = ReorderOrderCommand {
        user_id: request.user_id,
        order_id,
    };

    match state.reorder_service.reorder_order(command).await {
        Ok(result) => render_reorder(&state, request.user_id, &result).await,
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /api/saved-meals/:id/reorder
pub async fn reorder_saved_meal(
    State(state): State<AppState>,
    Path(saved_meal_id): Path<i64>,
    Json(request): Json<UserRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/saved-meals/{}/reorder - user: {}",
        saved_meal_id, request.user_id
    );

    let command = ReorderSavedMealCommand {
        user_id: request.user_id,
        saved_meal_id,
    };

    match state.reorder_service.reorder_saved_meal(command).await {
        Ok(result) => render_reorder(&state, request.user_id, &result).await,
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::test_support::TestContext;
    use crate::Backend;
    use chrono::{Duration, Local};
    use rust_decimal_macros::dec;

    struct Fixture {
        ctx: TestContext,
        state: AppState,
    }

    async fn setup_test_handlers() -> Fixture {
        let ctx = TestContext::new().await;
        let backend = Backend::new(ctx.db.clone());
        let state = AppState {
            cart_service: backend.cart_service,
            custom_meal_service: backend.custom_meal_service,
            checkout_service: backend.checkout_service,
            reorder_service: backend.reorder_service,
            saved_meal_service: backend.saved_meal_service,
        };
        Fixture { ctx, state }
    }

    #[tokio::test]
    async fn test_add_meal_then_view_cart() {
        let fx = setup_test_handlers().await;
        fx.ctx.seed_parent(10, "Dana").await;
        let meal_id = fx.ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        let response = add_meal_to_cart(
            State(fx.state.clone()),
            Json(AddToCartRequest {
                user_id: 10,
                meal_id,
                quantity: 2,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = view_cart(State(fx.state), Query(UserRequest { user_id: 10 }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_unknown_meal_is_404() {
        let fx = setup_test_handlers().await;
        fx.ctx.seed_parent(10, "Dana").await;

        let response = add_meal_to_cart(
            State(fx.state),
            Json(AddToCartRequest {
                user_id: 10,
                meal_id: 999,
                quantity: 1,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_400() {
        let fx = setup_test_handlers().await;
        fx.ctx.seed_parent(10, "Dana").await;

        let response = checkout(
            State(fx.state),
            Json(CheckoutRequest {
                user_id: 10,
                delivery_date: Local::now().date_naive() + Duration::days(1),
                payment_method: shared::PaymentMethod::Card,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_full_checkout_flow_over_handlers() {
        let fx = setup_test_handlers().await;
        let parent_id = fx.ctx.seed_parent(10, "Dana").await;
        let child_id = fx.ctx.seed_child(parent_id, "Riley").await;
        let meal_id = fx.ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        let response = add_meal_to_cart(
            State(fx.state.clone()),
            Json(AddToCartRequest {
                user_id: 10,
                meal_id,
                quantity: 2,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = select_child(
            State(fx.state.clone()),
            Json(SelectChildRequest {
                user_id: 10,
                child_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = checkout(
            State(fx.state),
            Json(CheckoutRequest {
                user_id: 10,
                delivery_date: Local::now().date_naive() + Duration::days(1),
                payment_method: shared::PaymentMethod::Card,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_select_foreign_child_is_403() {
        let fx = setup_test_handlers().await;
        fx.ctx.seed_parent(10, "Dana").await;
        let sam = fx.ctx.seed_parent(11, "Sam").await;
        let casey = fx.ctx.seed_child(sam, "Casey").await;

        let response = select_child(
            State(fx.state),
            Json(SelectChildRequest {
                user_id: 10,
                child_id: casey,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_custom_meal_flow_over_handlers() {
        let fx = setup_test_handlers().await;
        fx.ctx.seed_parent(10, "Dana").await;
        let item_id = fx.ctx.seed_item("Apple", dec!(1.00)).await;

        let response = add_custom_meal_item(
            State(fx.state.clone()),
            Json(AddCustomMealItemRequest {
                user_id: 10,
                item_id,
                quantity: 2,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            promote_custom_meal(State(fx.state.clone()), Json(UserRequest { user_id: 10 }))
                .await
                .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        // The builder is empty now, promoting again fails
        let response = promote_custom_meal(State(fx.state), Json(UserRequest { user_id: 10 }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reorder_response_carries_child_selection() {
        use crate::domain::models::order::{
            NewOrder, NewOrderLine, NewPayment, OrderLineRef, OrderStatus, PaymentMethod,
            PaymentStatus,
        };
        use crate::storage::sqlite::OrderRepository;
        use crate::storage::traits::OrderStorage;
        use chrono::{NaiveDate, Utc};

        let fx = setup_test_handlers().await;
        let parent_id = fx.ctx.seed_parent(10, "Dana").await;
        let child_id = fx.ctx.seed_child(parent_id, "Riley").await;
        let meal_id = fx.ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        let order_id = OrderRepository::new(fx.ctx.db.clone())
            .create_order(
                &NewOrder {
                    parent_id,
                    child_id,
                    order_date: Utc::now(),
                    delivery_date: NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
                    status: OrderStatus::Delivered,
                    total_amount: dec!(5.50),
                },
                &[NewOrderLine {
                    reference: OrderLineRef::Meal(meal_id),
                    quantity: 1,
                }],
                &NewPayment {
                    amount: dec!(5.50),
                    payment_date: Utc::now(),
                    method: PaymentMethod::Card,
                    status: PaymentStatus::Completed,
                },
            )
            .await
            .unwrap();

        let response = select_child(
            State(fx.state.clone()),
            Json(SelectChildRequest {
                user_id: 10,
                child_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = reorder_order(
            State(fx.state),
            Path(order_id),
            Json(UserRequest { user_id: 10 }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: shared::ReorderResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.merged_lines, 1);
        // The selection made before the reorder survives into the response
        assert_eq!(body.cart.selected_child_id, Some(child_id));
    }

    #[tokio::test]
    async fn test_delete_missing_saved_meal_is_404() {
        let fx = setup_test_handlers().await;
        fx.ctx.seed_parent(10, "Dana").await;

        let response = delete_saved_meal(
            State(fx.state),
            Path(404),
            Query(UserRequest { user_id: 10 }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
