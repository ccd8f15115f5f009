pub mod checkout;
pub mod health;
pub mod notify;
pub mod orders;

use axum::routing::{get, post};
use axum::Router;

use crate::services::redirect::NOTIFY_PATH;
use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/checkout/{order_id}/payment", get(checkout::payment_form))
        .route("/checkout/{order_id}/return", get(checkout::on_return))
        .route("/checkout/{order_id}/cancel", get(checkout::on_cancel))
        .route(NOTIFY_PATH, post(notify::on_notify))
        .route("/api/v1/orders", post(orders::create_order))
        .route(
            "/api/v1/orders/{order_id}/payments",
            get(orders::list_payments),
        )
        .route("/api/v1/orders/{order_id}/cancel", post(orders::cancel))
        .route("/api/v1/orders/{order_id}/refund", post(orders::refund))
        .with_state(state)
}
