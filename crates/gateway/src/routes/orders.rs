//! Order administration: the host's side of the integration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rp_common::error::{AppError, AppResult};
use rp_common::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::host::{Customer, LocalPayment, Order};
use crate::provider::ProviderResponse;
use crate::state::SharedState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub customer: Option<String>,
}

/// Remote cancel/refund result, passed through as the provider sent it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderOperationResponse {
    pub status: u16,
    pub body: Value,
}

impl From<ProviderResponse> for ProviderOperationResponse {
    fn from(response: ProviderResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
        }
    }
}

pub async fn create_order(
    State(state): State<SharedState>,
    Json(request): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    // Notifications find orders by the digits of their external id.
    if request.order_id.is_empty() || !request.order_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput(
            "order_id must be a non-empty string of digits".to_owned(),
        ));
    }
    if request.amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput("amount must be positive".to_owned()));
    }
    if request.currency.trim().is_empty() {
        return Err(AppError::InvalidInput("currency is required".to_owned()));
    }

    let order = Order {
        id: request.order_id,
        total: Money::new(request.amount, request.currency),
        customer: match request.customer.filter(|name| !name.trim().is_empty()) {
            Some(name) => Customer::Account { name },
            None => Customer::Anonymous,
        },
    };
    state.orders.insert(order.clone());
    info!(order_id = %order.id, total = %order.total, "order registered");

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_payments(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<LocalPayment>>> {
    let order = state.checkout.order(&order_id).await?;
    Ok(Json(state.checkout.payments(&order.id).await?))
}

pub async fn cancel(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<ProviderOperationResponse>> {
    let order = state.checkout.order(&order_id).await?;
    let response = state.checkout.cancel_payment(&order).await?;
    Ok(Json(response.into()))
}

pub async fn refund(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<ProviderOperationResponse>> {
    let order = state.checkout.order(&order_id).await?;
    let response = state.checkout.refund_payment(&order).await?;
    Ok(Json(response.into()))
}
