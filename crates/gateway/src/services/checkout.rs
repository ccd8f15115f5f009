//! Return and notification callbacks, plus remote cancel/refund.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rp_common::error::{AppError, AppResult};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::host::{
    LocalPayment, MessageLevel, Messenger, NewPayment, Order, OrderStore, PaymentState,
    PaymentStore,
};
use crate::provider::{
    is_truthy, order_id_from_external_id, Notification, ProviderResponse, RozetkaPayClient,
};
use crate::reconcile::{self, ProviderReport, ReconciledTransaction, Reconciliation};

pub const EMPTY_NOTIFICATION: &str =
    "Error while processing payment. Details: request data is empty";
pub const MISSING_EXTERNAL_ID: &str = "Missing external_id parameter.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    Completed(LocalPayment),
    Cancelled,
}

/// Explicit answer to the provider's server-to-server notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyResponse {
    pub status: StatusCode,
    pub body: String,
}

impl NotifyResponse {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    fn bad_request(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: body.into(),
        }
    }
}

impl IntoResponse for NotifyResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

#[derive(Clone)]
pub struct CheckoutService {
    client: RozetkaPayClient,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentStore>,
    gateway_id: String,
}

impl CheckoutService {
    pub fn new(
        client: RozetkaPayClient,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
        gateway_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            orders,
            payments,
            gateway_id: gateway_id.into(),
        }
    }

    pub async fn order(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .load(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))
    }

    /// Shopper came back from the hosted page. The query string is not
    /// trusted; the outcome is looked up again from the provider.
    pub async fn on_return(
        &self,
        order: &Order,
        messenger: &dyn Messenger,
    ) -> AppResult<ReturnOutcome> {
        let Some(info) = self.client.payment_info(&order.id).await? else {
            error!(order_id = %order.id, "invalid transaction: no payment info");
            messenger.add_message(
                MessageLevel::Error,
                "Invalid transaction. Please try again.".to_string(),
            );
            return Ok(self.on_cancel(order, messenger));
        };

        match reconcile::is_payment_valid(&order.total, ProviderReport::Return(&info)) {
            Reconciliation::Valid(tx) => {
                let payment = self.record_payment(order, info.id.clone(), &tx).await?;
                messenger.add_message(
                    MessageLevel::Status,
                    format!(
                        "Your payment was successful with order id {} and transaction id {}.",
                        order.id, tx.transaction_id
                    ),
                );
                Ok(ReturnOutcome::Completed(payment))
            }
            Reconciliation::Invalid => {
                error!(
                    order_id = %order.id,
                    remote_id = %info.id,
                    remote_total = %info.total(),
                    order_total = %order.total,
                    "payment info does not pay for order"
                );
                messenger.add_message(
                    MessageLevel::Error,
                    "Invalid payment. Please try again.".to_string(),
                );
                Ok(self.on_cancel(order, messenger))
            }
        }
    }

    /// Shopper-facing cancellation; nothing is changed remotely or locally.
    pub fn on_cancel(&self, order: &Order, messenger: &dyn Messenger) -> ReturnOutcome {
        info!(order_id = %order.id, "checkout cancelled");
        messenger.add_message(
            MessageLevel::Status,
            format!(
                "You have cancelled the RozetkaPay payment for order #{} but may resume the checkout process when you are ready.",
                order.id
            ),
        );
        ReturnOutcome::Cancelled
    }

    /// Provider-side notification. Form fields win over the raw body when
    /// the request was form-encoded and carried any.
    pub async fn on_notify(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> AppResult<NotifyResponse> {
        let data = match form_fields(content_type, body) {
            Some(fields) => Value::Object(fields),
            None if body.iter().all(u8::is_ascii_whitespace) => {
                error!("notification rejected: request data is empty");
                return Ok(NotifyResponse::bad_request(EMPTY_NOTIFICATION));
            }
            None => serde_json::from_slice(body).unwrap_or_else(|err| {
                warn!(error = %err, "notification body is not JSON");
                Value::Null
            }),
        };

        let Some(external_id) = data.get("external_id").and_then(id_text) else {
            error!("notification rejected: missing external_id");
            return Ok(NotifyResponse::bad_request(MISSING_EXTERNAL_ID));
        };

        let order_id = order_id_from_external_id(&external_id);
        let order = if order_id.is_empty() {
            None
        } else {
            self.orders.load(&order_id).await?
        };
        let Some(order) = order else {
            let details = data.get("details");
            let transaction_id = details
                .and_then(|d| d.get("transaction_id"))
                .and_then(id_text)
                .unwrap_or_else(|| "unknown".to_string());
            let status = details
                .and_then(|d| d.get("status").or_else(|| d.get("status_code")))
                .and_then(id_text)
                .unwrap_or_else(|| "unknown".to_string());
            error!(
                %order_id,
                %external_id,
                %transaction_id,
                %status,
                "notification for unknown order"
            );
            return Ok(NotifyResponse::bad_request(format!(
                "Order {order_id} does not exist. Transaction #{transaction_id} status: {status}."
            )));
        };

        let notification = match serde_json::from_value::<Notification>(data) {
            Ok(notification) => Some(notification),
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "notification has an unexpected shape");
                None
            }
        };
        let verdict = notification
            .as_ref()
            .map(|n| reconcile::is_payment_valid(&order.total, ProviderReport::Notify(n)))
            .unwrap_or(Reconciliation::Invalid);

        match (verdict, notification) {
            (Reconciliation::Valid(tx), Some(notification)) => {
                let remote_id = notification
                    .id
                    .unwrap_or_else(|| tx.transaction_id.clone());
                self.record_payment(&order, remote_id, &tx).await?;
                Ok(NotifyResponse::ok("OK"))
            }
            _ => {
                error!(order_id = %order.id, "invalid transaction in notification");
                Ok(NotifyResponse::ok(format!(
                    "Payment for order {} was not accepted.",
                    order.id
                )))
            }
        }
    }

    pub async fn cancel_payment(&self, order: &Order) -> AppResult<ProviderResponse> {
        let response = self.client.cancel_payment(&order.id, &order.total).await?;
        info!(order_id = %order.id, status = response.status, "remote cancel requested");
        Ok(response)
    }

    pub async fn refund_payment(&self, order: &Order) -> AppResult<ProviderResponse> {
        let response = self.client.refund_payment(&order.id, &order.total).await?;
        info!(order_id = %order.id, status = response.status, "remote refund requested");
        Ok(response)
    }

    pub async fn payments(&self, order_id: &str) -> AppResult<Vec<LocalPayment>> {
        self.payments.list_for_order(order_id).await
    }

    async fn record_payment(
        &self,
        order: &Order,
        remote_id: String,
        tx: &ReconciledTransaction,
    ) -> AppResult<LocalPayment> {
        let payment = self
            .payments
            .create(NewPayment {
                state: PaymentState::Completed,
                amount: order.total.clone(),
                payment_gateway: self.gateway_id.clone(),
                order_id: order.id.clone(),
                remote_id,
                transaction_id: tx.transaction_id.clone(),
                remote_state: tx.order_status.clone(),
            })
            .await?;

        info!(
            order_id = %order.id,
            transaction_id = %tx.transaction_id,
            remote_id = %payment.remote_id,
            "payment completed"
        );
        Ok(payment)
    }
}

fn form_fields(content_type: Option<&str>, body: &[u8]) -> Option<Map<String, Value>> {
    let is_form = content_type
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if !is_form {
        return None;
    }

    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).ok()?;
    if pairs.is_empty() {
        return None;
    }
    Some(
        pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

fn id_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
