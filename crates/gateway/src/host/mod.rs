//! Ports to the commerce host: orders, payment storage, shopper messages.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rp_common::error::AppResult;
use rp_common::types::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Customer {
    Anonymous,
    Account { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub total: Money,
    pub customer: Customer,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load(&self, order_id: &str) -> AppResult<Option<Order>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Completed,
}

/// A payment to be recorded against an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub state: PaymentState,
    pub amount: Money,
    pub payment_gateway: String,
    pub order_id: String,
    pub remote_id: String,
    /// Provider transaction id; the same on the return and notify paths.
    pub transaction_id: String,
    pub remote_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPayment {
    pub payment_id: Uuid,
    pub state: PaymentState,
    pub amount: Money,
    pub payment_gateway: String,
    pub order_id: String,
    pub remote_id: String,
    pub transaction_id: String,
    pub remote_state: String,
    pub created_at: DateTime<Utc>,
}

/// Payment storage. Deduplicating repeated callbacks is this layer's job.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, payment: NewPayment) -> AppResult<LocalPayment>;

    async fn list_for_order(&self, order_id: &str) -> AppResult<Vec<LocalPayment>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Status,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Messages shown to the shopper on the next page.
pub trait Messenger: Send + Sync {
    fn add_message(&self, level: MessageLevel, text: String);
}
