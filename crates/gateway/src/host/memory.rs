//! In-memory host adapters used by the standalone service and tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rp_common::error::AppResult;
use tracing::debug;
use uuid::Uuid;

use super::{
    LocalPayment, Message, MessageLevel, Messenger, NewPayment, Order, OrderStore, PaymentStore,
};

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: DashMap<String, Order>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn load(&self, order_id: &str) -> AppResult<Option<Order>> {
        Ok(self.orders.get(order_id).map(|entry| entry.value().clone()))
    }
}

/// Keyed by order id. A second payment in the same state that shares the
/// remote id or the transaction id of a recorded one returns that record
/// instead of adding another.
#[derive(Default)]
pub struct MemoryPaymentStore {
    payments: DashMap<String, Vec<LocalPayment>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn create(&self, payment: NewPayment) -> AppResult<LocalPayment> {
        let mut entry = self.payments.entry(payment.order_id.clone()).or_default();

        if let Some(existing) = entry
            .iter()
            .find(|p| p.state == payment.state && p.is_same_remote(&payment))
        {
            debug!(
                order_id = %payment.order_id,
                remote_id = %payment.remote_id,
                "payment already recorded"
            );
            return Ok(existing.clone());
        }

        let record = LocalPayment {
            payment_id: Uuid::new_v4(),
            state: payment.state,
            amount: payment.amount,
            payment_gateway: payment.payment_gateway,
            order_id: payment.order_id,
            remote_id: payment.remote_id,
            transaction_id: payment.transaction_id,
            remote_state: payment.remote_state,
            created_at: Utc::now(),
        };
        entry.push(record.clone());
        Ok(record)
    }

    async fn list_for_order(&self, order_id: &str) -> AppResult<Vec<LocalPayment>> {
        Ok(self
            .payments
            .get(order_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

impl LocalPayment {
    fn is_same_remote(&self, payment: &NewPayment) -> bool {
        self.remote_id == payment.remote_id
            || (!payment.transaction_id.is_empty() && self.transaction_id == payment.transaction_id)
    }
}

/// Collects messages for a single page render.
#[derive(Default)]
pub struct MessageBuffer {
    messages: Mutex<Vec<Message>>,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Message> {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *messages)
    }
}

impl Messenger for MessageBuffer {
    fn add_message(&self, level: MessageLevel, text: String) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Message { level, text });
    }
}
