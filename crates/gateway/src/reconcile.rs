//! Decides whether a provider-reported outcome pays for an order.
//!
//! Everything here is a pure function of its inputs. The amount/currency
//! match against the order total is the only integrity check on the whole
//! callback path; notifications carry no signature.

use rp_common::types::Money;
use rust_decimal::Decimal;

use crate::provider::{DetailSection, Notification, PaymentInfo};

pub const TRANSACTION_SUCCESSFUL: &str = "transaction_successful";

/// What the provider told us, tagged by the callback that delivered it.
#[derive(Debug, Clone, Copy)]
pub enum ProviderReport<'a> {
    /// Body of the async notification.
    Notify(&'a Notification),
    /// Fresh info lookup made while handling the browser return.
    Return(&'a PaymentInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledTransaction {
    pub transaction_id: String,
    pub order_status: String,
    pub order_status_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Valid(ReconciledTransaction),
    Invalid,
}

impl Reconciliation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn transaction(&self) -> Option<&ReconciledTransaction> {
        match self {
            Self::Valid(tx) => Some(tx),
            Self::Invalid => None,
        }
    }
}

pub fn is_payment_valid(order_total: &Money, report: ProviderReport<'_>) -> Reconciliation {
    match report {
        ProviderReport::Notify(notification) => validate_notification(order_total, notification),
        ProviderReport::Return(info) => validate_return(order_total, info),
    }
}

/// Notify path: the detail's own amount and currency must match the order.
pub fn validate_notification(order_total: &Money, notification: &Notification) -> Reconciliation {
    if !notification.is_success {
        return Reconciliation::Invalid;
    }
    let Some(detail) = &notification.details else {
        return Reconciliation::Invalid;
    };

    if detail.status_code == TRANSACTION_SUCCESSFUL
        && validate_sum(&detail.amount, &detail.currency, order_total)
    {
        Reconciliation::Valid(ReconciledTransaction {
            transaction_id: detail.transaction_id.clone(),
            order_status: detail
                .status
                .clone()
                .unwrap_or_else(|| detail.status_code.clone()),
            order_status_code: detail.status_code.clone(),
        })
    } else {
        Reconciliation::Invalid
    }
}

/// Return path: only the first entry of each section counts, sections are
/// tried in [`DetailSection::PRIORITY`] order, and the sum is checked
/// against the top-level amount of the info response rather than the entry.
pub fn validate_return(order_total: &Money, info: &PaymentInfo) -> Reconciliation {
    for section in DetailSection::PRIORITY {
        let Some(detail) = info.section(section).and_then(<[_]>::first) else {
            continue;
        };

        if detail.order_status_code == TRANSACTION_SUCCESSFUL
            && validate_sum(&info.amount, &info.currency, order_total)
        {
            return Reconciliation::Valid(ReconciledTransaction {
                transaction_id: detail.transaction_id.clone(),
                order_status: detail.order_status.clone(),
                order_status_code: detail.order_status_code.clone(),
            });
        }
    }

    Reconciliation::Invalid
}

/// Exact match: currency code by string, amount by numeric value.
pub fn validate_sum(amount: &Decimal, currency: &str, order_total: &Money) -> bool {
    currency == order_total.currency && *amount == order_total.amount
}
