//! Opens a hosted payment session and describes the redirect form to it.

use reqwest::Url;
use rp_common::error::{AppError, AppResult};
use rp_common::types::Money;
use tracing::{error, info};

use crate::host::Order;
use crate::provider::{PaymentRequest, RozetkaPayClient};

pub const NOTIFY_PATH: &str = "/payment/notify/rozetkapay";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectForm {
    pub action: String,
    pub method: &'static str,
    pub fields: Vec<(String, String)>,
}

impl RedirectForm {
    /// GET form to `url`. Browsers drop the action's query string on GET
    /// submission, so its pairs become hidden fields.
    pub fn get(url: &str) -> AppResult<Self> {
        let mut url = Url::parse(url)
            .map_err(|e| AppError::Gateway(format!("invalid redirect url {url:?}: {e}")))?;
        let fields = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.set_query(None);

        Ok(Self {
            action: url.to_string(),
            method: "get",
            fields,
        })
    }
}

#[derive(Clone)]
pub struct RedirectFormBuilder {
    client: RozetkaPayClient,
    public_url: String,
}

impl RedirectFormBuilder {
    pub fn new(client: RozetkaPayClient, public_url: impl Into<String>) -> Self {
        Self {
            client,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn return_url(&self, order_id: &str) -> String {
        format!("{}/checkout/{order_id}/return", self.public_url)
    }

    pub fn notify_url(&self) -> String {
        format!("{}{NOTIFY_PATH}", self.public_url)
    }

    /// Create the remote payment for `amount` and point a form at its page.
    ///
    /// Anything but a 200 with a redirect target is [`AppError::Rejected`].
    pub async fn build(&self, order: &Order, amount: &Money) -> AppResult<RedirectForm> {
        let request = PaymentRequest::hosted(
            order,
            amount,
            self.return_url(&order.id),
            self.notify_url(),
        );
        let response = self.client.create_payment(&request).await?;

        if response.status != 200 {
            error!(
                order_id = %order.id,
                status = response.status,
                "RozetkaPay refused to create payment"
            );
            return Err(AppError::Rejected(format!(
                "payment for order {} could not be created (status {})",
                order.id, response.status
            )));
        }

        let Some(target) = response.redirect_url() else {
            error!(order_id = %order.id, "create response has no redirect target");
            return Err(AppError::Rejected(format!(
                "payment for order {} has no redirect target",
                order.id
            )));
        };

        info!(order_id = %order.id, amount = %amount, "hosted payment created");
        RedirectForm::get(target)
    }
}
