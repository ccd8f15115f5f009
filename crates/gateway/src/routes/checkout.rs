use axum::extract::{Path, State};
use axum::response::Html;
use rp_common::error::AppResult;

use crate::host::memory::MessageBuffer;
use crate::pages;
use crate::services::checkout::ReturnOutcome;
use crate::state::SharedState;

pub async fn payment_form(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> AppResult<Html<String>> {
    let order = state.checkout.order(&order_id).await?;
    let form = state.redirect.build(&order, &order.total).await?;
    Ok(Html(pages::redirect_page(&form)))
}

pub async fn on_return(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> AppResult<Html<String>> {
    let order = state.checkout.order(&order_id).await?;
    let messages = MessageBuffer::new();

    let page = match state.checkout.on_return(&order, &messages).await? {
        ReturnOutcome::Completed(_) => {
            pages::message_page("Payment complete", &messages.take(), None)
        }
        ReturnOutcome::Cancelled => cancel_page(&order.id, &messages),
    };
    Ok(Html(page))
}

pub async fn on_cancel(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> AppResult<Html<String>> {
    let order = state.checkout.order(&order_id).await?;
    let messages = MessageBuffer::new();
    state.checkout.on_cancel(&order, &messages);
    Ok(Html(cancel_page(&order.id, &messages)))
}

fn cancel_page(order_id: &str, messages: &MessageBuffer) -> String {
    let retry = format!("/checkout/{order_id}/payment");
    pages::message_page(
        "Payment not completed",
        &messages.take(),
        Some((&retry, "Try again")),
    )
}
