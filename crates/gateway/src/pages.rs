//! Minimal HTML for the shopper-facing checkout pages.

use crate::host::{Message, MessageLevel};
use crate::services::redirect::RedirectForm;

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Auto-submitting form that sends the shopper to the hosted payment page.
pub fn redirect_page(form: &RedirectForm) -> String {
    let inputs: String = form
        .fields
        .iter()
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                escape_html(name),
                escape_html(value)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Redirecting to RozetkaPay</title></head>
<body onload="document.forms[0].submit()">
<form action="{action}" method="{method}">{inputs}
<p>Please wait while you are redirected to the payment page.</p>
<noscript><button type="submit">Proceed to RozetkaPay</button></noscript>
</form>
</body>
</html>
"#,
        action = escape_html(&form.action),
        method = form.method,
    )
}

pub fn message_page(title: &str, messages: &[Message], link: Option<(&str, &str)>) -> String {
    let items: String = messages
        .iter()
        .map(|m| {
            let class = match m.level {
                MessageLevel::Status => "status",
                MessageLevel::Error => "error",
            };
            format!(r#"<li class="{class}">{}</li>"#, escape_html(&m.text))
        })
        .collect();
    let link = link
        .map(|(href, label)| {
            format!(
                r#"<p><a href="{}">{}</a></p>"#,
                escape_html(href),
                escape_html(label)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
<ul class="messages">{items}</ul>
{link}
</body>
</html>
"#,
        title = escape_html(title),
    )
}
