//! Error page

use axum::http::StatusCode;
use maud::{html, Markup};

use crate::error::ErrorCode;

pub fn page(status: StatusCode, code: ErrorCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");
    super::layout(
        title,
        html! {
            p.error-message { (message) }
            p.error-code { "Status " (status.as_u16()) " (" (format!("{:?}", code)) ")" }
        },
    )
}
