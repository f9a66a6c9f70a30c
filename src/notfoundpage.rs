use axum::http::StatusCode;
use maud::Markup;

use crate::theme::notice;

pub async fn not_found_page() -> (StatusCode, Markup) {
    (
        StatusCode::NOT_FOUND,
        notice("Page Not Found", "The requested page was not found."),
    )
}
