//! Dashboard page
//!
//! - GET / - The single-page dashboard; charts are drawn with Plotly.js

use axum::response::Html;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../../static/index.html"))
}
