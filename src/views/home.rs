use axum::extract::State;
use axum::response::Response;
use tera::Context;

use crate::app::AppState;

/// `GET /`
pub async fn home_handler(State(state): State<AppState>) -> Response {
    let result = state.templates.render("index.html", &Context::new());
    state.templates.or_error_page(result)
}
