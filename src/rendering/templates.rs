use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::{Context, Tera};

use crate::error::AppError;

/// Page templates, embedded into the binary.
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("message.html", include_str!("../../templates/message.html")),
    (
        "search_reservation.html",
        include_str!("../../templates/search_reservation.html"),
    ),
    ("reservations.html", include_str!("../../templates/reservations.html")),
    ("reservation.html", include_str!("../../templates/reservation.html")),
    (
        "create_reservation.html",
        include_str!("../../templates/create_reservation.html"),
    ),
    ("flights.html", include_str!("../../templates/flights.html")),
    ("flight.html", include_str!("../../templates/flight.html")),
    ("search_flight.html", include_str!("../../templates/search_flight.html")),
    ("create_flight.html", include_str!("../../templates/create_flight.html")),
    ("passengers.html", include_str!("../../templates/passengers.html")),
    ("passenger.html", include_str!("../../templates/passenger.html")),
    (
        "search_passenger.html",
        include_str!("../../templates/search_passenger.html"),
    ),
    (
        "create_passenger.html",
        include_str!("../../templates/create_passenger.html"),
    ),
];

/// Tera wrapper that turns rendered pages into axum responses.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    /// Render a page with `200 OK`.
    pub fn render(&self, name: &str, ctx: &Context) -> Result<Response, AppError> {
        self.render_with_status(StatusCode::OK, name, ctx)
    }

    pub fn render_with_status(
        &self,
        status: StatusCode,
        name: &str,
        ctx: &Context,
    ) -> Result<Response, AppError> {
        let body = self.tera.render(name, ctx)?;
        Ok((status, Html(body)).into_response())
    }

    /// Confirmation page shown after a successful form submission.
    pub fn message_page(&self, message: &str, mut ctx: Context) -> Response {
        ctx.insert("message", message);
        ctx.insert("success", &true);
        self.render("message.html", &ctx)
            .unwrap_or_else(|e| self.error_page(e))
    }

    /// Unwrap a page result, rendering the error page on failure.
    pub fn or_error_page(&self, result: Result<Response, AppError>) -> Response {
        result.unwrap_or_else(|e| self.error_page(e))
    }

    /// Error page carrying the status code of `err`.
    ///
    /// Falls back to plain text if the error template itself fails.
    pub fn error_page(&self, err: AppError) -> Response {
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!(error = %err, "page failed");
        }

        let mut ctx = Context::new();
        ctx.insert("message", &err.public_message());
        ctx.insert("success", &false);

        match self.tera.render("message.html", &ctx) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(render_err) => {
                tracing::error!(error = %render_err, "error page template failed");
                (status, err.public_message()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        let templates = Templates::new().unwrap();
        let names: Vec<&str> = templates.tera.get_template_names().collect();
        for (name, _) in TEMPLATES {
            assert!(names.contains(name), "missing template {name}");
        }
    }

    #[test]
    fn test_error_page_uses_error_status() {
        let templates = Templates::new().unwrap();
        let response = templates.error_page(AppError::NotFound("no está".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_message_page_escapes_user_text() {
        let templates = Templates::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("title", "Prueba");
        let html = templates
            .tera
            .render("message.html", &{
                ctx.insert("message", "<script>alert(1)</script>");
                ctx.insert("success", &true);
                ctx
            })
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
