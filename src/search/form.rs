//! Reservation search form: the `campoBusqueda` field swap and the
//! redirect to `/reserva/mostrar/...`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::api::params::parse_id;
use crate::error::AppError;

pub const INVALID_SEARCH_KIND: &str = "Tipo de búsqueda no válido";

/// What the reservation search looks reservations up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Reservation,
    Flight,
    Passenger,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [
        SearchKind::Reservation,
        SearchKind::Flight,
        SearchKind::Passenger,
    ];

    /// Map a `tipoBusqueda` option value. Matching is exact.
    pub fn from_selection(value: &str) -> Option<Self> {
        match value {
            "reserva" => Some(SearchKind::Reservation),
            "vuelo" => Some(SearchKind::Flight),
            "pasajero" => Some(SearchKind::Passenger),
            _ => None,
        }
    }

    pub fn selection_value(self) -> &'static str {
        match self {
            SearchKind::Reservation => "reserva",
            SearchKind::Flight => "vuelo",
            SearchKind::Passenger => "pasajero",
        }
    }

    /// Text of the `<option>` in the dropdown.
    pub fn option_text(self) -> &'static str {
        match self {
            SearchKind::Reservation => "Reserva",
            SearchKind::Flight => "Vuelo",
            SearchKind::Passenger => "Pasajero",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchKind::Reservation => "Buscar por ID de reserva:",
            SearchKind::Flight => "Buscar por ID de vuelo:",
            SearchKind::Passenger => "Buscar por ID de pasajero:",
        }
    }

    fn path_segment(self) -> &'static str {
        match self {
            SearchKind::Reservation => "idreserva",
            SearchKind::Flight => "idvuelo",
            SearchKind::Passenger => "idpasajero",
        }
    }

    /// Label/input pair placed inside the `campoBusqueda` container.
    pub fn field_markup(self) -> String {
        format!(
            r#"<label for="idBusqueda" class="form-label">{}</label><input type="number" class="form-control" id="idBusqueda" name="idBusqueda" required>"#,
            self.label()
        )
    }

    /// Path of the reservation list for this kind and id.
    pub fn redirect_path(self, id: i64) -> String {
        format!("/reserva/mostrar/{}/{}", self.path_segment(), id)
    }
}

/// Turn the submitted form values into the redirect path.
///
/// Unknown selections and non-numeric ids are rejected instead of producing
/// a path.
pub fn resolve_redirect(selection: &str, raw_id: &str) -> Result<String, AppError> {
    let kind = SearchKind::from_selection(selection)
        .ok_or_else(|| AppError::BadRequest(INVALID_SEARCH_KIND.into()))?;
    let id = parse_id(raw_id)?;
    Ok(kind.redirect_path(id))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldQuery {
    #[serde(default)]
    pub tipo_busqueda: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub tipo_busqueda: String,
    #[serde(default)]
    pub id_busqueda: String,
}

/// Axum handler for `GET /reserva/formbuscar`.
pub async fn search_form_handler(State(state): State<crate::app::AppState>) -> Response {
    let options: Vec<serde_json::Value> = SearchKind::ALL
        .iter()
        .map(|kind| {
            serde_json::json!({
                "value": kind.selection_value(),
                "text": kind.option_text(),
            })
        })
        .collect();

    let mut ctx = tera::Context::new();
    ctx.insert("options", &options);
    ctx.insert("selected", SearchKind::Reservation.selection_value());
    ctx.insert("field", &SearchKind::Reservation.field_markup());

    state
        .templates
        .render("search_reservation.html", &ctx)
        .unwrap_or_else(|e| state.templates.error_page(e))
}

/// Axum handler for `GET /reserva/formbuscar/campo`.
///
/// Unrecognised selections answer `204 No Content` so the page keeps the
/// current field.
pub async fn field_fragment_handler(Query(query): Query<FieldQuery>) -> Response {
    match SearchKind::from_selection(&query.tipo_busqueda) {
        Some(kind) => Html(kind.field_markup()).into_response(),
        None => {
            tracing::debug!(selection = %query.tipo_busqueda, "Ignoring unknown search kind");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Axum handler for `GET /reserva/buscar`: redirect to the matching list.
pub async fn search_redirect_handler(
    State(state): State<crate::app::AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match resolve_redirect(&query.tipo_busqueda, &query.id_busqueda) {
        Ok(path) => Redirect::to(&path).into_response(),
        Err(e) => {
            tracing::warn!(
                selection = %query.tipo_busqueda,
                id = %query.id_busqueda,
                "Rejected reservation search"
            );
            state.templates.error_page(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_round_trip() {
        for kind in SearchKind::ALL {
            assert_eq!(SearchKind::from_selection(kind.selection_value()), Some(kind));
        }
        assert_eq!(SearchKind::from_selection("Vuelo"), None);
        assert_eq!(SearchKind::from_selection(""), None);
    }

    #[test]
    fn test_flight_field_markup() {
        let markup = SearchKind::Flight.field_markup();
        assert!(markup.contains(r#"id="idBusqueda""#));
        assert!(markup.contains("Buscar por ID de vuelo:"));
        assert!(markup.contains(r#"type="number""#));
        assert!(markup.contains("required"));
    }

    #[test]
    fn test_markup_differs_only_in_label() {
        let reservation = SearchKind::Reservation.field_markup();
        let passenger = SearchKind::Passenger.field_markup();
        assert_eq!(
            reservation.replace("reserva", "pasajero"),
            passenger
        );
    }

    #[test]
    fn test_redirect_paths() {
        assert_eq!(
            SearchKind::Reservation.redirect_path(3),
            "/reserva/mostrar/idreserva/3"
        );
        assert_eq!(
            SearchKind::Flight.redirect_path(12),
            "/reserva/mostrar/idvuelo/12"
        );
        assert_eq!(
            resolve_redirect("pasajero", "7").unwrap(),
            "/reserva/mostrar/idpasajero/7"
        );
    }

    #[test]
    fn test_unknown_selection_is_rejected() {
        match resolve_redirect("hotel", "7") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, INVALID_SEARCH_KIND),
            other => panic!("Expected BadRequest error, got: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        assert!(matches!(
            resolve_redirect("vuelo", ""),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_redirect("vuelo", "7; drop"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_redirect("pasajero", "-5"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_redirect("reserva", "0"),
            Err(AppError::BadRequest(_))
        ));
    }
}
