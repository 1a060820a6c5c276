mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn form_page_lists_kinds_and_defaults_to_reservation() {
    let env = common::TestEnv::start();
    let server = env.server();

    let response = server.get("/reserva/formbuscar").await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains(r#"id="tipoBusqueda""#));
    assert!(html.contains(r#"id="campoBusqueda""#));
    for value in ["reserva", "vuelo", "pasajero"] {
        assert!(
            html.contains(&format!(r#"value="{value}""#)),
            "missing option {value}"
        );
    }
    assert!(html.contains(r#"value="reserva" selected"#));
    // The field markup is inserted unescaped
    assert!(html.contains(r#"<label for="idBusqueda" class="form-label">Buscar por ID de reserva:</label>"#));
}

#[tokio::test]
async fn field_fragment_follows_selection() {
    let env = common::TestEnv::start();
    let server = env.server();

    let cases = [
        ("reserva", "Buscar por ID de reserva:"),
        ("vuelo", "Buscar por ID de vuelo:"),
        ("pasajero", "Buscar por ID de pasajero:"),
    ];
    for (selection, label) in cases {
        let response = server
            .get("/reserva/formbuscar/campo")
            .add_query_param("tipoBusqueda", selection)
            .await;
        response.assert_status_ok();
        let fragment = response.text();
        assert!(fragment.contains(label), "wrong label for {selection}");
        assert!(fragment.contains(r#"name="idBusqueda""#));
        assert!(fragment.contains(r#"type="number""#));
    }
}

#[tokio::test]
async fn field_fragment_ignores_unknown_selection() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .get("/reserva/formbuscar/campo")
        .add_query_param("tipoBusqueda", "hotel")
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let response = server.get("/reserva/formbuscar/campo").await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn search_redirects_to_matching_list() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let cases = [
        ("reserva", "3", "/reserva/mostrar/idreserva/3"),
        ("vuelo", "12", "/reserva/mostrar/idvuelo/12"),
        ("pasajero", "7", "/reserva/mostrar/idpasajero/7"),
    ];
    for (selection, id, expected) in cases {
        let response = server
            .get("/reserva/buscar")
            .add_query_param("tipoBusqueda", selection)
            .add_query_param("idBusqueda", id)
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location").to_str().unwrap(), expected);
    }
}

#[tokio::test]
async fn search_rejects_bad_input_instead_of_redirecting() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .get("/reserva/buscar")
        .add_query_param("tipoBusqueda", "hotel")
        .add_query_param("idBusqueda", "3")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Tipo de búsqueda no válido"));

    let response = server
        .get("/reserva/buscar")
        .add_query_param("tipoBusqueda", "vuelo")
        .add_query_param("idBusqueda", "")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(!response.text().contains("undefined"));
}

#[tokio::test]
async fn redirect_target_lists_reservations() {
    let env = common::TestEnv::start();
    let server = env.server();

    let flight = env.create_flight(&server, "Madrid", "Paris", "2024-09-01").await;
    let passenger = env.create_passenger(&server, "Juan", "García").await;
    env.create_reservation(
        &server,
        flight["id"].as_i64().unwrap(),
        passenger["id"].as_i64().unwrap(),
        "12A",
    )
    .await;

    let redirect = env
        .server_permissive()
        .get("/reserva/buscar")
        .add_query_param("tipoBusqueda", "vuelo")
        .add_query_param("idBusqueda", "1")
        .await;
    redirect.assert_status(StatusCode::SEE_OTHER);
    let location = redirect.header("location").to_str().unwrap().to_string();

    let page = server.get(&location).await;
    page.assert_status_ok();
    let html = page.text();
    assert!(html.contains("Reservas del vuelo 1"));
    assert!(html.contains("12A"));
    assert!(html.contains("Juan"));
}
