use crate::domain::listing::Listing;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, empty, init_test_db, publishable_listing, seed_listing};
use http::{Method, Request};

fn get(uri: &str) -> astra::Request {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(empty())
        .unwrap()
}

#[test]
fn index_lists_listings_with_percentage() {
    let db = init_test_db();
    seed_listing(&db, &publishable_listing(), 0);
    seed_listing(
        &db,
        &Listing {
            title: Some("Local en Sevilla".into()),
            city: Some("Sevilla".into()),
            ..Default::default()
        },
        0,
    );

    let resp = handle(get("/"), &db).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Piso en Malasaña"));
    assert!(body.contains("Local en Sevilla"));
    assert!(body.contains("Lista para publicar"));
}

#[test]
fn index_filters_by_city_and_publishable() {
    let db = init_test_db();
    seed_listing(&db, &publishable_listing(), 0);
    seed_listing(
        &db,
        &Listing {
            title: Some("Local en Sevilla".into()),
            city: Some("Sevilla".into()),
            ..Default::default()
        },
        0,
    );

    let body = body_string(handle(get("/?city=sevilla"), &db).unwrap());
    assert!(body.contains("Local en Sevilla"));
    assert!(!body.contains("Piso en Malasaña"));

    let body = body_string(handle(get("/?publishable=1"), &db).unwrap());
    assert!(body.contains("Piso en Malasaña"));
    assert!(!body.contains("Local en Sevilla"));
}

#[test]
fn listing_page_shows_progress_and_timeline() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 2);

    let resp = handle(get(&format!("/listings/{id}")), &db).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Piso en Malasaña"));
    assert!(body.contains(r#"data-sub-stage="ficha_completa" data-status="accomplished""#));
    assert!(body.contains(r#"data-sub-stage="encargo" data-status="ongoing""#));
    assert!(body.contains(r#"data-stage="busqueda" data-status="future""#));
    assert!(body.contains("Publicar en portales"));
    assert!(!body.contains("disabled"));
}

#[test]
fn incomplete_listing_page_disables_publish() {
    let db = init_test_db();
    let listing = Listing {
        price: None,
        bedrooms: None,
        ..publishable_listing()
    };
    let id = seed_listing(&db, &listing, 0);

    let body = body_string(handle(get(&format!("/listings/{id}")), &db).unwrap());
    assert!(body.contains("disabled"));
    assert!(body.contains(r#"data-field="price""#));
    assert!(body.contains(r#"data-field="bedrooms""#));
    assert!(body.contains("Faltan 2 campos obligatorios."));
}

#[test]
fn missing_listing_is_not_found() {
    let db = init_test_db();
    let err = handle(get("/listings/999"), &db).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn malformed_id_is_bad_request() {
    let db = init_test_db();
    let err = handle(get("/listings/abc"), &db).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = handle(get("/listings/0"), &db).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn unknown_route_is_not_found() {
    let db = init_test_db();
    assert!(matches!(handle(get("/nope"), &db), Err(ServerError::NotFound)));
}

#[test]
fn created_listing_is_returned_with_progress() {
    let db = init_test_db();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/listings")
        .header("Content-Type", "application/json")
        .body(astra::Body::from(
            r#"{ "title": "Chalet en Pozuelo", "city": "Pozuelo", "bedrooms": 5 }"#,
        ))
        .unwrap();

    let resp = handle(req, &db).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let json = crate::tests::utils::body_json(resp);
    let id = json["listing_id"].as_i64().expect("listing id");
    assert_eq!(json["completion"]["can_publish_to_portals"], false);
    assert_eq!(json["completion"]["mandatory"]["completed_count"], 2);

    let body = body_string(handle(get(&format!("/listings/{id}")), &db).unwrap());
    assert!(body.contains("Chalet en Pozuelo"));
}

#[test]
fn registered_image_moves_the_checklist() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 0);

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/listings/{id}/images"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(astra::Body::from("object_key=listings%2Ffachada.jpg"))
        .unwrap();
    let resp = handle(req, &db).expect("Handler failed");
    assert_eq!(resp.status(), 303);

    let count = db
        .with_conn(|conn| crate::db::images::count_images(conn, id))
        .unwrap();
    assert_eq!(count, 1);

    let body = body_string(handle(get(&format!("/listings/{id}")), &db).unwrap());
    assert!(!body.contains(r#"data-field="images""#));
}

#[test]
fn image_without_key_is_bad_request() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 0);

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/listings/{id}/images"))
        .body(astra::Body::from("object_key="))
        .unwrap();
    assert!(matches!(handle(req, &db), Err(ServerError::BadRequest(_))));
}

fn post_listing(json: &str) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri("/listings")
        .header("Content-Type", "application/json")
        .body(astra::Body::from(json.to_string()))
        .unwrap()
}

#[test]
fn unknown_operation_type_is_a_json_bad_request() {
    let db = init_test_db();

    let resp = handle(post_listing(r#"{ "listing_type": "venta" }"#), &db).unwrap();
    assert_eq!(resp.status(), 400);
    let json = crate::tests::utils::body_json(resp);
    assert!(json["error"].as_str().unwrap().contains("sale, rent"));

    let stored = db
        .with_conn(|conn| crate::db::listings::list_listings(conn))
        .unwrap();
    assert!(stored.is_empty());
}

#[test]
fn duplicate_reference_is_a_conflict() {
    let db = init_test_db();

    let first = handle(post_listing(r#"{ "reference": "R1" }"#), &db).unwrap();
    assert_eq!(first.status(), 200);

    let second = handle(post_listing(r#"{ "reference": "R1" }"#), &db).unwrap();
    assert_eq!(second.status(), 409);
    let json = crate::tests::utils::body_json(second);
    assert_eq!(json["status"], 409);
}
