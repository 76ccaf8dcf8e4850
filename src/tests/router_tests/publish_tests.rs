use crate::db::listings::{count_publications, get_listing};
use crate::domain::listing::Listing;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, empty, init_test_db, publishable_listing, seed_listing};
use http::{Method, Request};

fn post(uri: &str) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(empty())
        .unwrap()
}

#[test]
fn complete_listing_is_published() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 0);

    let resp = handle(post(&format!("/listings/{id}/publish")), &db).expect("Handler failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        format!("/listings/{id}")
    );

    let stored = db.with_conn(|conn| get_listing(conn, id)).unwrap().unwrap();
    assert_eq!(stored.published_to_portals, Some(true));
    assert_eq!(db.with_conn(|conn| count_publications(conn, id)).unwrap(), 1);
}

#[test]
fn publishing_twice_records_once() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 0);

    handle(post(&format!("/listings/{id}/publish")), &db).unwrap();
    let resp = handle(post(&format!("/listings/{id}/publish")), &db).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(db.with_conn(|conn| count_publications(conn, id)).unwrap(), 1);
}

#[test]
fn listing_page_shows_publication_count() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 0);
    let page = |db: &crate::db::Database| {
        let req = Request::builder()
            .uri(format!("/listings/{id}"))
            .body(empty())
            .unwrap();
        body_string(handle(req, db).unwrap())
    };

    assert!(page(&db).contains("Publicaciones: <strong>0</strong>"));
    handle(post(&format!("/listings/{id}/publish")), &db).unwrap();
    assert!(page(&db).contains("Publicaciones: <strong>1</strong>"));
}

#[test]
fn incomplete_listing_is_refused() {
    let db = init_test_db();
    let listing = Listing {
        price: None,
        ..publishable_listing()
    };
    let id = seed_listing(&db, &listing, 4);

    let err = handle(post(&format!("/listings/{id}/publish")), &db).unwrap_err();
    match err {
        ServerError::Conflict(msg) => assert!(msg.contains("Precio"), "got: {msg}"),
        other => panic!("expected conflict, got {other:?}"),
    }

    let stored = db.with_conn(|conn| get_listing(conn, id)).unwrap().unwrap();
    assert_eq!(stored.published_to_portals, Some(false));
    assert_eq!(db.with_conn(|conn| count_publications(conn, id)).unwrap(), 0);
}

#[test]
fn publishing_unknown_listing_is_not_found() {
    let db = init_test_db();
    let err = handle(post("/listings/77/publish"), &db).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}
