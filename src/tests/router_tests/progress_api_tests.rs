use crate::router::{handle, MAX_BODY};
use crate::tests::utils::{body_json, empty, init_test_db, publishable_listing, seed_listing};
use crate::domain::listing::Listing;
use astra::Body;
use http::{Method, Request};

fn get(uri: &str) -> astra::Request {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(empty())
        .unwrap()
}

#[test]
fn progress_json_counts_images_from_their_table() {
    let db = init_test_db();
    let id = seed_listing(&db, &publishable_listing(), 3);

    let resp = handle(get(&format!("/listings/{id}/progress.json")), &db).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let json = body_json(resp);
    assert_eq!(json["listing_id"], id);
    assert_eq!(json["image_count"], 3);
    assert_eq!(json["completion"]["can_publish_to_portals"], true);
    let nth_done: Vec<&str> = json["completion"]["nth"]["completed"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    assert!(nth_done.contains(&"images"));
}

#[test]
fn progress_json_errors_are_json() {
    let db = init_test_db();
    let resp = handle(get("/listings/4242/progress.json"), &db).unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["status"], 404);
}

#[test]
fn default_stages_json_is_the_skeleton() {
    let db = init_test_db();
    let json = body_json(handle(get("/stages/default.json"), &db).unwrap());
    let statuses: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["accomplished", "ongoing", "future"]);
}

#[test]
fn posted_listing_is_scored_without_storage() {
    let db = init_test_db();
    let listing = Listing {
        encargo: Some(true),
        ..publishable_listing()
    };
    let mut payload = serde_json::to_value(&listing).unwrap();
    payload["image_count"] = serde_json::json!(0);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/completion")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let json = body_json(handle(req, &db).unwrap());
    assert_eq!(json["completion"]["can_publish_to_portals"], true);
    assert_eq!(json["stages"][0]["status"], "accomplished");
    assert_eq!(json["stages"][1]["sub_stages"][0]["status"], "ongoing");
}

#[test]
fn posted_garbage_is_a_json_bad_request() {
    let db = init_test_db();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/completion")
        .body(Body::from("not json"))
        .unwrap();

    let resp = handle(req, &db).unwrap();
    assert_eq!(resp.status(), 400);
}

#[test]
fn oversized_body_is_rejected() {
    let db = init_test_db();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/completion")
        .body(Body::from(" ".repeat(MAX_BODY as usize + 1)))
        .unwrap();

    let resp = handle(req, &db).unwrap();
    assert_eq!(resp.status(), 400);
    let json = body_json(resp);
    assert!(json["error"].as_str().unwrap().contains("larger than"));
}

#[test]
fn body_at_the_limit_is_read() {
    let db = init_test_db();
    let payload = r#"{ "bedrooms": 2 }"#;
    let padded = format!("{payload}{}", " ".repeat(MAX_BODY as usize - payload.len()));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/completion")
        .body(Body::from(padded))
        .unwrap();

    let resp = handle(req, &db).unwrap();
    assert_eq!(resp.status(), 200);
}
