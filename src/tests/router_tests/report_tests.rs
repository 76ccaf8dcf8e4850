use crate::router::handle;
use crate::tests::utils::{empty, init_test_db, publishable_listing, seed_listing};
use http::{Method, Request};
use std::io::Read;

#[test]
fn completion_report_downloads_xlsx() {
    let db = init_test_db();
    seed_listing(&db, &publishable_listing(), 1);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/admin/completion.xlsx")
        .body(empty())
        .unwrap();

    let resp = handle(req, &db).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"fichas_"));

    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
