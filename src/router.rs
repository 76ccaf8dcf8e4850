use crate::db::images::{add_image, image_count_or_zero};
use crate::db::listings::{
    count_publications, get_listing, insert_listing, list_listings, mark_published,
};
use crate::db::Database;
use crate::domain::listing::{is_listing_type, Listing, LISTING_TYPES};
use crate::domain::progress::ListingProgress;
use crate::domain::stages::get_process_stages;
use crate::errors::ServerError;
use crate::responses::{html_response, json_error_response, json_response, redirect, ResultResp};
use crate::spreadsheets::{export_completion_xlsx, CompletionReportRow};
use crate::templates::pages::{listing_page, listings_page, ListingRowVm};
use astra::Request;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

pub fn handle(req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let query = parse_query(&req);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => index(db, &query),
        ("GET", ["listings", id]) => show_listing(db, parse_id(id)?),
        ("POST", ["listings", id, "publish"]) => publish(db, parse_id(id)?),
        ("POST", ["listings", id, "images"]) => {
            let id = parse_id(id)?;
            register_image(db, id, req)
        }
        ("GET", ["admin", "completion.xlsx"]) => completion_report(db),

        // JSON API: errors are answered as JSON too.
        ("GET", ["listings", id, "progress.json"]) => {
            json_route(parse_id(id).and_then(|id| load_progress(db, id)))
        }
        ("GET", ["stages", "default.json"]) => json_response(&get_process_stages(None, 0)),
        ("POST", ["completion"]) => json_route(evaluate_body(req)),
        ("POST", ["listings"]) => json_route(create_listing(db, req)),

        _ => Err(ServerError::NotFound),
    }
}

fn json_route<T: serde::Serialize>(result: Result<T, ServerError>) -> ResultResp {
    match result {
        Ok(value) => json_response(&value),
        Err(err) => Ok(json_error_response(err)),
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ServerError::BadRequest(format!("invalid listing id '{raw}'")))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Loads a listing and evaluates it. The image count comes from its own table
/// and falls back to zero.
fn load_listing_progress(db: &Database, id: i64) -> Result<(Listing, ListingProgress), ServerError> {
    let listing = db
        .with_conn(|conn| get_listing(conn, id))?
        .ok_or(ServerError::NotFound)?;
    let image_count = image_count_or_zero(db, id);
    let progress = ListingProgress::evaluate(&listing, image_count);
    Ok((listing, progress))
}

fn load_progress(db: &Database, id: i64) -> Result<ListingProgress, ServerError> {
    load_listing_progress(db, id).map(|(_, progress)| progress)
}

fn all_listing_rows(db: &Database) -> Result<Vec<ListingRowVm>, ServerError> {
    let listings = db.with_conn(|conn| list_listings(conn))?;
    Ok(listings
        .into_iter()
        .map(|listing| {
            let image_count = listing.id.map(|id| image_count_or_zero(db, id)).unwrap_or(0);
            let progress = ListingProgress::evaluate(&listing, image_count);
            ListingRowVm { listing, progress }
        })
        .collect())
}

fn index(db: &Database, query: &HashMap<String, String>) -> ResultResp {
    let mut rows = all_listing_rows(db)?;

    if let Some(city) = query.get("city").filter(|c| !c.trim().is_empty()) {
        rows.retain(|row| {
            row.listing
                .city
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(city.trim()))
        });
    }
    if query.get("publishable").map(String::as_str) == Some("1") {
        rows.retain(|row| row.progress.completion.can_publish_to_portals);
    }

    html_response(listings_page(&rows))
}

fn show_listing(db: &Database, id: i64) -> ResultResp {
    let (listing, progress) = load_listing_progress(db, id)?;
    let publications = db.with_conn(|conn| count_publications(conn, id))?;
    html_response(listing_page(&listing, &progress, publications))
}

/// Publishing is only allowed once every mandatory field is filled in.
fn publish(db: &Database, id: i64) -> ResultResp {
    let (listing, progress) = load_listing_progress(db, id)?;
    let completion = &progress.completion;

    if !completion.can_publish_to_portals {
        let missing: Vec<&str> = completion.mandatory.pending.iter().map(|r| r.label).collect();
        tracing::info!(listing_id = id, pending = missing.len(), "publish refused");
        return Err(ServerError::Conflict(format!(
            "Faltan campos obligatorios: {}",
            missing.join(", ")
        )));
    }

    if listing.published_to_portals == Some(true) {
        return redirect(&format!("/listings/{id}"));
    }

    let now = Utc::now().naive_utc();
    db.with_conn(|conn| mark_published(conn, id, completion.overall_percentage, now))?;
    tracing::info!(
        listing_id = id,
        percentage = completion.overall_percentage,
        "listing published to portals"
    );

    redirect(&format!("/listings/{id}"))
}

fn completion_report(db: &Database) -> ResultResp {
    let rows: Vec<CompletionReportRow> = all_listing_rows(db)?
        .iter()
        .map(|row| CompletionReportRow::new(&row.listing, &row.progress))
        .collect();

    let date = Utc::now().format("%Y-%m-%d").to_string();
    export_completion_xlsx(&rows, &date)
}

/// Records an image already uploaded to object storage. Form field: `object_key`.
fn register_image(db: &Database, id: i64, req: Request) -> ResultResp {
    let body = read_body(req)?;
    let object_key = url::form_urlencoded::parse(&body)
        .find(|(k, _)| k == "object_key")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing object_key".into()))?;

    let now = Utc::now().naive_utc();
    db.with_conn(|conn| {
        if get_listing(conn, id)?.is_none() {
            return Err(ServerError::NotFound);
        }
        add_image(conn, id, &object_key, now)
    })?;
    tracing::debug!(listing_id = id, %object_key, "image registered");

    redirect(&format!("/listings/{id}"))
}

fn create_listing(db: &Database, req: Request) -> Result<ListingProgress, ServerError> {
    let body = read_body(req)?;
    let listing: Listing = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid listing json: {e}")))?;

    if listing.listing_type.is_some() && !is_listing_type(&listing.listing_type) {
        return Err(ServerError::BadRequest(format!(
            "listing_type must be one of: {}",
            LISTING_TYPES.join(", ")
        )));
    }

    let now = Utc::now().naive_utc();
    let id = db.with_conn(|conn| insert_listing(conn, &listing, now))?;
    tracing::info!(listing_id = id, "listing created");

    load_progress(db, id)
}

/// Largest request body accepted by the POST routes.
pub const MAX_BODY: u64 = 1024 * 1024;

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = Vec::new();
    req.into_body()
        .reader()
        .take(MAX_BODY + 1)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;

    if body.len() as u64 > MAX_BODY {
        return Err(ServerError::BadRequest(format!(
            "request body larger than {MAX_BODY} bytes"
        )));
    }
    Ok(body)
}

/// A listing-like record posted as JSON, scored without touching the database.
#[derive(Debug, Deserialize)]
struct EvaluateRequest {
    #[serde(default)]
    image_count: i64,
    #[serde(flatten)]
    listing: Listing,
}

fn evaluate_body(req: Request) -> Result<ListingProgress, ServerError> {
    let body = read_body(req)?;
    let parsed: EvaluateRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid listing json: {e}")))?;

    Ok(ListingProgress::evaluate(&parsed.listing, parsed.image_count))
}
