use crate::db::connection::Database;
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

pub fn count_images(conn: &Connection, listing_id: i64) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from listing_images where listing_id = ?",
        params![listing_id],
        |row| row.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count images for listing {listing_id}: {e}")))
}

/// Registers an image already uploaded to object storage under `object_key`.
pub fn add_image(
    conn: &Connection,
    listing_id: i64,
    object_key: &str,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into listing_images (listing_id, object_key, position, created_at)
        values (
            ?1, ?2,
            (select coalesce(max(position), -1) + 1 from listing_images where listing_id = ?1),
            ?3
        )
        "#,
        params![listing_id, object_key, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert image failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Image count for the completion checklist.
///
/// A failed lookup must not break the page: it is logged and read as zero,
/// which at worst shows the photos field as pending.
pub fn image_count_or_zero(db: &Database, listing_id: i64) -> i64 {
    match db.with_conn(|conn| count_images(conn, listing_id)) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(listing_id, error = %e, "image count unavailable, using 0");
            0
        }
    }
}
