use crate::domain::listing::Listing;
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{named_params, params, Connection, ErrorCode, OptionalExtension, Row};

const LISTING_COLUMNS: &str = r#"
    id, reference, title, description,
    property_type, listing_type,
    street, city, province, postal_code,
    price, square_meter, bedrooms, bathrooms, floor, year_built,
    energy_rating, orientation, has_elevator, has_garage, has_terrace, is_furnished, condition,
    community_fees, ibi,
    encargo, published_to_portals, visits_scheduled, visits_completed,
    offers_received, offer_accepted, deposit_signed, deed_scheduled, deed_signed, keys_delivered,
    created_at, updated_at
"#;

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get("id")?,
        reference: row.get("reference")?,
        title: row.get("title")?,
        description: row.get("description")?,
        property_type: row.get("property_type")?,
        listing_type: row.get("listing_type")?,
        street: row.get("street")?,
        city: row.get("city")?,
        province: row.get("province")?,
        postal_code: row.get("postal_code")?,
        price: row.get("price")?,
        square_meter: row.get("square_meter")?,
        bedrooms: row.get("bedrooms")?,
        bathrooms: row.get("bathrooms")?,
        floor: row.get("floor")?,
        year_built: row.get("year_built")?,
        energy_rating: row.get("energy_rating")?,
        orientation: row.get("orientation")?,
        has_elevator: row.get("has_elevator")?,
        has_garage: row.get("has_garage")?,
        has_terrace: row.get("has_terrace")?,
        is_furnished: row.get("is_furnished")?,
        condition: row.get("condition")?,
        community_fees: row.get("community_fees")?,
        ibi: row.get("ibi")?,
        encargo: row.get("encargo")?,
        published_to_portals: row.get("published_to_portals")?,
        visits_scheduled: row.get("visits_scheduled")?,
        visits_completed: row.get("visits_completed")?,
        offers_received: row.get("offers_received")?,
        offer_accepted: row.get("offer_accepted")?,
        deposit_signed: row.get("deposit_signed")?,
        deed_scheduled: row.get("deed_scheduled")?,
        deed_signed: row.get("deed_signed")?,
        keys_delivered: row.get("keys_delivered")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn get_listing(conn: &Connection, id: i64) -> Result<Option<Listing>, ServerError> {
    let sql = format!("select {LISTING_COLUMNS} from listings where id = ?");
    conn.query_row(&sql, params![id], listing_from_row)
        .optional()
        .map_err(|e| ServerError::DbError(format!("failed to load listing {id}: {e}")))
}

/// All listings, most recently touched first.
pub fn list_listings(conn: &Connection) -> Result<Vec<Listing>, ServerError> {
    let sql = format!("select {LISTING_COLUMNS} from listings order by updated_at desc, id desc");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], listing_from_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Inserts a listing and returns its new id. `listing.id` is ignored.
pub fn insert_listing(
    conn: &Connection,
    listing: &Listing,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    let flag = |v: Option<bool>| v.unwrap_or(false);
    let count = |v: Option<i64>| v.unwrap_or(0);

    conn.execute(
        r#"
        insert into listings (
            reference, title, description,
            property_type, listing_type,
            street, city, province, postal_code,
            price, square_meter, bedrooms, bathrooms, floor, year_built,
            energy_rating, orientation, has_elevator, has_garage, has_terrace, is_furnished, condition,
            community_fees, ibi,
            encargo, published_to_portals, visits_scheduled, visits_completed,
            offers_received, offer_accepted, deposit_signed, deed_scheduled, deed_signed, keys_delivered,
            created_at, updated_at
        ) values (
            :reference, :title, :description,
            :property_type, :listing_type,
            :street, :city, :province, :postal_code,
            :price, :square_meter, :bedrooms, :bathrooms, :floor, :year_built,
            :energy_rating, :orientation, :has_elevator, :has_garage, :has_terrace, :is_furnished, :condition,
            :community_fees, :ibi,
            :encargo, :published_to_portals, :visits_scheduled, :visits_completed,
            :offers_received, :offer_accepted, :deposit_signed, :deed_scheduled, :deed_signed, :keys_delivered,
            :now, :now
        )
        "#,
        named_params! {
            ":reference": listing.reference,
            ":title": listing.title,
            ":description": listing.description,
            ":property_type": listing.property_type,
            ":listing_type": listing.listing_type,
            ":street": listing.street,
            ":city": listing.city,
            ":province": listing.province,
            ":postal_code": listing.postal_code,
            ":price": listing.price,
            ":square_meter": listing.square_meter,
            ":bedrooms": listing.bedrooms,
            ":bathrooms": listing.bathrooms,
            ":floor": listing.floor,
            ":year_built": listing.year_built,
            ":energy_rating": listing.energy_rating,
            ":orientation": listing.orientation,
            ":has_elevator": listing.has_elevator,
            ":has_garage": listing.has_garage,
            ":has_terrace": listing.has_terrace,
            ":is_furnished": listing.is_furnished,
            ":condition": listing.condition,
            ":community_fees": listing.community_fees,
            ":ibi": listing.ibi,
            ":encargo": flag(listing.encargo),
            ":published_to_portals": flag(listing.published_to_portals),
            ":visits_scheduled": count(listing.visits_scheduled),
            ":visits_completed": count(listing.visits_completed),
            ":offers_received": count(listing.offers_received),
            ":offer_accepted": flag(listing.offer_accepted),
            ":deposit_signed": flag(listing.deposit_signed),
            ":deed_scheduled": flag(listing.deed_scheduled),
            ":deed_signed": flag(listing.deed_signed),
            ":keys_delivered": flag(listing.keys_delivered),
            ":now": now,
        },
    )
    .map_err(insert_error)?;

    Ok(conn.last_insert_rowid())
}

/// Constraint failures come from the client's data, not from the store.
fn insert_error(e: rusqlite::Error) -> ServerError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            ServerError::Conflict("a listing with this reference already exists".into())
        }
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            ServerError::BadRequest(format!("listing rejected: {e}"))
        }
        _ => ServerError::DbError(format!("insert listing failed: {e}")),
    }
}

/// Flags the listing as published and records the publication, atomically.
pub fn mark_published(
    conn: &mut Connection,
    listing_id: i64,
    percentage: u8,
    now: NaiveDateTime,
) -> Result<(), ServerError> {
    let tx = conn.transaction()?;

    let updated = tx
        .execute(
            "update listings set published_to_portals = 1, updated_at = ?2 where id = ?1",
            params![listing_id, now],
        )
        .map_err(|e| ServerError::DbError(format!("publish update failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }

    tx.execute(
        r#"
        insert into portal_publications (listing_id, percentage, published_at)
        values (?1, ?2, ?3)
        "#,
        params![listing_id, percentage, now],
    )
    .map_err(|e| ServerError::DbError(format!("publication insert failed: {e}")))?;

    tx.commit()?;
    Ok(())
}

/// How many times the listing has been pushed to portals.
pub fn count_publications(conn: &Connection, listing_id: i64) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from portal_publications where listing_id = ?",
        params![listing_id],
        |row| row.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count publications failed: {e}")))
}
