// src/domain/fixtures.rs
//! Listings shared by the unit tests.

use crate::domain::listing::Listing;

/// Every mandatory field filled in, nothing else.
pub fn mandatory_only() -> Listing {
    Listing {
        id: Some(1),
        reference: Some("REF-0001".into()),
        property_type: Some("piso".into()),
        listing_type: Some("sale".into()),
        street: Some("Calle Mayor 1".into()),
        city: Some("Madrid".into()),
        postal_code: Some("28013".into()),
        price: Some(320_000),
        square_meter: Some(85),
        bedrooms: Some(3),
        bathrooms: Some(2),
        description: Some("Piso exterior reformado".into()),
        ..Default::default()
    }
}

/// A listing that has gone all the way to key handover.
pub fn complete_listing() -> Listing {
    Listing {
        title: Some("Ático con terraza en Chamberí".into()),
        province: Some("Madrid".into()),
        floor: Some("5".into()),
        year_built: Some(1965),
        energy_rating: Some("D".into()),
        orientation: Some("sur".into()),
        has_elevator: Some(true),
        has_garage: Some(false),
        has_terrace: Some(true),
        is_furnished: Some(false),
        condition: Some("reformado".into()),
        community_fees: Some(120),
        ibi: Some(450),
        encargo: Some(true),
        published_to_portals: Some(true),
        visits_scheduled: Some(6),
        visits_completed: Some(5),
        offers_received: Some(2),
        offer_accepted: Some(true),
        deposit_signed: Some(true),
        deed_scheduled: Some(true),
        deed_signed: Some(true),
        keys_delivered: Some(true),
        ..mandatory_only()
    }
}
