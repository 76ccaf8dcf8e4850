// src/domain/listing.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A brokerage listing as stored in the `listings` table.
///
/// Every field a completion rule or a pipeline stage can look at lives here.
/// All of them are optional: a listing is created early (on captación) and
/// filled in over time, so `None` simply means "not provided yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub id: Option<i64>,
    pub reference: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,

    // Basics
    pub property_type: Option<String>, // piso, casa, local...
    pub listing_type: Option<String>,  // sale | rent

    // Location
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,

    // Figures
    pub price: Option<i64>,
    pub square_meter: Option<i64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub floor: Option<String>,
    pub year_built: Option<i64>,

    // Features
    pub energy_rating: Option<String>,
    pub orientation: Option<String>,
    pub has_elevator: Option<bool>,
    pub has_garage: Option<bool>,
    pub has_terrace: Option<bool>,
    pub is_furnished: Option<bool>,
    pub condition: Option<String>,

    // Running costs
    pub community_fees: Option<i64>,
    pub ibi: Option<i64>,

    // Pipeline
    pub encargo: Option<bool>,
    pub published_to_portals: Option<bool>,
    pub visits_scheduled: Option<i64>,
    pub visits_completed: Option<i64>,
    pub offers_received: Option<i64>,
    pub offer_accepted: Option<bool>,
    pub deposit_signed: Option<bool>,
    pub deed_scheduled: Option<bool>,
    pub deed_signed: Option<bool>,
    pub keys_delivered: Option<bool>,

    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// A text field counts only when it has something other than whitespace.
pub fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Operation types the `listings` table accepts.
pub const LISTING_TYPES: &[&str] = &["sale", "rent"];

pub fn is_listing_type(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| LISTING_TYPES.contains(&v))
}

pub fn is_positive(value: Option<i64>) -> bool {
    value.is_some_and(|n| n > 0)
}

pub fn is_true(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

pub fn count_of(value: Option<i64>) -> i64 {
    value.unwrap_or(0).max(0)
}

impl Listing {
    /// Short label used in tables and page titles.
    pub fn display_name(&self) -> String {
        if has_text(&self.title) {
            return self.title.clone().unwrap_or_default();
        }
        match (&self.reference, &self.street) {
            (Some(r), _) if !r.trim().is_empty() => r.clone(),
            (_, Some(s)) if !s.trim().is_empty() => s.clone(),
            _ => match self.id {
                Some(id) => format!("Inmueble #{id}"),
                None => "Inmueble sin referencia".to_string(),
            },
        }
    }

    pub fn has_signed_encargo(&self) -> bool {
        is_true(self.encargo)
    }
}
