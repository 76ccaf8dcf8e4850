// src/domain/fields.rs

use crate::domain::listing::{has_text, is_listing_type, is_positive, Listing};
use serde::Serialize;

/// One entry of the field checklist a listing ("ficha") is scored against.
///
/// `is_complete` gets the listing plus the number of images stored for it,
/// since images live in their own table and are counted separately.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldRule {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    #[serde(skip)]
    pub is_complete: fn(&Listing, i64) -> bool,
}

impl PartialEq for FieldRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FieldRule {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Required before the listing may be pushed to portals.
    Mandatory,
    /// Nice to have; counts towards the percentage only.
    Nth,
}

pub const CATEGORY_BASICS: &str = "Datos básicos";
pub const CATEGORY_LOCATION: &str = "Ubicación";
pub const CATEGORY_FEATURES: &str = "Características";
pub const CATEGORY_MEDIA: &str = "Multimedia";
pub const CATEGORY_COSTS: &str = "Gastos";

pub static MANDATORY_FIELDS: &[FieldRule] = &[
    FieldRule {
        id: "property_type",
        label: "Tipo de inmueble",
        category: CATEGORY_BASICS,
        is_complete: |l, _| has_text(&l.property_type),
    },
    FieldRule {
        id: "listing_type",
        label: "Tipo de operación",
        category: CATEGORY_BASICS,
        is_complete: |l, _| is_listing_type(&l.listing_type),
    },
    FieldRule {
        id: "street",
        label: "Dirección",
        category: CATEGORY_LOCATION,
        is_complete: |l, _| has_text(&l.street),
    },
    FieldRule {
        id: "city",
        label: "Ciudad",
        category: CATEGORY_LOCATION,
        is_complete: |l, _| has_text(&l.city),
    },
    FieldRule {
        id: "postal_code",
        label: "Código postal",
        category: CATEGORY_LOCATION,
        is_complete: |l, _| has_text(&l.postal_code),
    },
    FieldRule {
        id: "price",
        label: "Precio",
        category: CATEGORY_BASICS,
        is_complete: |l, _| is_positive(l.price),
    },
    FieldRule {
        id: "square_meter",
        label: "Superficie",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| is_positive(l.square_meter),
    },
    FieldRule {
        id: "bedrooms",
        label: "Dormitorios",
        category: CATEGORY_FEATURES,
        // 0 is valid (estudios, locales), only a missing value is pending.
        is_complete: |l, _| l.bedrooms.is_some_and(|n| n >= 0),
    },
    FieldRule {
        id: "bathrooms",
        label: "Baños",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| l.bathrooms.is_some_and(|n| n >= 0),
    },
    FieldRule {
        id: "description",
        label: "Descripción",
        category: CATEGORY_BASICS,
        is_complete: |l, _| has_text(&l.description),
    },
];

pub static NTH_FIELDS: &[FieldRule] = &[
    FieldRule {
        id: "images",
        label: "Fotografías",
        category: CATEGORY_MEDIA,
        is_complete: |_, image_count| image_count > 0,
    },
    FieldRule {
        id: "province",
        label: "Provincia",
        category: CATEGORY_LOCATION,
        is_complete: |l, _| has_text(&l.province),
    },
    FieldRule {
        id: "floor",
        label: "Planta",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| has_text(&l.floor),
    },
    FieldRule {
        id: "year_built",
        label: "Año de construcción",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| is_positive(l.year_built),
    },
    FieldRule {
        id: "energy_rating",
        label: "Certificado energético",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| has_text(&l.energy_rating),
    },
    FieldRule {
        id: "orientation",
        label: "Orientación",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| has_text(&l.orientation),
    },
    FieldRule {
        id: "has_elevator",
        label: "Ascensor",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| l.has_elevator.is_some(),
    },
    FieldRule {
        id: "has_garage",
        label: "Garaje",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| l.has_garage.is_some(),
    },
    FieldRule {
        id: "has_terrace",
        label: "Terraza",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| l.has_terrace.is_some(),
    },
    FieldRule {
        id: "is_furnished",
        label: "Amueblado",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| l.is_furnished.is_some(),
    },
    FieldRule {
        id: "condition",
        label: "Estado de conservación",
        category: CATEGORY_FEATURES,
        is_complete: |l, _| has_text(&l.condition),
    },
    FieldRule {
        id: "community_fees",
        label: "Gastos de comunidad",
        category: CATEGORY_COSTS,
        is_complete: |l, _| l.community_fees.is_some_and(|n| n >= 0),
    },
    FieldRule {
        id: "ibi",
        label: "IBI",
        category: CATEGORY_COSTS,
        is_complete: |l, _| l.ibi.is_some_and(|n| n >= 0),
    },
];

pub fn rules(group: FieldGroup) -> &'static [FieldRule] {
    match group {
        FieldGroup::Mandatory => MANDATORY_FIELDS,
        FieldGroup::Nth => NTH_FIELDS,
    }
}

pub fn total_fields() -> usize {
    MANDATORY_FIELDS.len() + NTH_FIELDS.len()
}
