// src/domain/stages.rs

use crate::domain::completion::{calculate_completion, CompletionResult};
use crate::domain::listing::{count_of, is_true, Listing};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Accomplished,
    Ongoing,
    Future,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Accomplished => "accomplished",
            StageStatus::Ongoing => "ongoing",
            StageStatus::Future => "future",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubStage {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StageStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStage {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StageStatus,
    pub sub_stages: Vec<SubStage>,
}

impl ProcessStage {
    pub fn sub_stage(&self, id: &str) -> Option<&SubStage> {
        self.sub_stages.iter().find(|s| s.id == id)
    }

    fn refresh_status(&mut self) {
        self.status = aggregate_status(&self.sub_stages);
    }

    fn force_future(&mut self) {
        for sub in &mut self.sub_stages {
            sub.status = StageStatus::Future;
        }
        self.status = StageStatus::Future;
    }
}

pub const STAGE_OPORTUNIDAD: &str = "oportunidad";
pub const STAGE_BUSQUEDA: &str = "busqueda";
pub const STAGE_CIERRE: &str = "cierre";

pub const SUB_CAPTACION: &str = "captacion";
pub const SUB_FICHA_COMPLETA: &str = "ficha_completa";
pub const SUB_ENCARGO: &str = "encargo";
pub const SUB_PUBLICACION: &str = "publicacion";
pub const SUB_VISITAS: &str = "visitas";
pub const SUB_OFERTAS: &str = "ofertas";
pub const SUB_ARRAS: &str = "arras";
pub const SUB_ESCRITURA: &str = "escritura";
pub const SUB_ENTREGA: &str = "entrega";

struct StageDefinition {
    id: &'static str,
    label: &'static str,
    sub_stages: &'static [SubStageDefinition],
}

struct SubStageDefinition {
    id: &'static str,
    label: &'static str,
    default_status: StageStatus,
}

const fn sub(id: &'static str, label: &'static str, default_status: StageStatus) -> SubStageDefinition {
    SubStageDefinition {
        id,
        label,
        default_status,
    }
}

/// The sales pipeline, in order. Default statuses are what a skeleton UI shows
/// before any listing is loaded.
static STAGE_DEFINITIONS: &[StageDefinition] = &[
    StageDefinition {
        id: STAGE_OPORTUNIDAD,
        label: "Oportunidad",
        sub_stages: &[
            sub(SUB_CAPTACION, "Captación", StageStatus::Accomplished),
            sub(SUB_FICHA_COMPLETA, "Ficha completa", StageStatus::Accomplished),
            sub(SUB_ENCARGO, "Encargo", StageStatus::Accomplished),
        ],
    },
    StageDefinition {
        id: STAGE_BUSQUEDA,
        label: "Búsqueda",
        sub_stages: &[
            sub(SUB_PUBLICACION, "Publicación en portales", StageStatus::Accomplished),
            sub(SUB_VISITAS, "Visitas", StageStatus::Ongoing),
            sub(SUB_OFERTAS, "Ofertas", StageStatus::Future),
        ],
    },
    StageDefinition {
        id: STAGE_CIERRE,
        label: "Cierre",
        sub_stages: &[
            sub(SUB_ARRAS, "Arras", StageStatus::Future),
            sub(SUB_ESCRITURA, "Escritura", StageStatus::Future),
            sub(SUB_ENTREGA, "Entrega de llaves", StageStatus::Future),
        ],
    },
];

/// A fresh copy of the stage table with its default statuses.
pub fn default_stages() -> Vec<ProcessStage> {
    STAGE_DEFINITIONS
        .iter()
        .map(|def| {
            let sub_stages: Vec<SubStage> = def
                .sub_stages
                .iter()
                .map(|s| SubStage {
                    id: s.id,
                    label: s.label,
                    status: s.default_status,
                })
                .collect();
            ProcessStage {
                id: def.id,
                label: def.label,
                status: aggregate_status(&sub_stages),
                sub_stages,
            }
        })
        .collect()
}

/// Resolves the pipeline for a listing. Without one, returns the default table.
pub fn get_process_stages(listing: Option<&Listing>, image_count: i64) -> Vec<ProcessStage> {
    match listing {
        None => default_stages(),
        Some(listing) => {
            let completion = calculate_completion(listing, image_count);
            resolve_stages(listing, &completion)
        }
    }
}

/// Same as [`get_process_stages`] for callers that already scored the listing.
pub fn resolve_stages(listing: &Listing, completion: &CompletionResult) -> Vec<ProcessStage> {
    let mut stages = default_stages();

    for stage in &mut stages {
        for sub in &mut stage.sub_stages {
            sub.status = status_from_data(sub.id, listing, completion);
        }
    }

    if let Some((stage_idx, sub_idx)) = locate(&stages, SUB_FICHA_COMPLETA) {
        if completion.can_publish_to_portals {
            tracing::debug!(
                listing_id = ?listing.id,
                percentage = completion.overall_percentage,
                "ficha complete"
            );
            stages[stage_idx].sub_stages[sub_idx].status = StageStatus::Accomplished;
            apply_encargo_gate(&mut stages, listing);
        } else {
            tracing::debug!(
                listing_id = ?listing.id,
                pending = completion.mandatory.pending.len(),
                "ficha incomplete, later stages held back"
            );
            stages[stage_idx].sub_stages[sub_idx].status = StageStatus::Future;
            hold_back_after(&mut stages, stage_idx, sub_idx);
        }
    }

    for stage in &mut stages {
        validate_substage_progression(&mut stage.sub_stages);
        stage.refresh_status();
    }

    // A stage can only move once every stage before it is done.
    let mut blocked = false;
    for stage in &mut stages {
        if blocked {
            stage.force_future();
        } else if stage.status != StageStatus::Accomplished {
            blocked = true;
        }
    }

    stages
}

/// Encargo decides whether the listing may leave Oportunidad at all.
fn apply_encargo_gate(stages: &mut [ProcessStage], listing: &Listing) {
    let Some((stage_idx, sub_idx)) = locate(stages, SUB_ENCARGO) else {
        return;
    };

    if listing.has_signed_encargo() {
        stages[stage_idx].sub_stages[sub_idx].status = StageStatus::Accomplished;
        return;
    }

    // Visits or offers recorded without a signed encargo are still held back.
    tracing::info!(
        listing_id = ?listing.id,
        "encargo not signed, stages after {} set to future",
        stages[stage_idx].id
    );
    stages[stage_idx].sub_stages[sub_idx].status = StageStatus::Ongoing;
    for stage in stages.iter_mut().skip(stage_idx + 1) {
        stage.force_future();
    }
}

/// Everything after `(stage_idx, sub_idx)` becomes future, across stages too.
fn hold_back_after(stages: &mut [ProcessStage], stage_idx: usize, sub_idx: usize) {
    for sub in stages[stage_idx].sub_stages.iter_mut().skip(sub_idx + 1) {
        sub.status = StageStatus::Future;
    }
    for stage in stages.iter_mut().skip(stage_idx + 1) {
        stage.force_future();
    }
}

/// Keeps one stage's sub-stages monotonic: accomplished ones form a prefix.
/// After the first unfinished sub-stage a later one may be ongoing but never
/// accomplished.
///
/// Returns how many sub-stages were capped.
pub fn validate_substage_progression(sub_stages: &mut [SubStage]) -> usize {
    let mut capped = 0;
    let mut blocked = false;

    for sub in sub_stages.iter_mut() {
        if blocked {
            if sub.status == StageStatus::Accomplished {
                tracing::trace!(sub_stage = sub.id, "capped at ongoing");
                sub.status = StageStatus::Ongoing;
                capped += 1;
            }
        } else if sub.status != StageStatus::Accomplished {
            blocked = true;
        }
    }

    capped
}

pub fn aggregate_status(sub_stages: &[SubStage]) -> StageStatus {
    if sub_stages.is_empty() {
        return StageStatus::Future;
    }
    if sub_stages.iter().all(|s| s.status == StageStatus::Accomplished) {
        StageStatus::Accomplished
    } else if sub_stages.iter().all(|s| s.status == StageStatus::Future) {
        StageStatus::Future
    } else {
        StageStatus::Ongoing
    }
}

/// The first sub-stage that is not accomplished yet, with its stage.
/// `None` once the whole pipeline is done.
pub fn current_step(stages: &[ProcessStage]) -> Option<(&ProcessStage, &SubStage)> {
    stages.iter().find_map(|stage| {
        stage
            .sub_stages
            .iter()
            .find(|s| s.status != StageStatus::Accomplished)
            .map(|sub| (stage, sub))
    })
}

fn locate(stages: &[ProcessStage], sub_id: &str) -> Option<(usize, usize)> {
    stages.iter().enumerate().find_map(|(i, stage)| {
        stage
            .sub_stages
            .iter()
            .position(|s| s.id == sub_id)
            .map(|j| (i, j))
    })
}

/// Status a sub-stage would have judging only by the listing's own data.
fn status_from_data(sub_id: &str, listing: &Listing, completion: &CompletionResult) -> StageStatus {
    let done_or = |done: bool, started: bool| {
        if done {
            StageStatus::Accomplished
        } else if started {
            StageStatus::Ongoing
        } else {
            StageStatus::Future
        }
    };

    match sub_id {
        // The record exists, so the property has been captured.
        SUB_CAPTACION => StageStatus::Accomplished,
        SUB_FICHA_COMPLETA => done_or(completion.can_publish_to_portals, false),
        SUB_ENCARGO => done_or(listing.has_signed_encargo(), true),
        SUB_PUBLICACION => done_or(
            is_true(listing.published_to_portals),
            completion.can_publish_to_portals,
        ),
        SUB_VISITAS => done_or(
            count_of(listing.visits_completed) > 0,
            count_of(listing.visits_scheduled) > 0,
        ),
        SUB_OFERTAS => done_or(
            is_true(listing.offer_accepted),
            count_of(listing.offers_received) > 0,
        ),
        SUB_ARRAS => done_or(is_true(listing.deposit_signed), false),
        SUB_ESCRITURA => done_or(is_true(listing.deed_signed), is_true(listing.deed_scheduled)),
        SUB_ENTREGA => done_or(is_true(listing.keys_delivered), false),
        _ => StageStatus::Future,
    }
}
