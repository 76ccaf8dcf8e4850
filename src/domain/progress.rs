// src/domain/progress.rs

use crate::domain::completion::{calculate_completion, CompletionResult};
use crate::domain::listing::Listing;
use crate::domain::stages::{current_step, resolve_stages, ProcessStage};
use serde::Serialize;

/// Everything the listing page, the JSON endpoint and the report need about
/// one listing, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingProgress {
    pub listing_id: Option<i64>,
    pub image_count: i64,
    pub completion: CompletionResult,
    pub stages: Vec<ProcessStage>,
}

impl ListingProgress {
    pub fn evaluate(listing: &Listing, image_count: i64) -> Self {
        let image_count = image_count.max(0);
        let completion = calculate_completion(listing, image_count);
        let stages = resolve_stages(listing, &completion);

        ListingProgress {
            listing_id: listing.id,
            image_count,
            completion,
            stages,
        }
    }

    /// "Stage · sub-stage" of the first unfinished step, or "Completado".
    pub fn current_step_label(&self) -> String {
        match current_step(&self.stages) {
            Some((stage, sub)) => format!("{} · {}", stage.label, sub.label),
            None => "Completado".to_string(),
        }
    }
}
