// src/domain/completion.rs

use crate::domain::fields::{rules, total_fields, FieldGroup, FieldRule};
use crate::domain::listing::Listing;
use serde::Serialize;

/// Completed / pending split for one group of rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCompletion {
    pub completed: Vec<&'static FieldRule>,
    pub pending: Vec<&'static FieldRule>,
    pub total: usize,
    pub completed_count: usize,
}

impl GroupCompletion {
    fn evaluate(group: FieldGroup, listing: &Listing, image_count: i64) -> Self {
        let (completed, pending): (Vec<_>, Vec<_>) = rules(group)
            .iter()
            .partition(|rule| (rule.is_complete)(listing, image_count));

        GroupCompletion {
            total: completed.len() + pending.len(),
            completed_count: completed.len(),
            completed,
            pending,
        }
    }

    pub fn percentage(&self) -> u8 {
        rounded_percentage(self.completed_count, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Result of scoring a listing against the field checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionResult {
    pub mandatory: GroupCompletion,
    pub nth: GroupCompletion,
    pub overall_percentage: u8,
    pub can_publish_to_portals: bool,
}

impl CompletionResult {
    pub fn completed_total(&self) -> usize {
        self.mandatory.completed_count + self.nth.completed_count
    }
}

/// Scores `listing` against both rule groups.
///
/// Never fails: a missing value is just a pending field. Only mandatory fields
/// gate publication; optional ones only move the percentage.
pub fn calculate_completion(listing: &Listing, image_count: i64) -> CompletionResult {
    let image_count = image_count.max(0);

    let mandatory = GroupCompletion::evaluate(FieldGroup::Mandatory, listing, image_count);
    let nth = GroupCompletion::evaluate(FieldGroup::Nth, listing, image_count);

    let completed = mandatory.completed_count + nth.completed_count;
    let overall_percentage = rounded_percentage(completed, total_fields());
    let can_publish_to_portals = mandatory.pending.is_empty();

    CompletionResult {
        mandatory,
        nth,
        overall_percentage,
        can_publish_to_portals,
    }
}

/// `round(100 * part / total)`, halves rounded up. An empty total reads as 0.
fn rounded_percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total);
    ((200 * part + total) / (2 * total)) as u8
}
