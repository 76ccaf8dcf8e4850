use crate::domain::completion::GroupCompletion;
use crate::domain::stages::{ProcessStage, StageStatus};
use maud::{html, Markup};

const RING_RADIUS: f64 = 52.0;

/// Circular completion indicator.
pub fn progress_ring(percentage: u8) -> Markup {
    let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
    let offset = circumference * (1.0 - f64::from(percentage.min(100)) / 100.0);

    html! {
        div class="progress-ring" data-percentage=(percentage) {
            svg width="120" height="120" viewBox="0 0 120 120" {
                circle cx="60" cy="60" r=(RING_RADIUS) fill="none" stroke="#e5e7eb" stroke-width="10" {}
                circle
                    cx="60"
                    cy="60"
                    r=(RING_RADIUS)
                    fill="none"
                    stroke="#524ed2"
                    stroke-width="10"
                    stroke-linecap="round"
                    stroke-dasharray=(format!("{circumference:.2}"))
                    stroke-dashoffset=(format!("{offset:.2}"))
                    transform="rotate(-90 60 60)" {}
                text x="60" y="66" text-anchor="middle" font-size="22" { (percentage) "%" }
            }
        }
    }
}

pub fn status_chip(status: StageStatus) -> Markup {
    let (class, label) = match status {
        StageStatus::Accomplished => ("chip chip-done", "Completado"),
        StageStatus::Ongoing => ("chip chip-ongoing", "En curso"),
        StageStatus::Future => ("chip chip-future", "Pendiente"),
    };
    html! {
        span class=(class) data-status=(status.as_str()) { (label) }
    }
}

/// Horizontal stage timeline with one chip per sub-stage.
pub fn stage_timeline(stages: &[ProcessStage]) -> Markup {
    html! {
        ol class="stage-timeline" {
            @for stage in stages {
                li class="stage" data-stage=(stage.id) data-status=(stage.status.as_str()) {
                    div class="stage-header" {
                        h4 { (stage.label) }
                        (status_chip(stage.status))
                    }
                    ul class="sub-stages" {
                        @for sub in &stage.sub_stages {
                            li data-sub-stage=(sub.id) data-status=(sub.status.as_str()) {
                                span class="sub-stage-label" { (sub.label) }
                                (status_chip(sub.status))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Checklist of fields still missing in one group.
pub fn pending_fields(title: &str, group: &GroupCompletion) -> Markup {
    html! {
        section class="card pending-fields" {
            h3 { (title) " (" (group.completed_count) "/" (group.total) " · " (group.percentage()) "%)" }
            @if group.is_complete() {
                p class="text-green-700" { "Todo completo." }
            } @else {
                ul {
                    @for rule in &group.pending {
                        li data-field=(rule.id) {
                            (rule.label)
                            span class="text-xs text-gray-500" { " · " (rule.category) }
                        }
                    }
                }
            }
        }
    }
}
