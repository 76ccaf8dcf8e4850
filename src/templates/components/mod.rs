use maud::{html, Markup};

pub mod error;
pub mod progress;

pub use error::error_page;
pub use progress::{pending_fields, progress_ring, stage_timeline, status_chip};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
