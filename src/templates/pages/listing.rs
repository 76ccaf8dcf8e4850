use crate::domain::fields::total_fields;
use crate::domain::listing::Listing;
use crate::domain::progress::ListingProgress;
use crate::templates::components::{card, pending_fields, progress_ring, stage_timeline};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn listing_page(listing: &Listing, progress: &ListingProgress, publications: i64) -> Markup {
    let completion = &progress.completion;
    let name = listing.display_name();

    desktop_layout(
        &name,
        html! {
            main class="container" {
                h1 { (name) }
                @if let Some(reference) = &listing.reference {
                    p class="text-gray-500" { "Ref. " (reference) }
                }

                section class="card listing-summary" {
                    (progress_ring(completion.overall_percentage))
                    div {
                        p { "Etapa actual: " strong { (progress.current_step_label()) } }
                        p {
                            "Campos completados: "
                            strong { (completion.completed_total()) " de " (total_fields()) }
                        }
                        p { "Fotografías: " strong { (progress.image_count) } }
                        p { "Publicaciones: " strong { (publications) } }
                        (publish_form(listing, progress))
                    }
                }

                (card("Proceso", stage_timeline(&progress.stages)))

                (pending_fields("Campos obligatorios", &completion.mandatory))
                (pending_fields("Campos opcionales", &completion.nth))
            }
        },
    )
}

fn publish_form(listing: &Listing, progress: &ListingProgress) -> Markup {
    if listing.published_to_portals == Some(true) {
        return html! { p class="text-green-700" { "Publicado en portales." } };
    }
    let Some(id) = listing.id else {
        return html! {};
    };

    let completion = &progress.completion;
    html! {
        form action=(format!("/listings/{id}/publish")) method="post" {
            @if completion.can_publish_to_portals {
                button type="submit" class="btn" { "Publicar en portales" }
            } @else {
                button type="submit" class="btn" disabled { "Publicar en portales" }
                p class="text-xs text-gray-500" {
                    "Faltan " (completion.mandatory.pending.len()) " campos obligatorios."
                }
            }
        }
    }
}
