use crate::domain::listing::Listing;
use crate::domain::progress::ListingProgress;
use crate::templates::components::status_chip;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct ListingRowVm {
    pub listing: Listing,
    pub progress: ListingProgress,
}

pub fn listings_page(rows: &[ListingRowVm]) -> Markup {
    desktop_layout(
        "Inmuebles",
        html! {
            main class="container" {
                h1 { "Inmuebles" }
                p class="text-gray-700" {
                    strong { (rows.len()) } " inmuebles en cartera."
                }

                @if rows.is_empty() {
                    p { "Todavía no hay inmuebles." }
                } @else {
                    table class="min-w-full divide-y divide-gray-200" {
                        thead class="bg-gray-50" {
                            tr {
                                th scope="col" { "Inmueble" }
                                th scope="col" { "Ciudad" }
                                th scope="col" { "Ficha" }
                                th scope="col" { "Etapa actual" }
                                th scope="col" { "Portales" }
                            }
                        }
                        tbody class="bg-white divide-y divide-gray-200" {
                            @for row in rows {
                                (listing_row(row))
                            }
                        }
                    }
                }
            }
        },
    )
}

fn listing_row(row: &ListingRowVm) -> Markup {
    let completion = &row.progress.completion;
    html! {
        tr {
            td {
                @if let Some(id) = row.listing.id {
                    a href=(format!("/listings/{id}")) { (row.listing.display_name()) }
                } @else {
                    (row.listing.display_name())
                }
            }
            td { (row.listing.city.as_deref().unwrap_or("—")) }
            td { (completion.overall_percentage) "%" }
            td { (row.progress.current_step_label()) }
            td {
                @if row.listing.published_to_portals == Some(true) {
                    (status_chip(crate::domain::stages::StageStatus::Accomplished))
                } @else if completion.can_publish_to_portals {
                    span class="chip chip-ongoing" { "Lista para publicar" }
                } @else {
                    span class="chip chip-future" {
                        (completion.mandatory.pending.len()) " campos obligatorios"
                    }
                }
            }
        }
    }
}
