pub mod listing;
pub mod listings;

pub use listing::listing_page;
pub use listings::{listings_page, ListingRowVm};
