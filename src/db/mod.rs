pub mod connection;
pub mod images;
pub mod listings;

pub use connection::{init_db, Database};
