pub mod completion;
pub mod fields;
pub mod listing;
pub mod progress;
pub mod stages;

#[cfg(test)]
pub(crate) mod fixtures;
