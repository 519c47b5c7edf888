pub mod filter;
pub mod listing;
pub mod property;
pub mod summary;
