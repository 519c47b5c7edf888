pub mod columns;
pub mod sources;
pub mod store;

pub use store::DatasetStore;
