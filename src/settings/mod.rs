pub mod context;
pub mod store;
