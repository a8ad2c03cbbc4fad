pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Mode;
pub use structs::{rank_products, Product, PublishResult};
