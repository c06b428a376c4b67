// Adapters layer: concrete implementations of the domain ports.

pub mod openfoodfacts;
pub mod scanner_input;
pub mod user_store;
