pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{
    openfoodfacts::OpenFoodFactsClient,
    scanner_input::ScannerInputReader,
    user_store::{FileUserStore, InMemoryUserStore},
};
pub use config::AppConfig;
pub use core::{
    normalizer::normalize_tokens,
    safety::{check_product_safety, SafetyChecker},
    scanner::ScanService,
};
pub use utils::error::{AppError, Result};
