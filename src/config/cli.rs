use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "barcode-safety")]
#[command(about = "Check scanned products against your allergies and health conditions")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the product database base URL
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Override the user store location
    #[arg(long, global = true)]
    pub users_path: Option<String>,

    /// Only flag terms that appear as whole words in the ingredients
    #[arg(long, global = true)]
    pub word_boundary: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long, default_value = "30")]
        age: u32,
        /// Comma-separated allergies, e.g. "Peanuts,Gluten"
        #[arg(long, value_delimiter = ',')]
        allergies: Vec<String>,
        /// Comma-separated health conditions
        #[arg(long, value_delimiter = ',')]
        conditions: Vec<String>,
    },
    /// Show a user's profile
    Profile {
        #[arg(long)]
        mobile: String,
    },
    /// Replace a user's allergies and health conditions
    UpdateProfile {
        #[arg(long)]
        mobile: String,
        #[arg(long, value_delimiter = ',')]
        allergies: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        conditions: Vec<String>,
    },
    /// Check the first barcode in a scanner output file ("-" for stdin)
    Scan {
        #[arg(long)]
        mobile: String,
        /// Text from a keyboard-wedge scanner or decoder tool, one barcode per line.
        /// Image files are not decoded; run them through e.g. `zbarimg` first.
        #[arg(long, default_value = "-")]
        input: String,
        #[arg(long)]
        json: bool,
    },
    /// Check a barcode typed in by hand
    Check {
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        barcode: String,
        #[arg(long)]
        json: bool,
    },
    /// List the suggested allergy and health-condition terms
    Suggestions,
}

impl CliConfig {
    /// Load the configuration file (or defaults) and apply command-line overrides.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(base_url) = &self.api_base_url {
            config.lookup.base_url = base_url.clone();
        }
        if let Some(users_path) = &self.users_path {
            config.storage.users_path = users_path.clone();
        }
        if self.word_boundary {
            config.matching.word_boundary = true;
        }

        Ok(config)
    }
}
