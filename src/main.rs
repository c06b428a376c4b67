use barcode_safety::core::{ConfigProvider, ScanOutcome, UserStore};
use barcode_safety::domain::model::{NewUser, SUGGESTED_ALLERGIES, SUGGESTED_HEALTH_CONDITIONS};
use barcode_safety::report::{render_outcome, render_profile};
use barcode_safety::utils::error::ErrorSeverity;
use barcode_safety::utils::logger::{self, LogFormat};
use barcode_safety::utils::validation::Validate;
use barcode_safety::{
    AppConfig, AppError, CliConfig, Command, FileUserStore, OpenFoodFactsClient, SafetyChecker,
    ScanService, ScannerInputReader,
};
use clap::Parser;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2, // worth retrying
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: CliConfig) -> Result<(), AppError> {
    let config = cli.resolve()?;
    config.validate()?;

    let users = FileUserStore::new(config.users_path());

    match cli.command {
        Command::Register {
            username,
            name,
            mobile,
            age,
            allergies,
            conditions,
        } => {
            let user = users
                .register(NewUser {
                    username,
                    name,
                    mobile,
                    age,
                    allergies,
                    health_conditions: conditions,
                })
                .await?;
            println!("✅ Registration successful for {}.", user.username);
        }
        Command::Profile { mobile } => {
            let user = users.login(&mobile).await?;
            print!("{}", render_profile(&user));
        }
        Command::UpdateProfile {
            mobile,
            allergies,
            conditions,
        } => {
            let user = users
                .update_profile(&mobile, &allergies, &conditions)
                .await?;
            println!("✅ Profile updated successfully!");
            print!("{}", render_profile(&user));
        }
        Command::Scan {
            mobile,
            input,
            json,
        } => {
            let scanned = read_input(&input).await?;
            let service = scan_service(&config, users)?;
            let outcome = service.scan(&mobile, &scanned).await?;
            print_outcome(&outcome, json)?;
        }
        Command::Check {
            mobile,
            barcode,
            json,
        } => {
            let service = scan_service(&config, users)?;
            let outcome = service.check_barcode(&mobile, &barcode).await?;
            print_outcome(&outcome, json)?;
        }
        Command::Suggestions => {
            println!("Suggested allergies:");
            for allergy in SUGGESTED_ALLERGIES {
                println!("  - {}", allergy);
            }
            println!("Suggested health conditions:");
            for condition in SUGGESTED_HEALTH_CONDITIONS {
                println!("  - {}", condition);
            }
        }
    }

    Ok(())
}

fn scan_service(
    config: &AppConfig,
    users: FileUserStore,
) -> Result<ScanService<ScannerInputReader, OpenFoodFactsClient, FileUserStore>, AppError> {
    let lookup = OpenFoodFactsClient::from_config(config)?;
    Ok(ScanService::new(
        ScannerInputReader::new(),
        lookup,
        users,
        SafetyChecker::new(config.match_mode()),
    ))
}

async fn read_input(input: &str) -> Result<Vec<u8>, AppError> {
    if input == "-" {
        let mut data = Vec::new();
        tokio::io::stdin().read_to_end(&mut data).await?;
        Ok(data)
    } else {
        Ok(tokio::fs::read(input).await?)
    }
}

fn print_outcome(outcome: &ScanOutcome, json: bool) -> Result<(), AppError> {
    if !json {
        print!("{}", render_outcome(outcome));
        return Ok(());
    }

    let value = match outcome {
        ScanOutcome::NoBarcode => serde_json::json!({ "status": "no_barcode" }),
        ScanOutcome::ProductNotFound { barcode } => serde_json::json!({
            "status": "product_not_found",
            "barcode": barcode,
        }),
        ScanOutcome::Checked {
            barcode,
            product,
            verdict,
        } => serde_json::json!({
            "status": "checked",
            "barcode": barcode,
            "product": product,
            "verdict": verdict,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
