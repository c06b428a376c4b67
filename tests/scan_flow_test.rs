use anyhow::Result;
use barcode_safety::core::{MatchMode, ScanOutcome, UserStore};
use barcode_safety::domain::model::NewUser;
use barcode_safety::{
    AppError, FileUserStore, OpenFoodFactsClient, SafetyChecker, ScanService, ScannerInputReader,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

fn scan_service(
    server: &MockServer,
    users: FileUserStore,
    mode: MatchMode,
) -> ScanService<ScannerInputReader, OpenFoodFactsClient, FileUserStore> {
    let lookup =
        OpenFoodFactsClient::new(&server.base_url(), Duration::from_secs(5), "scan-test").unwrap();
    ScanService::new(
        ScannerInputReader::new(),
        lookup,
        users,
        SafetyChecker::new(mode),
    )
}

async fn register(users: &FileUserStore, allergies: &[&str], conditions: &[&str]) -> Result<()> {
    users
        .register(NewUser {
            username: "jdoe".to_string(),
            name: "J Doe".to_string(),
            mobile: "5550100".to_string(),
            age: 34,
            allergies: allergies.iter().map(|s| s.to_string()).collect(),
            health_conditions: conditions.iter().map(|s| s.to_string()).collect(),
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_scan_flags_conflicting_allergy() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));
    register(&users, &["Peanut", "Gluten"], &[]).await?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v0/product/5000159407236.json");
        then.status(200).json_body(serde_json::json!({
            "status": 1,
            "product": {
                "product_name": "Crunchy Bites",
                "brands": "Acme",
                "ingredients_text": "Wheat flour, peanut oil, sugar"
            }
        }));
    });

    let service = scan_service(&server, users, MatchMode::Substring);
    let outcome = service
        .scan("5550100", b"5000159407236\n036000291452\n")
        .await?;

    api_mock.assert();
    let ScanOutcome::Checked {
        barcode,
        product,
        verdict,
    } = outcome
    else {
        panic!("expected a checked product, got {:?}", outcome);
    };
    assert_eq!(barcode.symbology, "EAN-13");
    assert_eq!(product.title, "Crunchy Bites");
    assert_eq!(verdict.conflicting_allergies(), ["peanut"]);
    assert!(verdict.conflicting_conditions().is_empty());
    assert!(!verdict.is_safe());
    Ok(())
}

#[tokio::test]
async fn test_profile_update_changes_next_verdict() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));
    register(&users, &["Shellfish"], &[]).await?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v0/product/96385074.json");
        then.status(200).json_body(serde_json::json!({
            "product": {
                "product_name": "Cola",
                "ingredients_text": "Carbonated water, sugar, caramel color"
            }
        }));
    });

    let service = scan_service(&server, users, MatchMode::Substring);

    let before = service.check_barcode("5550100", "96385074").await?;
    let ScanOutcome::Checked { verdict, .. } = before else {
        panic!("expected a checked product");
    };
    assert!(verdict.is_safe());

    service
        .users()
        .update_profile(
            "5550100",
            &["Shellfish".to_string()],
            &["Sugar Sensitivity".to_string(), "sugar".to_string()],
        )
        .await?;

    let after = service.check_barcode("5550100", "96385074").await?;
    let ScanOutcome::Checked { verdict, .. } = after else {
        panic!("expected a checked product");
    };
    assert_eq!(verdict.conflicting_conditions(), ["sugar"]);
    assert!(!verdict.is_safe());

    api_mock.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn test_word_boundary_mode_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));
    register(&users, &["Egg"], &[]).await?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v0/product/111.json");
        then.status(200).json_body(serde_json::json!({
            "product": { "ingredients_text": "Eggplant extract, olive oil" }
        }));
    });

    let naive = scan_service(&server, users.clone(), MatchMode::Substring);
    let ScanOutcome::Checked { verdict, .. } = naive.check_barcode("5550100", "111").await?
    else {
        panic!("expected a checked product");
    };
    assert_eq!(verdict.conflicting_allergies(), ["egg"]);

    let strict = scan_service(&server, users, MatchMode::WordBoundary);
    let ScanOutcome::Checked { verdict, .. } = strict.check_barcode("5550100", "111").await?
    else {
        panic!("expected a checked product");
    };
    assert!(verdict.is_safe());
    Ok(())
}

#[tokio::test]
async fn test_scan_reports_missing_barcode_and_product() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));
    register(&users, &["Soy"], &[]).await?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v0/product/036000291452.json");
        then.status(200)
            .json_body(serde_json::json!({ "status": 0, "status_verbose": "product not found" }));
    });

    let service = scan_service(&server, users, MatchMode::Substring);

    assert_eq!(
        service.scan("5550100", b"\n\xff\xfe\n").await?,
        ScanOutcome::NoBarcode
    );

    let outcome = service.scan("5550100", b"036000291452\n").await?;
    api_mock.assert();
    assert!(matches!(
        outcome,
        ScanOutcome::ProductNotFound { ref barcode } if barcode.symbology == "UPC-A"
    ));
    Ok(())
}

#[tokio::test]
async fn test_scan_of_image_file_detects_no_barcode() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));
    register(&users, &["Soy"], &[]).await?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let mut photo = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00\x01\x01\x00\x00\x01\x00\x01\x00\x00".to_vec();
    photo.extend_from_slice(b"\xFF\xDB\x00\x43\x00\n$.' \",#\x1c\x1c(7),01444\x1f'9=82<.342\n");

    let service = scan_service(&server, users, MatchMode::Substring);
    assert_eq!(service.scan("5550100", &photo).await?, ScanOutcome::NoBarcode);
    assert_eq!(api_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_scan_surfaces_lookup_failures() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));
    register(&users, &["Soy"], &[]).await?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v0/product/111.json");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v0/product/222.json");
        then.status(200).body("not json at all");
    });

    let service = scan_service(&server, users, MatchMode::Substring);

    let err = service.check_barcode("5550100", "111").await.unwrap_err();
    assert!(matches!(err, AppError::LookupUnavailable { .. }));

    let err = service.check_barcode("5550100", "222").await.unwrap_err();
    assert!(matches!(err, AppError::LookupInvalidResponse { .. }));

    assert_ne!(
        AppError::LookupUnavailable {
            message: String::new()
        }
        .user_friendly_message(),
        err.user_friendly_message()
    );
    Ok(())
}

#[tokio::test]
async fn test_scan_for_unregistered_user() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let users = FileUserStore::new(temp_dir.path().join("users.json"));

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let service = scan_service(&server, users, MatchMode::Substring);
    let err = service.scan("5550100", b"5000159407236").await.unwrap_err();

    assert!(matches!(err, AppError::UserNotFound { .. }));
    assert_eq!(api_mock.hits(), 0);
    Ok(())
}
