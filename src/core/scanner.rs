use crate::core::normalizer::profile_for;
use crate::core::safety::SafetyChecker;
use crate::domain::model::{DecodedBarcode, LookupOutcome, ScanOutcome, User};
use crate::domain::ports::{BarcodeReader, ProductLookup, UserStore};
use crate::utils::error::{AppError, Result};

/// Runs one scan end to end: resolve the user, decode, look the product up, check it.
pub struct ScanService<R: BarcodeReader, L: ProductLookup, U: UserStore> {
    reader: R,
    lookup: L,
    users: U,
    checker: SafetyChecker,
}

impl<R: BarcodeReader, L: ProductLookup, U: UserStore> ScanService<R, L, U> {
    pub fn new(reader: R, lookup: L, users: U, checker: SafetyChecker) -> Self {
        Self {
            reader,
            lookup,
            users,
            checker,
        }
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    pub async fn scan(&self, mobile: &str, input: &[u8]) -> Result<ScanOutcome> {
        let user = self.users.login(mobile).await?;

        let barcodes = self.reader.decode(input);
        tracing::debug!("Decoded {} barcode(s)", barcodes.len());

        // Only the first decoded barcode is checked.
        let Some(barcode) = barcodes.into_iter().next() else {
            tracing::warn!("No barcode detected in the input");
            return Ok(ScanOutcome::NoBarcode);
        };

        tracing::info!(
            "Barcode detected: {} (Type: {})",
            barcode.payload,
            barcode.symbology
        );
        self.check_for(&user, barcode).await
    }

    /// Same as [`scan`](Self::scan) for a barcode that is already known.
    pub async fn check_barcode(&self, mobile: &str, payload: &str) -> Result<ScanOutcome> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(AppError::invalid_input("barcode cannot be empty"));
        }

        let user = self.users.login(mobile).await?;
        let barcode = DecodedBarcode {
            payload: payload.to_string(),
            symbology: "MANUAL".to_string(),
        };
        self.check_for(&user, barcode).await
    }

    async fn check_for(&self, user: &User, barcode: DecodedBarcode) -> Result<ScanOutcome> {
        let product = match self.lookup.lookup(&barcode.payload).await? {
            LookupOutcome::Found(product) => product,
            LookupOutcome::NotFound => {
                tracing::warn!("Product {} not found in the database", barcode.payload);
                return Ok(ScanOutcome::ProductNotFound { barcode });
            }
        };

        let profile = profile_for(user);
        let verdict = self.checker.check(Some(&product), Some(&profile))?;
        tracing::info!(
            "Safety analysis for {}: {}",
            product.barcode,
            if verdict.is_safe() { "safe" } else { "conflicts found" }
        );

        Ok(ScanOutcome::Checked {
            barcode,
            product,
            verdict,
        })
    }
}
