use crate::domain::model::{DecodedBarcode, LookupOutcome, MatchMode, NewUser, User};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait BarcodeReader: Send + Sync {
    /// Decode every barcode found in `input`. Entries whose payload is not text are skipped.
    fn decode(&self, input: &[u8]) -> Vec<DecodedBarcode>;
}

#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn lookup(&self, barcode: &str) -> Result<LookupOutcome>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>>;
    async fn update_profile(
        &self,
        mobile: &str,
        allergies: &[String],
        health_conditions: &[String],
    ) -> Result<User>;

    async fn login(&self, mobile: &str) -> Result<User> {
        crate::utils::validation::validate_required_text("mobile", mobile)?;
        self.find_by_mobile(mobile)
            .await?
            .ok_or_else(|| crate::utils::error::AppError::UserNotFound {
                mobile: mobile.to_string(),
            })
    }
}

pub trait ConfigProvider: Send + Sync {
    fn lookup_base_url(&self) -> &str;
    fn lookup_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn users_path(&self) -> &str;
    fn match_mode(&self) -> MatchMode;
}
