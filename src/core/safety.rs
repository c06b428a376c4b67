use crate::domain::model::{ProductInfo, SafetyVerdict, Token, UserProfile};
use crate::utils::error::{AppError, Result};

pub use crate::domain::model::MatchMode;

/// Pure matching engine: no I/O, no shared state, safe to call from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyChecker {
    mode: MatchMode,
}

impl SafetyChecker {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check `product` against `profile`.
    ///
    /// Both inputs are required; a missing one is an [`AppError::InvalidInput`] and no
    /// verdict is produced. An empty ingredient list is valid and never conflicts.
    pub fn check(
        &self,
        product: Option<&ProductInfo>,
        profile: Option<&UserProfile>,
    ) -> Result<SafetyVerdict> {
        let product =
            product.ok_or_else(|| AppError::invalid_input("product information is required"))?;
        let profile =
            profile.ok_or_else(|| AppError::invalid_input("user information is required"))?;

        let haystack = product.ingredients_text.to_lowercase();

        let conflicting_allergies = self.conflicts(&profile.allergies, &haystack);
        let conflicting_conditions = self.conflicts(&profile.conditions, &haystack);

        tracing::debug!(
            "Checked {} ({} allergy, {} condition conflicts)",
            product.barcode,
            conflicting_allergies.len(),
            conflicting_conditions.len()
        );

        Ok(SafetyVerdict::new(
            conflicting_allergies,
            conflicting_conditions,
            product,
        ))
    }

    fn conflicts(&self, tokens: &[Token], haystack: &str) -> Vec<String> {
        tokens
            .iter()
            .map(|token| token.normalized.as_str())
            .filter(|needle| !needle.is_empty() && self.occurs(needle, haystack))
            .map(str::to_string)
            .collect()
    }

    fn occurs(&self, needle: &str, haystack: &str) -> bool {
        match self.mode {
            MatchMode::Substring => haystack.contains(needle),
            MatchMode::WordBoundary => occurs_as_word(needle, haystack),
        }
    }
}

/// Every occurrence is tried, overlapping ones included: a rejected hit only advances
/// the search by one character.
fn occurs_as_word(needle: &str, haystack: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        if !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        {
            return true;
        }
        // needle is non-empty, so a char starts at `start`
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Check with the default naive substring matching.
pub fn check_product_safety(
    product: Option<&ProductInfo>,
    profile: Option<&UserProfile>,
) -> Result<SafetyVerdict> {
    SafetyChecker::default().check(product, profile)
}
