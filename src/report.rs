//! Plain-text rendering for the command-line front end.

use crate::core::normalizer::normalize_tokens;
use crate::domain::model::{ScanOutcome, User};
use std::fmt::{self, Display, Formatter};

/// Upper-case the first character and lower-case the rest ("PEANUT" -> "Peanut").
pub fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn render_profile(user: &User) -> String {
    ProfileView(user).to_string()
}

pub fn render_outcome(outcome: &ScanOutcome) -> String {
    OutcomeView(outcome).to_string()
}

/// A user's details and recorded terms, as shown after login.
pub struct ProfileView<'a>(pub &'a User);

impl Display for ProfileView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let user = self.0;
        writeln!(f, "Welcome, {}!", user.name)?;
        writeln!(f, "Username: {}", user.username)?;
        writeln!(f, "Mobile:   {}", user.mobile)?;
        writeln!(f, "Age:      {}", user.age)?;

        write_terms(f, "Allergies", &user.allergies, "No allergies recorded.")?;
        write_terms(
            f,
            "Health conditions",
            &user.health_conditions,
            "No health conditions recorded.",
        )
    }
}

fn write_terms(f: &mut Formatter<'_>, heading: &str, field: &str, empty: &str) -> fmt::Result {
    writeln!(f, "{}:", heading)?;
    let tokens = normalize_tokens(field);
    if tokens.is_empty() {
        writeln!(f, "  {}", empty)?;
    }
    for token in tokens {
        writeln!(f, "  - {}", token.display)?;
    }
    Ok(())
}

/// The result of one scan: the barcode, the product and the safety analysis.
pub struct OutcomeView<'a>(pub &'a ScanOutcome);

impl Display for OutcomeView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (barcode, product, verdict) = match self.0 {
            ScanOutcome::NoBarcode => {
                return writeln!(f, "No barcode detected in the input. Please try another scan.");
            }
            ScanOutcome::ProductNotFound { barcode } => {
                writeln!(
                    f,
                    "Barcode detected: {} (Type: {})",
                    barcode.payload, barcode.symbology
                )?;
                return writeln!(f, "Product not found in the database. Try another product.");
            }
            ScanOutcome::Checked {
                barcode,
                product,
                verdict,
            } => (barcode, product, verdict),
        };

        writeln!(
            f,
            "Barcode detected: {} (Type: {})",
            barcode.payload, barcode.symbology
        )?;
        writeln!(f, "\nProduct information")?;
        writeln!(f, "  Title:       {}", product.title)?;
        writeln!(f, "  Brand:       {}", product.brand)?;
        writeln!(f, "  Description: {}", product.description)?;
        writeln!(f, "  Category:    {}", product.category)?;
        writeln!(f, "  Barcode:     {}", product.barcode)?;
        writeln!(f, "  Ingredients: {}", product.ingredients_text)?;

        writeln!(f, "\nSafety analysis")?;
        if verdict.is_safe() {
            return writeln!(f, "✅ This product appears to be safe for you!");
        }
        writeln!(f, "❌ This product may not be safe for you!")?;
        write_conflicts(f, "Conflicting allergies", verdict.conflicting_allergies())?;
        write_conflicts(
            f,
            "Conflicting health conditions",
            verdict.conflicting_conditions(),
        )
    }
}

fn write_conflicts(f: &mut Formatter<'_>, heading: &str, terms: &[String]) -> fmt::Result {
    if terms.is_empty() {
        return Ok(());
    }
    writeln!(f, "{}:", heading)?;
    for term in terms {
        writeln!(f, "  - {}", capitalize(term))?;
    }
    Ok(())
}
