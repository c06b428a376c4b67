use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NO_PRODUCT_TITLE: &str = "No product title found";
pub const UNKNOWN_BRAND: &str = "Unknown brand";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_CATEGORY: &str = "Unknown category";

pub const SUGGESTED_ALLERGIES: [&str; 25] = [
    "Peanuts", "Dust", "Pollen", "Gluten", "Dairy", "Eggs", "Fish", "Shellfish", "Soy", "Wheat",
    "Tree Nuts", "Corn", "Sesame", "Mustard", "Sulfites", "Nightshades", "Legumes", "Citrus",
    "Bananas", "Chocolate", "Alcohol", "Histamine", "Salicylates", "Mushrooms", "Lactose",
];

pub const SUGGESTED_HEALTH_CONDITIONS: [&str; 20] = [
    "Diabetes",
    "Hypertension",
    "Asthma",
    "Thyroid",
    "Celiac Disease",
    "Kidney Disease",
    "Gout",
    "Lactose Intolerance",
    "IBS",
    "Histamine Intolerance",
    "Alpha-gal Syndrome",
    "Hypersensitivity",
    "Oral Allergy Syndrome",
    "Shellfish Allergy",
    "Fish Allergy",
    "Gluten Sensitivity",
    "Insulin Resistance",
    "Autoimmune Diseases",
    "Heart Disease",
    "High Cholesterol",
];

/// A single allergy or health-condition term taken from a comma-separated user field.
///
/// `display` keeps the user's spelling (trimmed); `normalized` is the lower-cased
/// form used for matching and reported in verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub display: String,
    pub normalized: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub allergies: Vec<Token>,
    pub conditions: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub barcode: String,
    pub title: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub ingredients_text: String,
}

impl ProductInfo {
    /// A product with every display field set to its placeholder and no ingredients.
    pub fn with_placeholders(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            title: NO_PRODUCT_TITLE.to_string(),
            brand: UNKNOWN_BRAND.to_string(),
            description: NO_DESCRIPTION.to_string(),
            category: UNKNOWN_CATEGORY.to_string(),
            ingredients_text: String::new(),
        }
    }
}

/// Result of one safety check. Built once by the matching engine and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyVerdict {
    is_safe: bool,
    conflicting_allergies: Vec<String>,
    conflicting_conditions: Vec<String>,
    product_name: String,
    product_brand: String,
    product_ingredients: String,
}

impl SafetyVerdict {
    pub(crate) fn new(
        conflicting_allergies: Vec<String>,
        conflicting_conditions: Vec<String>,
        product: &ProductInfo,
    ) -> Self {
        Self {
            is_safe: conflicting_allergies.is_empty() && conflicting_conditions.is_empty(),
            conflicting_allergies,
            conflicting_conditions,
            product_name: product.title.clone(),
            product_brand: product.brand.clone(),
            product_ingredients: product.ingredients_text.clone(),
        }
    }

    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    pub fn conflicting_allergies(&self) -> &[String] {
        &self.conflicting_allergies
    }

    pub fn conflicting_conditions(&self) -> &[String] {
        &self.conflicting_conditions
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn product_brand(&self) -> &str {
        &self.product_brand
    }

    pub fn product_ingredients(&self) -> &str {
        &self.product_ingredients
    }
}

/// How a token is searched for in the ingredient text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain containment: "egg" matches "eggplant".
    #[default]
    Substring,
    /// The occurrence must not touch an alphanumeric character on either side.
    WordBoundary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBarcode {
    pub payload: String,
    pub symbology: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(ProductInfo),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    NoBarcode,
    ProductNotFound {
        barcode: DecodedBarcode,
    },
    Checked {
        barcode: DecodedBarcode,
        product: ProductInfo,
        verdict: SafetyVerdict,
    },
}

/// Stored user record. Allergies and conditions are kept as the user entered them,
/// comma-separated; they are tokenized only when a profile is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub mobile: String,
    pub age: u32,
    pub allergies: String,
    pub health_conditions: String,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub mobile: String,
    pub age: u32,
    pub allergies: Vec<String>,
    pub health_conditions: Vec<String>,
}
