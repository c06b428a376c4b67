use crate::core::{ConfigProvider, LookupOutcome, ProductInfo, ProductLookup};
use crate::domain::model::{NO_DESCRIPTION, NO_PRODUCT_TITLE, UNKNOWN_BRAND, UNKNOWN_CATEGORY};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    product: Option<Value>,
}

/// Product lookup against the Open Food Facts v0 product endpoint.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    base_url: Url,
    client: Client,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| AppError::InvalidConfigValueError {
            field: "lookup.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidConfigValueError {
                field: "lookup.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { base_url, client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.lookup_base_url(),
            config.lookup_timeout(),
            config.user_agent(),
        )
    }

    fn product_url(&self, barcode: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so the segments are always editable
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v0", "product"])
                .push(&format!("{}.json", barcode));
        }
        url
    }
}

#[async_trait]
impl ProductLookup for OpenFoodFactsClient {
    async fn lookup(&self, barcode: &str) -> Result<LookupOutcome> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(AppError::invalid_input("barcode cannot be empty"));
        }

        let url = self.product_url(barcode);
        tracing::debug!("Making product request to: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::LookupUnavailable {
                message: if e.is_timeout() {
                    format!("request timed out: {}", e)
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        tracing::debug!("Product response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(AppError::LookupUnavailable {
                message: format!("product database responded with {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::LookupUnavailable {
                message: format!("failed to read response body: {}", e),
            })?;

        parse_product(barcode, &body)
    }
}

/// Turn a v0 product response body into a lookup outcome.
pub fn parse_product(barcode: &str, body: &str) -> Result<LookupOutcome> {
    let response: ProductResponse =
        serde_json::from_str(body).map_err(|e| AppError::LookupInvalidResponse {
            message: e.to_string(),
        })?;

    let product = match response.product {
        None | Some(Value::Null) => return Ok(LookupOutcome::NotFound),
        Some(Value::Object(map)) if map.is_empty() => return Ok(LookupOutcome::NotFound),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(AppError::LookupInvalidResponse {
                message: format!("expected `product` to be an object, got {}", other),
            })
        }
    };

    Ok(LookupOutcome::Found(ProductInfo {
        barcode: barcode.to_string(),
        title: text_field(&product, "product_name", NO_PRODUCT_TITLE)?,
        brand: text_field(&product, "brands", UNKNOWN_BRAND)?,
        description: text_field(&product, "generic_name", NO_DESCRIPTION)?,
        category: text_field(&product, "categories", UNKNOWN_CATEGORY)?,
        ingredients_text: text_field(&product, "ingredients_text", "")?,
    }))
}

fn text_field(product: &Map<String, Value>, key: &str, placeholder: &str) -> Result<String> {
    match product.get(key) {
        None | Some(Value::Null) => Ok(placeholder.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(AppError::LookupInvalidResponse {
            message: format!("field `{}` is not text: {}", key, other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url_encodes_barcode() {
        let client =
            OpenFoodFactsClient::new("https://example.org/", DEFAULT_TIMEOUT, "test").unwrap();
        assert_eq!(
            client.product_url("5000159407236").as_str(),
            "https://example.org/api/v0/product/5000159407236.json"
        );
        assert_eq!(
            client.product_url("a/b c").as_str(),
            "https://example.org/api/v0/product/a%2Fb%20c.json"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let client =
            OpenFoodFactsClient::new("http://localhost:9000/off", DEFAULT_TIMEOUT, "test")
                .unwrap();
        assert_eq!(
            client.product_url("123").as_str(),
            "http://localhost:9000/off/api/v0/product/123.json"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = OpenFoodFactsClient::new("not a url", DEFAULT_TIMEOUT, "test").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_parse_missing_fields_use_placeholders() {
        let outcome = parse_product("42", r#"{"product": {"product_name": "Oat Bar"}}"#).unwrap();
        let LookupOutcome::Found(product) = outcome else {
            panic!("expected a product");
        };
        assert_eq!(product.barcode, "42");
        assert_eq!(product.title, "Oat Bar");
        assert_eq!(product.brand, UNKNOWN_BRAND);
        assert_eq!(product.description, NO_DESCRIPTION);
        assert_eq!(product.category, UNKNOWN_CATEGORY);
        assert_eq!(product.ingredients_text, "");
    }

    #[test]
    fn test_parse_null_ingredients_become_empty() {
        let outcome = parse_product(
            "42",
            r#"{"product": {"product_name": "Water", "ingredients_text": null}}"#,
        )
        .unwrap();
        let LookupOutcome::Found(product) = outcome else {
            panic!("expected a product");
        };
        assert_eq!(product.ingredients_text, "");
    }

    #[test]
    fn test_parse_not_found_shapes() {
        for body in [
            r#"{"status": 0, "status_verbose": "product not found"}"#,
            r#"{"product": null}"#,
            r#"{"product": {}}"#,
        ] {
            assert_eq!(parse_product("1", body).unwrap(), LookupOutcome::NotFound);
        }
    }

    #[test]
    fn test_parse_malformed_bodies() {
        for body in ["<html>", r#"{"product": "oops"}"#, r#"{"product": {"brands": 7}}"#] {
            let err = parse_product("1", body).unwrap_err();
            assert!(matches!(err, AppError::LookupInvalidResponse { .. }), "{}", body);
        }
    }
}
