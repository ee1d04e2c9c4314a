//! Turns free-form user input into a resolved product.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

use crate::error::{DigestError, Result};
use crate::traits::catalog::Catalog;
use crate::types::product::{ProductRecord, Sku, UNKNOWN_PRODUCT_NAME};

static SKU_IN_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{7,15}").unwrap());

/// Derive a SKU from raw input.
///
/// Input containing one of `markers` is treated as a link and must hold a
/// 7-15 digit run; the first such run is the SKU. Any other input is used
/// verbatim after trimming.
pub fn resolve_input(raw: &str, markers: &[String]) -> Result<Sku> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DigestError::invalid_input("empty input"));
    }

    if contains_marker(trimmed, markers) {
        return SKU_IN_LINK
            .find(trimmed)
            .map(|m| Sku::new(m.as_str()))
            .ok_or_else(|| DigestError::invalid_input("no article number in link"));
    }

    Ok(Sku::new(trimmed))
}

/// Whether `text` mentions one of the marketplace domain markers.
pub fn contains_marker(text: &str, markers: &[String]) -> bool {
    let lower = text.to_lowercase();
    markers
        .iter()
        .any(|m| !m.is_empty() && lower.contains(&m.to_lowercase()))
}

/// Resolves input to a [`ProductRecord`] through the catalog.
pub struct ProductResolver {
    catalog: Arc<dyn Catalog>,
    markers: Vec<String>,
}

impl ProductResolver {
    pub fn new(catalog: Arc<dyn Catalog>, markers: Vec<String>) -> Self {
        Self { catalog, markers }
    }

    pub fn resolve_input(&self, raw: &str) -> Result<Sku> {
        resolve_input(raw, &self.markers)
    }

    /// One catalog lookup, no retry.
    pub async fn fetch_record(&self, sku: &Sku) -> Result<ProductRecord> {
        let product = self.catalog.product(sku).await.map_err(|e| {
            warn!(sku = %sku, error = %e, "Catalog lookup failed");
            e
        })?;

        let product = product.ok_or_else(|| DigestError::ProductNotFound {
            sku: sku.to_string(),
        })?;

        let root_id = product.root_id.ok_or_else(|| {
            debug!(sku = %sku, "Catalog card has no root id");
            DigestError::ProductNotFound {
                sku: sku.to_string(),
            }
        })?;

        let display_name = product
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string());

        info!(sku = %sku, root_id, name = %display_name, "Resolved product");

        Ok(ProductRecord {
            sku: sku.clone(),
            root_id,
            display_name,
        })
    }

    pub async fn resolve(&self, raw: &str) -> Result<ProductRecord> {
        let sku = self.resolve_input(raw)?;
        self.fetch_record(&sku).await
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}
