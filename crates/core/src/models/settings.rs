use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Configuration for the ledger view. Every field has a default, so a
/// partial JSON config (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency marker used when rendering amounts (e.g., "₩", "$").
    pub currency_symbol: String,

    /// Place the currency marker after the number ("1,900원") instead of before.
    pub currency_suffix: bool,

    /// Label for blank broker / symbol / account keys in grouped series.
    pub empty_group_label: String,

    /// Kind labels, searched by the free-text filter and written to exports.
    pub sale_label: String,
    pub dividend_label: String,

    /// JSON endpoint listing the ledger records.
    pub records_url: String,

    /// Per-record detail endpoint; `{id}` is replaced with the record id.
    pub detail_url_template: String,

    /// HTTP client timeout for both endpoints.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "₩".to_string(),
            currency_suffix: false,
            empty_group_label: "—".to_string(),
            sale_label: "Sale".to_string(),
            dividend_label: "Dividend".to_string(),
            records_url: "/stocks/realized.json".to_string(),
            detail_url_template: "/stocks/{id}/overview.json".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.empty_group_label.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "empty_group_label must not be blank".into(),
            ));
        }
        if !self.detail_url_template.contains("{id}") {
            return Err(CoreError::ValidationError(format!(
                "detail_url_template '{}' has no {{id}} placeholder",
                self.detail_url_template
            )));
        }
        Ok(())
    }

    /// The label for a record kind as configured.
    pub fn kind_label(&self, is_sale: bool) -> &str {
        if is_sale {
            &self.sale_label
        } else {
            &self.dividend_label
        }
    }

    pub fn detail_url(&self, id: &str) -> String {
        self.detail_url_template.replace("{id}", id)
    }
}
