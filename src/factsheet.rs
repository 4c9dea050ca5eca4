use serde_json::Value;

use crate::client::Client;
use crate::endpoint;
use crate::error::ApiError;
use crate::funds::{Amc, AssetAllocation, Fund};

impl Client {
    /// All asset management companies.
    pub fn amcs(&self) -> Result<Vec<Amc>, ApiError> {
        self.get_json(&endpoint::amc_list().path, self.factsheet_key())
    }

    /// Every fund administered by one AMC, active or not.
    pub fn funds_by_amc(&self, amc_id: &str) -> Result<Vec<Fund>, ApiError> {
        self.get_json(&endpoint::funds_by_amc(amc_id).path, self.factsheet_key())
    }

    pub fn fund_assets(&self, proj_id: &str) -> Result<Vec<AssetAllocation>, ApiError> {
        self.get_json(&endpoint::fund_assets(proj_id).path, self.factsheet_key())
    }

    /// Daily NAV for `nav_date` (`YYYY-MM-DD`).
    ///
    /// Returns `Ok(None)` when no NAV was published for the date, or without
    /// calling the API when no Daily Info key is configured.
    pub fn daily_nav(&self, proj_id: &str, nav_date: &str) -> Result<Option<Value>, ApiError> {
        let Some(key) = self.daily_info_key() else {
            tracing::warn!("{} not set; skipping NAV lookup", crate::config::ENV_DAILY_INFO_KEY);
            return Ok(None);
        };
        // Daily Info answers 204 with no body when nothing was published for a date.
        match self.call(&endpoint::daily_nav(proj_id, nav_date).path, key) {
            Ok(v) => Ok(Some(v)),
            Err(ApiError::Decode { text, .. }) if text.trim().is_empty() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
