//! Records returned by the factsheet API and the filters applied to them.
//!
//! Each record wraps the JSON object exactly as the API sent it, so writing it
//! back out reproduces the input. Accessors read fields as text: a missing
//! field or `null` reads as `""`, numbers read as their JSON form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Status code of a registered, still-active fund.
pub const STATUS_REGISTERED: &str = "RG";

/// `cancel_date` value of a fund that has not been cancelled.
pub const NOT_CANCELLED: &str = "-";

fn text<'a>(raw: &'a Map<String, Value>, key: &str) -> Cow<'a, str> {
    match raw.get(key) {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amc {
    pub raw: Map<String, Value>,
}

impl Amc {
    pub fn unique_id(&self) -> Cow<'_, str> {
        text(&self.raw, "unique_id")
    }

    pub fn name_th(&self) -> Cow<'_, str> {
        text(&self.raw, "name_th")
    }

    pub fn name_en(&self) -> Cow<'_, str> {
        text(&self.raw, "name_en")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fund {
    pub raw: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetAllocation {
    pub raw: Map<String, Value>,
}

impl AssetAllocation {
    pub fn asset_seq(&self) -> Cow<'_, str> {
        text(&self.raw, "asset_seq")
    }

    pub fn asset_name(&self) -> Cow<'_, str> {
        text(&self.raw, "asset_name")
    }

    pub fn asset_ratio(&self) -> Cow<'_, str> {
        text(&self.raw, "asset_ratio")
    }
}

/// Which name of a [`Fund`] a substring test looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Abbreviation,
    EnglishName,
}

impl Fund {
    pub fn field(&self, key: &str) -> Cow<'_, str> {
        text(&self.raw, key)
    }

    pub fn proj_id(&self) -> Cow<'_, str> {
        self.field("proj_id")
    }

    pub fn proj_abbr_name(&self) -> Cow<'_, str> {
        self.field("proj_abbr_name")
    }

    pub fn proj_name_en(&self) -> Cow<'_, str> {
        self.field("proj_name_en")
    }

    pub fn proj_name_th(&self) -> Cow<'_, str> {
        self.field("proj_name_th")
    }

    pub fn fund_status(&self) -> Cow<'_, str> {
        self.field("fund_status")
    }

    pub fn regis_date(&self) -> Cow<'_, str> {
        self.field("regis_date")
    }

    pub fn cancel_date(&self) -> Cow<'_, str> {
        self.field("cancel_date")
    }

    pub fn name_contains(&self, field: NameField, needle: &str) -> bool {
        let name = match field {
            NameField::Abbreviation => self.proj_abbr_name(),
            NameField::EnglishName => self.proj_name_en(),
        };
        contains_ignore_case(&name, needle)
    }

    /// RMF in the abbreviation or English name, or "RETIREMENT" in the English name.
    pub fn is_rmf(&self) -> bool {
        self.name_contains(NameField::Abbreviation, "RMF")
            || self.name_contains(NameField::EnglishName, "RMF")
            || self.name_contains(NameField::EnglishName, "RETIREMENT")
    }

    pub fn is_active(&self) -> bool {
        self.fund_status() == STATUS_REGISTERED && self.cancel_date() == NOT_CANCELLED
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// RMF funds, in input order.
pub fn rmf_funds(funds: &[Fund]) -> Vec<Fund> {
    funds.iter().filter(|f| f.is_rmf()).cloned().collect()
}

pub fn active_funds(funds: &[Fund]) -> Vec<Fund> {
    funds.iter().filter(|f| f.is_active()).cloned().collect()
}

/// First AMC whose English name contains `needle`, case-insensitively.
pub fn find_amc<'a>(amcs: &'a [Amc], needle: &str) -> Option<&'a Amc> {
    amcs.iter().find(|a| contains_ignore_case(&a.name_en(), needle))
}

/// Exact match on the abbreviated project name.
pub fn find_by_abbr<'a>(funds: &'a [Fund], abbr: &str) -> Option<&'a Fund> {
    funds.iter().find(|f| f.proj_abbr_name() == abbr)
}
