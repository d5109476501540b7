//! Header model
//!
//! One header per user account. It becomes the attribute set of the root
//! `<commitments>` element on export.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// Reason code new headers start with
pub const DEFAULT_REASON_CODE: &str = "PO07";

/// Currency code new headers start with
pub const DEFAULT_CURRENCY_CODE: &str = "RSD";

/// Document-level data shared by every exported commitment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub cumulative_reason_code: String,
    #[serde(default)]
    pub budget_year: String,
    #[serde(default)]
    pub budget_user_id: String,
    #[serde(default)]
    pub currency_code: String,
    #[serde(default)]
    pub treasury: String,
}

impl Header {
    /// The documented default header for the given budget year
    ///
    /// Storage adapters return this when no header has been saved yet.
    pub fn defaults_for_year(year: i32) -> Self {
        Self {
            cumulative_reason_code: DEFAULT_REASON_CODE.to_string(),
            budget_year: year.to_string(),
            budget_user_id: String::new(),
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            treasury: String::new(),
        }
    }

    /// All five fields empty
    pub fn empty() -> Self {
        Self {
            cumulative_reason_code: String::new(),
            budget_year: String::new(),
            budget_user_id: String::new(),
            currency_code: String::new(),
            treasury: String::new(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::defaults_for_year(Local::now().year())
    }
}

/// Optional replacements for header fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPatch {
    pub cumulative_reason_code: Option<String>,
    pub budget_year: Option<String>,
    pub budget_user_id: Option<String>,
    pub currency_code: Option<String>,
    pub treasury: Option<String>,
}

impl HeaderPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Return a copy of `header` with the present fields replaced
    pub fn apply(&self, header: &Header) -> Header {
        let mut next = header.clone();
        if let Some(v) = &self.cumulative_reason_code {
            next.cumulative_reason_code = v.clone();
        }
        if let Some(v) = &self.budget_year {
            next.budget_year = v.clone();
        }
        if let Some(v) = &self.budget_user_id {
            next.budget_user_id = v.clone();
        }
        if let Some(v) = &self.currency_code {
            next.currency_code = v.clone();
        }
        if let Some(v) = &self.treasury {
            next.treasury = v.clone();
        }
        next
    }
}
