use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a selected category is checked against the live category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Any non-blank text is accepted.
    #[default]
    FreeText,
    /// The category must name an entry of the latest category snapshot.
    MustMatchList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FormConfig {
    pub category_policy: CategoryPolicy,
}

impl FormConfig {
    #[must_use]
    pub const fn with_category_policy(mut self, policy: CategoryPolicy) -> Self {
        self.category_policy = policy;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
