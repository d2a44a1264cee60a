//! Inspector configuration.
//!
//! Mirrors the options object a host passes when it creates an inspector:
//!
//! ```toml
//! collapse = "top"          # false | true | "top" | ["key", ...]
//! collapseExcept = ["id"]   # false | ["key", ...]
//! ```
//!
//! Parsing never rejects an odd option value: anything unrecognized is kept
//! as-is and surfaces as an [`InspectError`] from [`InspectorConfig::policy`],
//! so the caller can report it and carry on without collapsing.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{InspectError, InspectResult};

/// The `collapse` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollapseOption {
    Flag(bool),
    Mode(String),
    Keys(Vec<String>),
    /// Anything else. Always a configuration error.
    Other(serde_json::Value),
}

impl Default for CollapseOption {
    fn default() -> Self {
        CollapseOption::Flag(false)
    }
}

/// The `collapseExcept` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollapseExcept {
    Flag(bool),
    Keys(Vec<String>),
    Other(serde_json::Value),
}

impl Default for CollapseExcept {
    fn default() -> Self {
        CollapseExcept::Flag(false)
    }
}

/// Resolved collapse behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollapsePolicy {
    /// Everything expanded.
    #[default]
    None,
    /// Everything collapsed (reversed default).
    All,
    /// Direct children of the root collapsed.
    Top,
    /// The named direct children of the root collapsed.
    Listed(Vec<String>),
    /// Every direct child of the root collapsed except the named ones.
    Except(Vec<String>),
}

/// Options an inspector is created with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectorConfig {
    pub collapse: CollapseOption,
    pub collapse_except: CollapseExcept,
}

impl InspectorConfig {
    /// No collapsing.
    pub fn new() -> Self {
        Self::default()
    }

    /// `collapse: true`
    pub fn collapse_all() -> Self {
        Self {
            collapse: CollapseOption::Flag(true),
            ..Self::default()
        }
    }

    /// `collapse: "top"`
    pub fn collapse_top() -> Self {
        Self {
            collapse: CollapseOption::Mode("top".to_string()),
            ..Self::default()
        }
    }

    /// `collapse: [keys]`
    pub fn collapse_keys<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            collapse: CollapseOption::Keys(keys.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// `collapseExcept: [keys]`
    pub fn collapse_except<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            collapse_except: CollapseExcept::Keys(keys.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> InspectResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_toml_str(toml: &str) -> InspectResult<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Load from a file. `.json` files are read as JSON, anything else as
    /// TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read inspector config from {}", path.display()))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.with_context(|| format!("Failed to parse inspector config from {}", path.display()))
    }

    /// Resolve the options into a policy.
    ///
    /// `collapse: true` wins over everything. Otherwise a `collapseExcept`
    /// key list applies, and failing that the `collapse` mode or key list.
    pub fn policy(&self) -> InspectResult<CollapsePolicy> {
        if self.collapse == CollapseOption::Flag(true) {
            return Ok(CollapsePolicy::All);
        }

        match &self.collapse_except {
            CollapseExcept::Keys(keys) => return Ok(CollapsePolicy::Except(keys.clone())),
            CollapseExcept::Flag(false) => {}
            CollapseExcept::Flag(true) => {
                return Err(InspectError::UnrecognizedCollapseExcept("true".to_string()))
            }
            CollapseExcept::Other(other) => {
                return Err(InspectError::UnrecognizedCollapseExcept(other.to_string()))
            }
        }

        match &self.collapse {
            CollapseOption::Flag(_) => Ok(CollapsePolicy::None),
            CollapseOption::Mode(mode) if mode == "top" => Ok(CollapsePolicy::Top),
            CollapseOption::Mode(mode) => Err(InspectError::UnrecognizedCollapse(format!("{:?}", mode))),
            CollapseOption::Keys(keys) => Ok(CollapsePolicy::Listed(keys.clone())),
            CollapseOption::Other(other) => Err(InspectError::UnrecognizedCollapse(other.to_string())),
        }
    }
}
