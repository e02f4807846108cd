use html_id_types::RuleSeverity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{ConfigError, Result};

/// Top-level configuration.
///
/// Every field is optional so that a partial config (for example LSP
/// initialization options) can be layered over another with [`merge`].
///
/// ```yaml
/// completionDatabase: ./dom-completions.json
/// diagnostics:
///   duplicateIds: warn
/// ```
///
/// [`merge`]: HtmlIdConfig::merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlIdConfig {
    /// Completion database artifact to load instead of the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_database: Option<PathBuf>,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Diagnostic settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsConfig {
    /// `error`, `warn` or `off`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "severity_serde"
    )]
    pub duplicate_ids: Option<RuleSeverity>,
}

impl HtmlIdConfig {
    /// Parse LSP `initializationOptions`.
    ///
    /// `null` is treated as an empty config.
    pub fn from_initialization_options(options: &serde_json::Value) -> Result<Self> {
        if options.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(options).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }

    /// Layer `overrides` on top of `self`. Fields set in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            completion_database: overrides.completion_database.or(self.completion_database),
            diagnostics: DiagnosticsConfig {
                duplicate_ids: overrides
                    .diagnostics
                    .duplicate_ids
                    .or(self.diagnostics.duplicate_ids),
            },
        }
    }

    /// Make a relative `completionDatabase` path relative to `base_dir`.
    #[must_use]
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        if let Some(path) = &self.completion_database {
            if path.is_relative() {
                self.completion_database = Some(base_dir.join(path));
            }
        }
        self
    }

    /// Effective severity of the duplicate id check.
    #[must_use]
    pub fn duplicate_id_severity(&self) -> RuleSeverity {
        self.diagnostics.duplicate_ids.unwrap_or_default()
    }
}

/// `RuleSeverity` as a lowercase string.
mod severity_serde {
    use html_id_types::RuleSeverity;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        severity: &Option<RuleSeverity>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match severity {
            Some(severity) => serializer.collect_str(severity),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<RuleSeverity>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|value| value.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}
