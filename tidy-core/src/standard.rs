use crate::context::{RuleContext, TracingSink};
use crate::error::{Result, TidyError};
use crate::file::FileAccessor;
use crate::registry::RuleRegistry;
use crate::rule::RuleConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

const BADGE_BASE: &str =
    "https://raw.githubusercontent.com/bemanproject/beman/refs/heads/main/images/badges";
const MATURITY_MODEL_DOC: &str =
    "https://github.com/bemanproject/beman/blob/main/docs/BEMAN_LIBRARY_MATURITY_MODEL.md";

/// Whether failing a rule blocks acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Requirement,
    Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// A versioned set of rule IDs with their parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    /// Ordered library maturity states.
    pub maturity_model: Vec<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleEntry>,
}

impl Standard {
    /// Parses a Standard definition, YAML first, then JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileAccessor::new(path).read_content()?;

        let yaml_error = match serde_yaml::from_str::<Standard>(&content) {
            Ok(standard) => return Ok(standard),
            Err(err) => err,
        };
        if let Ok(standard) = serde_json::from_str::<Standard>(&content) {
            return Ok(standard);
        }

        Err(TidyError::Config(format!(
            "Failed to parse '{}' as a YAML or JSON standard definition: {}",
            path.display(),
            yaml_error
        )))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)
            .map_err(|err| TidyError::Config(format!("Failed to serialize standard: {}", err)))?;
        std::fs::write(path, yaml).map_err(|source| TidyError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The README part of the Beman Standard.
    pub fn builtin() -> Self {
        let badge = |name: &str| {
            format!("![Library Status]({}/beman_badge-beman_library_{}.svg)", BADGE_BASE, name)
        };
        let status = |text: &str, anchor: &str| {
            format!("**Status**: [{}]({}#{})", text, MATURITY_MODEL_DOC, anchor)
        };

        let mut rules = BTreeMap::new();
        rules.insert(
            "README.TITLE".to_string(),
            RuleEntry {
                kind: RuleKind::Recommendation,
                values: Vec::new(),
            },
        );
        rules.insert(
            "README.BADGES".to_string(),
            RuleEntry {
                kind: RuleKind::Requirement,
                values: vec![
                    badge("under_development"),
                    badge("production_ready_api_may_undergo_changes"),
                    badge("production_ready_stable_api"),
                    badge("retired"),
                ],
            },
        );
        rules.insert(
            "README.IMPLEMENTS".to_string(),
            RuleEntry {
                kind: RuleKind::Recommendation,
                values: Vec::new(),
            },
        );
        rules.insert(
            "README.LIBRARY_STATUS".to_string(),
            RuleEntry {
                kind: RuleKind::Requirement,
                values: vec![
                    status(
                        "Under development and not yet ready for production use.",
                        "under-development-and-not-yet-ready-for-production-use",
                    ),
                    status(
                        "Production ready. API may undergo changes.",
                        "production-ready-api-may-undergo-changes",
                    ),
                    status(
                        "Production ready. Stable API.",
                        "production-ready-stable-api",
                    ),
                    status(
                        "Retired. No longer maintained or actively developed.",
                        "retired-no-longer-maintained-or-actively-developed",
                    ),
                ],
            },
        );

        Self {
            maturity_model: vec![
                "UNDER_DEVELOPMENT".to_string(),
                "PRODUCTION_READY_API_MAY_UNDERGO_CHANGES".to_string(),
                "PRODUCTION_READY_STABLE_API".to_string(),
                "RETIRED".to_string(),
            ],
            rules,
        }
    }

    /// Declared rule IDs, sorted.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// Typed configuration for one rule. `require_all` promotes recommendations.
    pub fn rule_config(&self, id: &str, require_all: bool) -> Result<RuleConfig> {
        let entry = self
            .rules
            .get(id)
            .ok_or_else(|| TidyError::UnknownRule(id.to_string()))?;

        Ok(RuleConfig {
            values: entry.values.clone(),
            required: require_all || entry.kind == RuleKind::Requirement,
        })
    }

    /// Checks the whole definition against the registry before any library is touched.
    ///
    /// Every declared rule must be registered and must accept its configuration.
    pub fn validate(&self, registry: &RuleRegistry) -> Result<()> {
        if self.maturity_model.is_empty() {
            return Err(TidyError::Config(
                "the library maturity model must declare at least one state".to_string(),
            ));
        }

        for id in self.rule_ids() {
            let descriptor = registry.lookup(id)?;
            let context = RuleContext::new(
                "",
                descriptor.target_file,
                self.maturity_model.clone(),
                Arc::new(TracingSink),
            )?;
            let config = self.rule_config(id, false)?;
            registry
                .instantiate(id, &context, &config)
                .map_err(|err| match err {
                    TidyError::Config(message) => TidyError::Config(format!("{}: {}", id, message)),
                    other => other,
                })?;
        }

        Ok(())
    }
}
