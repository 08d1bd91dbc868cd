//! JSON engine configuration: cultures, grammars and lookup key fallbacks.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use dtk_model::{CultureIdFallback, DataTypeError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cultures::DEFAULT_CULTURE_ID;
use crate::defaults;
use crate::grammar::CultureGrammar;
use crate::lookup_key_fallback::LookupKeyFallbackRegistry;
use crate::services::DataTypeServices;

fn default_active_culture() -> String {
    DEFAULT_CULTURE_ID.to_string()
}

/// Where a culture's grammar comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrammarSource {
    /// Name of a built-in grammar, e.g. `"en-GB"`.
    Builtin(String),
    Custom(CultureGrammar),
}

impl GrammarSource {
    pub fn resolve(&self) -> Result<CultureGrammar> {
        match self {
            Self::Builtin(name) => CultureGrammar::builtin(name)
                .ok_or_else(|| DataTypeError::Config(format!("no built-in grammar for \"{name}\""))),
            Self::Custom(grammar) => Ok(grammar.clone()),
        }
    }
}

/// One culture entry. Cultures without a grammar borrow the handlers of the
/// nearest culture along their fallback chain that has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureConfig {
    #[serde(flatten)]
    pub culture: CultureIdFallback,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<GrammarSource>,
}

impl CultureConfig {
    pub fn new(culture_id: &str, fallback_culture_id: Option<&str>) -> Self {
        Self {
            culture: CultureIdFallback::new(culture_id, fallback_culture_id),
            grammar: None,
        }
    }

    #[must_use]
    pub fn with_builtin_grammar(mut self, name: &str) -> Self {
        self.grammar = Some(GrammarSource::Builtin(name.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_active_culture")]
    pub active_culture: String,

    #[serde(default)]
    pub cultures: Vec<CultureConfig>,

    /// Custom lookup key to more general lookup key. Added after the
    /// built-in fallbacks, so an entry here overrides a built-in one.
    #[serde(default)]
    pub lookup_key_fallbacks: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    /// `en`, `en-US`, `en-GB`, `fr`, `fr-FR`, `de` and `de-DE` with built-in grammars.
    fn default() -> Self {
        Self {
            active_culture: default_active_culture(),
            cultures: vec![
                CultureConfig::new("en", None).with_builtin_grammar("en"),
                CultureConfig::new("en-US", Some("en")),
                CultureConfig::new("en-GB", Some("en")).with_builtin_grammar("en-GB"),
                CultureConfig::new("fr", None).with_builtin_grammar("fr"),
                CultureConfig::new("fr-FR", Some("fr")),
                CultureConfig::new("de", None).with_builtin_grammar("de"),
                CultureConfig::new("de-DE", Some("de")),
            ],
            lookup_key_fallbacks: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| DataTypeError::Config(format!("invalid engine config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|err| {
            DataTypeError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| DataTypeError::Config(format!("cannot serialize engine config: {err}")))
    }

    fn validate(&self) -> Result<()> {
        if self.active_culture.trim().is_empty() {
            return Err(DataTypeError::Config("activeCulture must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for entry in &self.cultures {
            let id = entry.culture.culture_id.trim();
            if id.is_empty() {
                return Err(DataTypeError::Config("cultureId must not be empty".to_string()));
            }
            if !seen.insert(id) {
                return Err(DataTypeError::Config(format!(
                    "culture \"{id}\" is listed more than once"
                )));
            }
        }
        Ok(())
    }

    fn entry(&self, culture_id: &str) -> Option<&CultureConfig> {
        self.cultures
            .iter()
            .find(|entry| entry.culture.culture_id == culture_id)
    }

    /// The culture whose grammar serves `culture_id`: itself when it has a
    /// grammar, else the first culture with one along its fallback chain.
    pub fn grammar_owner(&self, culture_id: &str) -> Result<Option<&CultureConfig>> {
        let mut visited = HashSet::new();
        let mut current = culture_id;
        loop {
            LookupKeyFallbackRegistry::ensure_recursion_safe(current, &mut visited)?;
            let Some(entry) = self.entry(current) else {
                return Ok(None);
            };
            if entry.grammar.is_some() {
                return Ok(Some(entry));
            }
            match entry.culture.fallback_culture_id.as_deref() {
                Some(fallback) => current = fallback,
                None => return Ok(None),
            }
        }
    }

    /// Grammar owners in declaration order with every culture they serve.
    pub fn grammar_groups(&self) -> Result<Vec<GrammarGroup>> {
        let mut groups: Vec<GrammarGroup> = Vec::new();
        for entry in &self.cultures {
            let culture_id = entry.culture.culture_id.as_str();
            let Some(owner) = self.grammar_owner(culture_id)? else {
                continue;
            };
            let owner_id = owner.culture.culture_id.as_str();
            if let Some(group) = groups.iter_mut().find(|group| group.owner == owner_id) {
                if !group.members.iter().any(|member| member == culture_id) {
                    group.members.push(culture_id.to_string());
                }
                continue;
            }
            let Some(source) = &owner.grammar else {
                continue;
            };
            let mut members = vec![owner_id.to_string()];
            if owner_id != culture_id {
                members.push(culture_id.to_string());
            }
            groups.push(GrammarGroup {
                owner: owner_id.to_string(),
                grammar: source.resolve()?,
                members,
            });
        }
        Ok(groups)
    }
}

/// Cultures sharing one grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarGroup {
    pub owner: String,
    pub grammar: CultureGrammar,
    /// The owner first, then the cultures that fall back to it.
    pub members: Vec<String>,
}

impl DataTypeServices {
    /// Builds a container from `config`: cultures, lookup key fallbacks,
    /// identifiers, converters, and per-grammar parsers and formatters.
    pub fn from_config(config: &EngineConfig) -> Result<Arc<Self>> {
        let services = Self::new();

        for entry in &config.cultures {
            services.cultures().register(entry.culture.clone())?;
        }
        services
            .cultures()
            .set_active_culture_id(config.active_culture.trim())?;

        defaults::register_lookup_key_fallbacks(&services)?;
        for (custom, general) in &config.lookup_key_fallbacks {
            services.lookup_key_fallbacks().register(custom, general)?;
        }

        defaults::register_identifiers(&services)?;
        defaults::register_converters(&services)?;
        for group in config.grammar_groups()? {
            defaults::register_culture_handlers(
                &services,
                &group.grammar,
                &group.members,
                std::slice::from_ref(&group.owner),
            )?;
        }
        defaults::register_culture_agnostic(&services)?;

        info!(
            cultures = config.cultures.len(),
            parsers = services.parsers().len(),
            formatters = services.formatters().len(),
            active_culture = %config.active_culture,
            "data type services configured"
        );
        Ok(services)
    }

    /// [`DataTypeServices::from_config`] with [`EngineConfig::default`].
    pub fn with_defaults() -> Result<Arc<Self>> {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_groups_follow_fallbacks() {
        let groups = EngineConfig::default().grammar_groups().unwrap();
        let summary: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|group| {
                (
                    group.owner.as_str(),
                    group.members.iter().map(String::as_str).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("en", vec!["en", "en-US"]),
                ("en-GB", vec!["en-GB"]),
                ("fr", vec!["fr", "fr-FR"]),
                ("de", vec!["de", "de-DE"]),
            ]
        );
    }

    #[test]
    fn cultures_without_grammar_owner_are_skipped() {
        let config = EngineConfig::from_json_str(
            r#"{ "cultures": [ { "cultureId": "xx" }, { "cultureId": "en", "grammar": "en" } ] }"#,
        )
        .unwrap();
        let groups = config.grammar_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec!["en".to_string()]);
    }

    #[test]
    fn cyclic_culture_chain_is_reported() {
        let config = EngineConfig::from_json_str(
            r#"{ "cultures": [
                { "cultureId": "a", "fallbackCultureId": "b" },
                { "cultureId": "b", "fallbackCultureId": "a" }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            config.grammar_groups(),
            Err(DataTypeError::CyclicFallback { .. })
        ));
    }

    #[test]
    fn unknown_builtin_grammar_is_a_config_error() {
        let config = EngineConfig::from_json_str(
            r#"{ "cultures": [ { "cultureId": "xx", "grammar": "xx" } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            config.grammar_groups(),
            Err(DataTypeError::Config(_))
        ));
    }

    #[test]
    fn duplicate_and_malformed_configs_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(
                r#"{ "cultures": [ { "cultureId": "en" }, { "cultureId": "en" } ] }"#
            ),
            Err(DataTypeError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(DataTypeError::Config(_))
        ));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config.active_culture, "en");
        assert!(config.cultures.is_empty());
    }
}
