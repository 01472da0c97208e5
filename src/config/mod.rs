/*!
 * Engine Configuration
 * The immutable configuration object bundling every static table, its
 * load-time validation, and the atomically-swappable handle readers share
 */

pub mod defaults;

use crate::matrix::PermissionMatrix;
use crate::roles::Role;
use crate::rules::{AuditRuleSet, FieldPattern};
use crate::scope::ScopeMatrix;
use arc_swap::ArcSwap;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors, raised at load time so table typos are caught by
/// tests rather than silently treated as denials
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("scope matrix has no row for role '{role}'")]
    MissingScope { role: Role },

    #[error("permission matrix declares '{module}.{action}' with no roles")]
    EmptyRoles { module: String, action: String },

    #[error("audit rule for '{role}' references undeclared module '{module}'")]
    UnknownModule { role: Role, module: String },

    #[error("audit rule for '{role}' references undeclared action '{action}'")]
    UnknownAction { role: Role, action: String },
}

/// Process-wide static tables, loaded once and treated as immutable
///
/// Reload means building a fresh value and swapping it through
/// `ConfigHandle`; fields are never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scope: ScopeMatrix,
    pub matrix: PermissionMatrix,
    pub audit_rules: AuditRuleSet,
    #[serde(default)]
    pub self_only_actions: HashSet<String>,
    /// Redaction rules no session override can lift
    #[serde(default)]
    pub floor_redactions: Vec<FieldPattern>,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse {
                reason: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-check the tables; any inconsistency is a hard error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(role) = self.scope.missing_roles().into_iter().next() {
            return Err(ConfigError::MissingScope { role });
        }
        if let Some((module, action)) = self.matrix.empty_declarations().into_iter().next() {
            return Err(ConfigError::EmptyRoles { module, action });
        }

        let modules = self.matrix.module_names();
        let actions = self.matrix.action_names();
        for (role, rule) in self.audit_rules.iter() {
            for module in &rule.allowed_modules {
                if !modules.contains(module.as_str()) {
                    return Err(ConfigError::UnknownModule {
                        role,
                        module: module.clone(),
                    });
                }
            }
            for action in &rule.allowed_actions {
                if !actions.contains(action.as_str()) {
                    return Err(ConfigError::UnknownAction {
                        role,
                        action: action.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        defaults::engine_config()
    }
}

/// Shared handle to the current configuration
///
/// Readers load a consistent snapshot without locks; reload swaps the
/// whole object atomically so no reader ever observes a half-updated
/// matrix.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<EngineConfig>>,
}

impl ConfigHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Snapshot of the current configuration
    pub fn current(&self) -> Arc<EngineConfig> {
        self.inner.load_full()
    }

    /// Atomically replace the configuration
    ///
    /// The replacement must already be validated.
    pub fn replace(&self, config: EngineConfig) {
        self.inner.store(Arc::new(config));
        info!("engine configuration replaced");
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
