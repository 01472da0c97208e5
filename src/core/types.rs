/*!
 * Core Types
 * Common identifier types and the crate-wide error type
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User identifier as issued by the role-assignment store
pub type UserId = String;

/// Vessel identifier
pub type VesselId = String;

/// Department name (e.g. "Deck", "Engine")
pub type DepartmentId = String;

/// Company identifier
pub type CompanyId = String;

/// Result type for authorization operations
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Authorization errors
///
/// Denials are not errors: a failed check returns `false` (or `None`).
/// Errors signal caller mistakes or an unreachable backing store.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error")]
pub enum AuthzError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("backing store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl AuthzError {
    /// Invalid-argument error for an undeclared module
    pub fn unknown_module(module: &str) -> Self {
        Self::InvalidArgument {
            reason: format!("unknown module '{module}'"),
        }
    }

    /// Invalid-argument error for an undeclared action
    pub fn unknown_action(module: &str, action: &str) -> Self {
        Self::InvalidArgument {
            reason: format!("unknown action '{action}' in module '{module}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthzError::unknown_module("cargo");
        assert_eq!(err.to_string(), "invalid argument: unknown module 'cargo'");
    }

    #[test]
    fn test_error_serialization() {
        let err = AuthzError::unknown_action("crew", "teleport");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "invalid_argument");
    }
}
