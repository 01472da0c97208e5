/*!
 * Core Types and Limits
 * Shared identifiers, error types, and engine-wide constants
 */

pub mod limits;
pub mod types;

pub use types::{AuthzError, AuthzResult, CompanyId, DepartmentId, UserId, VesselId};
