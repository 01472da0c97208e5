/*!
 * Audit Sessions
 * Time-boxed, token-gated read-only grants for external audit parties
 *
 * Sessions are the only runtime-mutable state in the engine. They are a
 * separate validation path: `has_permission` never consults them, and a
 * token grant never widens what the permission matrix allows an internal
 * role.
 */

pub mod manager;
pub mod store;
pub mod token;
pub mod types;

pub use manager::{AuditSessionManager, CreateSession, SessionError, SessionResult};
pub use store::{MemoryStore, SessionStore, StoreError, StoreResult};
pub use token::SessionToken;
pub use types::{AuditPartyType, AuditSession};
