/*!
 * Engine Limits and Constants
 * Centralized location for engine-wide limits and thresholds
 */

/// Maximum decision events kept in the global ring buffer
/// Oldest events are dropped once the buffer is full
pub const MAX_DECISION_EVENTS: usize = 10_000;

/// Maximum decision events retained per actor
/// [SECURITY] Bounds memory a single noisy actor can consume
pub const MAX_ACTOR_DECISION_EVENTS: usize = 256;

/// Random bytes in a session bearer token (256 bits)
/// [SECURITY] Twice the 128-bit minimum for an unguessable bearer token
pub const SESSION_TOKEN_BYTES: usize = 32;
