//! Error types for the combat simulation.
//!
//! Errors are reserved for wiring and configuration bugs in the host
//! application. Gameplay preconditions that fail (firing with no player,
//! cycling targets inside the debounce window, unknown pickup names) are
//! silent no-ops, never errors.

use thiserror::Error;

/// Result type alias using [`CombatError`].
pub type Result<T> = std::result::Result<T, CombatError>;

/// Top-level error type for all combat simulation errors.
#[derive(Debug, Error)]
pub enum CombatError {
    /// A weapon or passive stat record failed validation.
    #[error("Invalid configuration for '{entry}': {message}")]
    InvalidConfig {
        /// Name of the offending config entry.
        entry: String,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid engine state that indicates a host wiring bug.
    #[error("Invalid combat state: {0}")]
    InvalidState(String),
}
