//! Error types for engine interface loading

/// Error type for interface loading operations
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// Every probed version of the interface was rejected
    #[error("Interface not found: {name} (tried {first:03} to {last:03}, giving up)")]
    NotFound {
        /// Interface name without version suffix
        name: String,
        /// First version probed
        first: i32,
        /// Last version probed
        last: i32,
    },

    /// Factory reported a non-OK return code for the requested version
    #[error("Factory {factory} rejected {version} (code {code})")]
    Rejected {
        /// Full version string
        version: String,
        /// Human-readable factory name
        factory: &'static str,
        /// Return code written by the factory
        code: i32,
    },

    /// Factory reported success but returned null
    #[error("Factory returned null for: {0}")]
    NullPointer(String),

    /// Invalid interface version string (contains an interior null)
    #[error("Invalid version string: {0}")]
    InvalidVersionString(String),
}
