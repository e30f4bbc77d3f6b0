//! Error taxonomy for endpoint discovery, switching and config persistence.
//!
//! Only [`Error::Enumeration`], [`Error::Switch`] and
//! [`Error::InsufficientCandidates`] ever reach the user as failures. Query
//! and config-load problems are recovered where they happen.

use std::path::PathBuf;

use crate::audio::Role;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The active render endpoints could not be listed.
    #[error("failed to enumerate audio devices: {0}")]
    Enumeration(String),

    /// The current default endpoint could not be read.
    #[error("failed to query default audio device: {0}")]
    Query(String),

    /// Assigning the default endpoint for `role` failed. Roles earlier in the
    /// set may already have been switched.
    #[error("failed to set {device_id} as default {role} device: {reason}")]
    Switch {
        role: Role,
        device_id: String,
        reason: String,
    },

    #[error("config file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} is not valid JSON: {source}", path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Fewer than two devices are left to cycle between.
    #[error("need at least 2 devices to cycle between, found {found}")]
    InsufficientCandidates { found: usize },
}
