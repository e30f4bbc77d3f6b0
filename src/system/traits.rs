use std::path::Path;

use tracing::{debug, warn};

use crate::audio::{AudioDevice, Role, RoleSet};
use crate::error::{Error, Result};

/// Read side of the audio subsystem: which render endpoints exist and which
/// one is the default.
pub trait EndpointDirectory {
    /// List currently active render endpoints in enumeration order
    fn list_active_render_endpoints(&self) -> Result<Vec<AudioDevice>>;

    /// Get the id of the default render endpoint for `role`
    fn get_default_render_endpoint_id(&self, role: Role) -> Result<String>;
}

/// Write side of the audio subsystem: assigning the default endpoint.
pub trait EndpointSwitcher {
    /// Make `device_id` the default render endpoint for a single role
    fn set_role_default(&self, device_id: &str, role: Role) -> Result<()>;

    /// Make `device_id` the default for every role in `roles`, in order.
    ///
    /// Stops at the first role that fails and returns that failure. Roles
    /// already switched stay switched.
    fn set_default_render_endpoint(&self, device_id: &str, roles: RoleSet) -> Result<()> {
        for role in roles.iter() {
            if let Err(e) = self.set_role_default(device_id, role) {
                warn!("Setting default {} device failed, stopping: {}", role, e);
                return Err(match e {
                    err @ Error::Switch { .. } => err,
                    other => Error::Switch {
                        role,
                        device_id: device_id.to_string(),
                        reason: other.to_string(),
                    },
                });
            }
            debug!("Default {} device set to {}", role, device_id);
        }
        Ok(())
    }
}

/// Trait for file system operations - abstracts std::fs for testability
pub trait FileSystemInterface {
    /// Read the entire contents of a configuration file
    fn read_config_file(&self, path: &Path) -> std::io::Result<String>;

    /// Write configuration content to a file, replacing it
    fn write_config_file(&self, path: &Path, content: &str) -> std::io::Result<()>;

    /// Check if a configuration file exists
    fn config_file_exists(&self, path: &Path) -> bool;

    /// Create the directory structure for config files
    fn create_config_dir(&self, path: &Path) -> std::io::Result<()>;
}
