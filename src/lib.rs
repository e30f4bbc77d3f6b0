pub mod audio;
pub mod config;
pub mod cycle;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod system;

pub use audio::{AudioDevice, Role, RoleSet};
pub use config::{Config, ConfigLoader};
pub use cycle::{CycleEngine, CycleOutcome, CyclePlan};
pub use dashboard::{Dashboard, DeviceRow};
pub use error::{Error, Result};

#[cfg(any(test, feature = "test-mocks"))]
pub use system::{MockAudioSystem, MockFileSystem};
