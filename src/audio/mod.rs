pub mod device;
pub mod matcher;
#[cfg(windows)]
pub mod wasapi;

pub use device::{AudioDevice, Role, RoleSet};
pub use matcher::{in_allow_list, match_devices, matches_pattern};
