pub mod loader;
pub mod types;

pub use loader::{APP_DIR_NAME, CONFIG_FILE_NAME, ConfigLoader, resolve_config_path};
pub use types::Config;
