use std::path::Path;

use crate::system::traits::FileSystemInterface;

#[cfg(windows)]
pub use crate::audio::wasapi::WasapiAudioSystem as PlatformAudioSystem;

#[cfg(not(windows))]
pub use unsupported::UnsupportedAudioSystem as PlatformAudioSystem;

/// Production implementation of FileSystemInterface using std::fs
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardFileSystem;

impl FileSystemInterface for StandardFileSystem {
    fn read_config_file(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_config_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        std::fs::write(path, content)
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_config_dir(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(not(windows))]
mod unsupported {
    use crate::audio::{AudioDevice, Role};
    use crate::error::{Error, Result};
    use crate::system::traits::{EndpointDirectory, EndpointSwitcher};

    const MESSAGE: &str = "default render endpoints can only be managed on Windows";

    /// Stand-in used on targets without the Windows audio endpoint API.
    #[derive(Debug, Default)]
    pub struct UnsupportedAudioSystem;

    impl UnsupportedAudioSystem {
        pub fn new() -> Result<Self> {
            Ok(Self)
        }
    }

    impl EndpointDirectory for UnsupportedAudioSystem {
        fn list_active_render_endpoints(&self) -> Result<Vec<AudioDevice>> {
            Err(Error::Enumeration(MESSAGE.to_string()))
        }

        fn get_default_render_endpoint_id(&self, _role: Role) -> Result<String> {
            Err(Error::Query(MESSAGE.to_string()))
        }
    }

    impl EndpointSwitcher for UnsupportedAudioSystem {
        fn set_role_default(&self, device_id: &str, role: Role) -> Result<()> {
            Err(Error::Switch {
                role,
                device_id: device_id.to_string(),
                reason: MESSAGE.to_string(),
            })
        }
    }
}
