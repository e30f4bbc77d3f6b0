use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::audio::{AudioDevice, Role};
use crate::error::{Error, Result};
use crate::system::traits::{EndpointDirectory, EndpointSwitcher, FileSystemInterface};

/// Mock audio system for testing - provides controllable endpoint behavior.
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
#[derive(Clone)]
pub struct MockAudioSystem {
    pub devices: Arc<Mutex<Vec<AudioDevice>>>,
    pub defaults: Arc<Mutex<[Option<String>; 3]>>,
    pub set_role_calls: Arc<Mutex<Vec<(String, Role)>>>, // attempted (device_id, role)
    pub should_fail_enumeration: Arc<Mutex<bool>>,
    pub should_fail_query: Arc<Mutex<bool>>,
    pub failing_role: Arc<Mutex<Option<Role>>>,
}

impl MockAudioSystem {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(Mutex::new(Vec::new())),
            defaults: Arc::new(Mutex::new([None, None, None])),
            set_role_calls: Arc::new(Mutex::new(Vec::new())),
            should_fail_enumeration: Arc::new(Mutex::new(false)),
            should_fail_query: Arc::new(Mutex::new(false)),
            failing_role: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock populated with `devices`, in enumeration order
    pub fn with_devices(devices: Vec<AudioDevice>) -> Self {
        let mock = Self::new();
        *mock.devices.lock().unwrap() = devices;
        mock
    }

    /// Add a device to the end of the enumeration order
    pub fn add_device(&self, device: AudioDevice) {
        self.devices.lock().unwrap().push(device);
    }

    /// Remove a device by id
    pub fn remove_device(&self, device_id: &str) {
        self.devices.lock().unwrap().retain(|d| d.id != device_id);
    }

    /// Set the default device for every role
    pub fn set_mock_default(&self, device_id: Option<&str>) {
        let value = device_id.map(str::to_string);
        *self.defaults.lock().unwrap() = [value.clone(), value.clone(), value];
    }

    /// Default device currently recorded for `role`
    pub fn default_for(&self, role: Role) -> Option<String> {
        self.defaults.lock().unwrap()[role as usize].clone()
    }

    /// Get all role assignments that were attempted, including a failing one
    pub fn get_set_role_calls(&self) -> Vec<(String, Role)> {
        self.set_role_calls.lock().unwrap().clone()
    }

    /// Configure the mock to fail enumeration
    pub fn set_enumeration_failure(&self, should_fail: bool) {
        *self.should_fail_enumeration.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail default-device queries
    pub fn set_query_failure(&self, should_fail: bool) {
        *self.should_fail_query.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail when assigning `role`
    pub fn set_role_failure(&self, role: Option<Role>) {
        *self.failing_role.lock().unwrap() = role;
    }
}

impl EndpointDirectory for MockAudioSystem {
    fn list_active_render_endpoints(&self) -> Result<Vec<AudioDevice>> {
        if *self.should_fail_enumeration.lock().unwrap() {
            return Err(Error::Enumeration("Mock enumeration failure".to_string()));
        }
        Ok(self.devices.lock().unwrap().clone())
    }

    fn get_default_render_endpoint_id(&self, role: Role) -> Result<String> {
        if *self.should_fail_query.lock().unwrap() {
            return Err(Error::Query("Mock query failure".to_string()));
        }
        self.default_for(role)
            .ok_or_else(|| Error::Query(format!("No default {} device", role)))
    }
}

impl EndpointSwitcher for MockAudioSystem {
    fn set_role_default(&self, device_id: &str, role: Role) -> Result<()> {
        self.set_role_calls
            .lock()
            .unwrap()
            .push((device_id.to_string(), role));

        if *self.failing_role.lock().unwrap() == Some(role) {
            return Err(Error::Switch {
                role,
                device_id: device_id.to_string(),
                reason: "Mock set default failure".to_string(),
            });
        }

        self.defaults.lock().unwrap()[role as usize] = Some(device_id.to_string());
        Ok(())
    }
}

impl Default for MockAudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock file system for testing - provides controllable file operations
#[derive(Clone)]
pub struct MockFileSystem {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub read_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub write_calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub directory_creation_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub should_fail_read: Arc<Mutex<bool>>,
    pub should_fail_write: Arc<Mutex<bool>>,
    pub should_fail_create_dir: Arc<Mutex<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            read_calls: Arc::new(Mutex::new(Vec::new())),
            write_calls: Arc::new(Mutex::new(Vec::new())),
            directory_creation_calls: Arc::new(Mutex::new(Vec::new())),
            should_fail_read: Arc::new(Mutex::new(false)),
            should_fail_write: Arc::new(Mutex::new(false)),
            should_fail_create_dir: Arc::new(Mutex::new(false)),
        }
    }

    /// Add a file to the mock file system
    pub fn add_file<P: AsRef<Path>>(&self, path: P, content: String) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content);
    }

    /// Current content of a file, if present
    pub fn file_content<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Get all read calls that were made
    pub fn get_read_calls(&self) -> Vec<PathBuf> {
        self.read_calls.lock().unwrap().clone()
    }

    /// Get all write calls that were made
    pub fn get_write_calls(&self) -> Vec<(PathBuf, String)> {
        self.write_calls.lock().unwrap().clone()
    }

    /// Get all directory creation calls that were made
    pub fn get_directory_creation_calls(&self) -> Vec<PathBuf> {
        self.directory_creation_calls.lock().unwrap().clone()
    }

    /// Configure the mock to fail read operations
    pub fn set_read_failure(&self, should_fail: bool) {
        *self.should_fail_read.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail write operations
    pub fn set_write_failure(&self, should_fail: bool) {
        *self.should_fail_write.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail directory creation
    pub fn set_create_dir_failure(&self, should_fail: bool) {
        *self.should_fail_create_dir.lock().unwrap() = should_fail;
    }
}

fn mock_io_error(message: &str) -> std::io::Error {
    std::io::Error::other(message.to_string())
}

impl FileSystemInterface for MockFileSystem {
    fn read_config_file(&self, path: &Path) -> std::io::Result<String> {
        self.read_calls.lock().unwrap().push(path.to_path_buf());

        if *self.should_fail_read.lock().unwrap() {
            return Err(mock_io_error("Mock read failure"));
        }

        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })
    }

    fn write_config_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        self.write_calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content.to_string()));

        if *self.should_fail_write.lock().unwrap() {
            return Err(mock_io_error("Mock write failure"));
        }

        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_config_dir(&self, path: &Path) -> std::io::Result<()> {
        self.directory_creation_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());

        if *self.should_fail_create_dir.lock().unwrap() {
            return Err(mock_io_error("Mock create directory failure"));
        }

        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}
