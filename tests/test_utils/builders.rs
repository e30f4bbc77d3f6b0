//! Test utility builders for creating audio devices and test fixtures
//!
//! Individual helpers may not be used by all tests, so dead code warnings are suppressed.

#![allow(dead_code)]

use std::path::PathBuf;

use sink_switch::{AudioDevice, Config, ConfigLoader, CycleEngine, MockAudioSystem, MockFileSystem};

/// Builder for creating test AudioDevice instances
pub struct AudioDeviceBuilder {
    id: String,
    name: String,
}

impl AudioDeviceBuilder {
    pub fn new() -> Self {
        Self {
            id: "{0.0.0.00000000}.{test-device-1}".to_string(),
            name: "Test Device".to_string(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn build(self) -> AudioDevice {
        AudioDevice::new(self.id, self.name)
    }
}

impl Default for AudioDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A typical desktop: onboard speakers, a USB headset and a monitor over HDMI
pub fn desktop_devices() -> Vec<AudioDevice> {
    vec![
        AudioDeviceBuilder::new()
            .id("spk")
            .name("Speakers (Realtek(R) Audio)")
            .build(),
        AudioDeviceBuilder::new()
            .id("hs")
            .name("Headset Earphone (HyperX Cloud II)")
            .build(),
        AudioDeviceBuilder::new()
            .id("tv")
            .name("LG TV (NVIDIA High Definition Audio)")
            .build(),
    ]
}

pub fn config_path() -> PathBuf {
    PathBuf::from("/test/SinkSwitch/config.json")
}

/// Mocks wired into an engine; the mock handles share state with the engine
pub struct EngineFixture {
    pub audio: MockAudioSystem,
    pub files: MockFileSystem,
    pub engine: CycleEngine<MockAudioSystem, MockFileSystem>,
}

impl EngineFixture {
    pub fn new(devices: Vec<AudioDevice>) -> Self {
        let audio = MockAudioSystem::with_devices(devices);
        let files = MockFileSystem::new();
        let engine = CycleEngine::new(
            audio.clone(),
            ConfigLoader::new(files.clone(), config_path()),
        );
        Self {
            audio,
            files,
            engine,
        }
    }

    pub fn with_config(self, config: &Config) -> Self {
        self.files
            .add_file(config_path(), serde_json::to_string(config).unwrap());
        self
    }

    /// Config as currently stored in the mock file system
    pub fn stored_config(&self) -> Option<Config> {
        self.files
            .file_content(config_path())
            .map(|content| serde_json::from_str(&content).unwrap())
    }
}
