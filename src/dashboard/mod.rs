//! State behind the interactive mode: the device checklist the user edits and
//! the two actions it can trigger.

pub mod console;

use tracing::{debug, info};

use crate::audio::{AudioDevice, matcher};
use crate::config::Config;
use crate::cycle::CycleEngine;
use crate::error::Result;
use crate::system::{EndpointDirectory, EndpointSwitcher, FileSystemInterface};

pub use console::run_console;

/// One line of the device checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub device: AudioDevice,
    pub is_default: bool,
    pub in_cycle: bool,
}

/// Checklist state for one interactive session.
///
/// Owns the working copy of the config; the engine itself stays stateless.
pub struct Dashboard<'a, A, F>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
{
    engine: &'a CycleEngine<A, F>,
    config: Config,
    rows: Vec<DeviceRow>,
}

impl<'a, A, F> Dashboard<'a, A, F>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
{
    /// Load devices and config. Fails only when devices cannot be listed.
    pub fn open(engine: &'a CycleEngine<A, F>) -> Result<Self> {
        let mut dashboard = Self {
            engine,
            config: engine.load_config(),
            rows: Vec::new(),
        };
        dashboard.reload()?;
        Ok(dashboard)
    }

    pub fn rows(&self) -> &[DeviceRow] {
        &self.rows
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-enumerate devices, keeping ticks for devices still present
    pub fn reload(&mut self) -> Result<()> {
        let devices = self.engine.devices()?;
        let current = self.engine.current_default_id();

        let previous = std::mem::take(&mut self.rows);
        self.rows = devices
            .into_iter()
            .map(|device| {
                let in_cycle = previous
                    .iter()
                    .find(|row| row.device.id == device.id)
                    .map(|row| row.in_cycle)
                    .unwrap_or_else(|| matcher::in_allow_list(&device, &self.config.devices));
                DeviceRow {
                    is_default: current.as_deref() == Some(device.id.as_str()),
                    in_cycle,
                    device,
                }
            })
            .collect();

        debug!("Dashboard shows {} devices", self.rows.len());
        Ok(())
    }

    /// Re-read which device is the default
    pub fn refresh_default(&mut self) {
        let current = self.engine.current_default_id();
        for row in &mut self.rows {
            row.is_default = current.as_deref() == Some(row.device.id.as_str());
        }
    }

    /// Tick or untick a device. Returns false for an unknown id.
    pub fn set_in_cycle(&mut self, device_id: &str, in_cycle: bool) -> bool {
        match self.rows.iter_mut().find(|row| row.device.id == device_id) {
            Some(row) => {
                row.in_cycle = in_cycle;
                true
            }
            None => false,
        }
    }

    /// Switch to a device right away. The stored config is left untouched.
    ///
    /// The default marker is re-read even on failure, since roles assigned
    /// before the failing one keep the new device.
    pub fn switch_to(&mut self, device_id: &str) -> Result<()> {
        let result = self.engine.switch_to(device_id);
        self.refresh_default();
        result
    }

    /// Replace the allow-list with the ticked devices and persist it.
    ///
    /// Device names are stored so the file stays readable. When the current
    /// default is ticked it also becomes `last_device_id`, so the next cycle
    /// continues from it.
    pub fn save_allow_list(&mut self) -> Result<()> {
        let mut config = self.config.clone();
        config.devices = self
            .rows
            .iter()
            .filter(|row| row.in_cycle)
            .map(|row| row.device.name.clone())
            .collect();

        if let Some(current) = self.engine.current_default_id() {
            if self
                .rows
                .iter()
                .any(|row| row.in_cycle && row.device.id == current)
            {
                config.last_device_id = current;
            }
        }

        self.engine.save_config(&config)?;
        info!("Saved allow-list with {} devices", config.devices.len());
        self.config = config;
        Ok(())
    }

    /// Tick exactly the devices in `device_ids` and persist the allow-list
    pub fn replace_allow_list<S: AsRef<str>>(&mut self, device_ids: &[S]) -> Result<()> {
        for row in &mut self.rows {
            row.in_cycle = device_ids.iter().any(|id| id.as_ref() == row.device.id);
        }
        self.save_allow_list()
    }
}
