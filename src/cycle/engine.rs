use tracing::{debug, info, warn};

use crate::audio::{AudioDevice, Role, RoleSet, matcher};
use crate::config::{Config, ConfigLoader};
use crate::error::{Error, Result};
use crate::system::{EndpointDirectory, EndpointSwitcher, FileSystemInterface};

/// Where the candidate list for a cycle step came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Patterns given for this invocation only
    Explicit,
    /// The configured allow-list
    AllowList,
    /// The allow-list matched fewer than two devices, so all devices are used
    AllowListFallback,
    /// No allow-list configured
    AllDevices,
}

/// A resolved cycle step: the ring, where we are on it, and where we go next.
#[derive(Debug, Clone)]
pub struct CyclePlan {
    pub candidates: Vec<AudioDevice>,
    pub source: CandidateSource,
    pub position: Option<usize>,
    pub target: AudioDevice,
}

impl CyclePlan {
    /// The candidate the ring is currently on, if known
    pub fn current(&self) -> Option<&AudioDevice> {
        self.position.map(|index| &self.candidates[index])
    }
}

/// Result of an applied cycle step.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub previous: Option<AudioDevice>,
    pub target: AudioDevice,
    /// False when the switch succeeded but the config could not be written
    pub persisted: bool,
}

/// Pick the devices to cycle between.
///
/// Explicit patterns must match at least two devices. The configured
/// allow-list silently widens to every device when it matches fewer than two.
pub fn select_candidates<S: AsRef<str>>(
    all_devices: &[AudioDevice],
    config: &Config,
    explicit_patterns: &[S],
) -> Result<(Vec<AudioDevice>, CandidateSource)> {
    let (candidates, source) = if !explicit_patterns.is_empty() {
        let matched = matcher::match_devices(all_devices, explicit_patterns);
        if matched.len() < 2 {
            return Err(Error::InsufficientCandidates {
                found: matched.len(),
            });
        }
        (matched, CandidateSource::Explicit)
    } else if !config.devices.is_empty() {
        let matched = config.matching_devices(all_devices);
        if matched.len() < 2 {
            debug!(
                "Allow-list matched {} device(s), cycling through all devices instead",
                matched.len()
            );
            (all_devices.to_vec(), CandidateSource::AllowListFallback)
        } else {
            (matched, CandidateSource::AllowList)
        }
    } else {
        (all_devices.to_vec(), CandidateSource::AllDevices)
    };

    if candidates.len() < 2 {
        return Err(Error::InsufficientCandidates {
            found: candidates.len(),
        });
    }

    Ok((candidates, source))
}

/// Find the current position on the ring.
///
/// The last device we switched to wins over what the OS reports, so a cycle
/// keeps its place even if something else changed the default meanwhile.
pub fn resolve_position(
    candidates: &[AudioDevice],
    last_device_id: &str,
    current_default_id: Option<&str>,
) -> Option<usize> {
    let index_of = |id: &str| candidates.iter().position(|d| d.id == id);

    if !last_device_id.is_empty() {
        if let Some(index) = index_of(last_device_id) {
            return Some(index);
        }
    }

    current_default_id.and_then(index_of)
}

/// Compute the next cycle step without touching the system.
pub fn plan_cycle<S: AsRef<str>>(
    all_devices: &[AudioDevice],
    config: &Config,
    explicit_patterns: &[S],
    current_default_id: Option<&str>,
) -> Result<CyclePlan> {
    let (candidates, source) = select_candidates(all_devices, config, explicit_patterns)?;
    let position = resolve_position(&candidates, &config.last_device_id, current_default_id);

    let target = match position {
        Some(index) => candidates[(index + 1) % candidates.len()].clone(),
        None => candidates[0].clone(),
    };

    Ok(CyclePlan {
        candidates,
        source,
        position,
        target,
    })
}

/// Drives one cycle step against the audio system and config store.
///
/// Holds no state between calls; everything persistent lives in the config
/// file.
pub struct CycleEngine<A, F>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
{
    audio_system: A,
    config_loader: ConfigLoader<F>,
}

impl<A, F> CycleEngine<A, F>
where
    A: EndpointDirectory + EndpointSwitcher,
    F: FileSystemInterface,
{
    pub fn new(audio_system: A, config_loader: ConfigLoader<F>) -> Self {
        Self {
            audio_system,
            config_loader,
        }
    }

    pub fn config_loader(&self) -> &ConfigLoader<F> {
        &self.config_loader
    }

    /// Active render endpoints; failure is fatal to the caller
    pub fn devices(&self) -> Result<Vec<AudioDevice>> {
        let devices = self.audio_system.list_active_render_endpoints()?;
        debug!("Found {} active render endpoints", devices.len());
        Ok(devices)
    }

    /// Id of the current default device, or `None` when it cannot be read
    pub fn current_default_id(&self) -> Option<String> {
        match self
            .audio_system
            .get_default_render_endpoint_id(Role::REPRESENTATIVE)
        {
            Ok(id) => Some(id),
            Err(e) => {
                debug!("Current default unknown: {}", e);
                None
            }
        }
    }

    pub fn load_config(&self) -> Config {
        self.config_loader.load()
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        self.config_loader.save(config)
    }

    /// Make `device_id` the default for every role.
    pub fn switch_to(&self, device_id: &str) -> Result<()> {
        info!("Switching default render endpoint to {}", device_id);
        self.audio_system
            .set_default_render_endpoint(device_id, RoleSet::ALL)
    }

    /// Plan the next step using live devices and the stored config
    pub fn plan<S: AsRef<str>>(&self, explicit_patterns: &[S]) -> Result<(CyclePlan, Config)> {
        let devices = self.devices()?;
        let config = self.load_config();
        let current = self.current_default_id();
        let plan = plan_cycle(&devices, &config, explicit_patterns, current.as_deref())?;
        Ok((plan, config))
    }

    /// Advance the cycle by one device and remember where we landed.
    ///
    /// Nothing is persisted when the switch fails. A failed save after a
    /// successful switch is logged and reported through
    /// [`CycleOutcome::persisted`].
    pub fn cycle<S: AsRef<str>>(&self, explicit_patterns: &[S]) -> Result<CycleOutcome> {
        let (plan, mut config) = self.plan(explicit_patterns)?;
        let previous = plan.current().cloned();

        match &previous {
            Some(current) => info!("Cycling [{}] -> [{}]", current.name, plan.target.name),
            None => info!("Starting cycle at: {}", plan.target.name),
        }
        debug!(
            "Cycle of {} devices from {:?}",
            plan.candidates.len(),
            plan.source
        );

        self.switch_to(&plan.target.id)?;

        config.last_device_id = plan.target.id.clone();
        let persisted = match self.save_config(&config) {
            Ok(()) => true,
            Err(e) => {
                warn!("Switched, but could not remember the new device: {}", e);
                false
            }
        };

        Ok(CycleOutcome {
            previous,
            target: plan.target,
            persisted,
        })
    }
}
