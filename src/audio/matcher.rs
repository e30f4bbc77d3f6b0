use std::collections::HashSet;

use tracing::debug;

use super::device::AudioDevice;

/// True when `pattern` is the device id, or a case-insensitive substring of
/// its name.
pub fn matches_pattern(device: &AudioDevice, pattern: &str) -> bool {
    device.id == pattern || device.name.to_lowercase().contains(&pattern.to_lowercase())
}

/// Resolve `patterns` against `all` into an ordered list without duplicates.
///
/// Patterns are tried in the order given and each one scans `all` in
/// enumeration order. A device is taken by the first pattern that matches it.
pub fn match_devices<S: AsRef<str>>(all: &[AudioDevice], patterns: &[S]) -> Vec<AudioDevice> {
    let mut matched = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let lower = pattern.to_lowercase();
        for device in all {
            if seen.contains(device.id.as_str()) {
                continue;
            }
            if device.id == pattern || device.name.to_lowercase().contains(&lower) {
                debug!("Pattern '{}' matched device '{}'", pattern, device.name);
                seen.insert(device.id.as_str());
                matched.push(device.clone());
            }
        }
    }

    debug!(
        "{} patterns matched {} of {} devices",
        patterns.len(),
        matched.len(),
        all.len()
    );
    matched
}

/// Whether the device's name is covered by any allow-list entry.
///
/// Only names are compared here; this is what decides which rows are ticked
/// when the allow-list is shown for editing.
pub fn in_allow_list<S: AsRef<str>>(device: &AudioDevice, allow_list: &[S]) -> bool {
    let name = device.name.to_lowercase();
    allow_list
        .iter()
        .any(|entry| name.contains(&entry.as_ref().to_lowercase()))
}
