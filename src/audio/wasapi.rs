//! Render endpoint access through the Windows MMDevice API.
//!
//! Setting the default endpoint has no public API. It goes through the
//! undocumented `IPolicyConfig` COM interface (Vista layout), which is only
//! ever touched from [`WasapiAudioSystem::set_role_default`].

use std::ffi::c_void;

use tracing::{debug, info, warn};
use windows::Win32::Devices::FunctionDiscovery::PKEY_Device_FriendlyName;
use windows::Win32::Foundation::{E_FAIL, RPC_E_CHANGED_MODE};
use windows::Win32::Media::Audio::{
    DEVICE_STATE_ACTIVE, ERole, IMMDevice, IMMDeviceEnumerator, MMDeviceEnumerator, eRender,
};
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx, CoTaskMemFree,
    CoUninitialize, STGM_READ,
};
use windows::core::{GUID, HRESULT, HSTRING, IUnknown, IUnknown_Vtbl, PCWSTR, interface};

use crate::audio::{AudioDevice, Role};
use crate::error::{Error, Result};
use crate::system::{EndpointDirectory, EndpointSwitcher};

const CLSID_POLICY_CONFIG: GUID = GUID::from_u128(0x294935ce_f637_4e7c_a41b_ab255460b862);

// Slot order matters: SetDefaultEndpoint must land on vtable index 12
// (3 IUnknown slots + 9 methods before it).
#[interface("568B9108-44BF-40B4-9006-86AFE5B5A620")]
unsafe trait IPolicyConfigVista: IUnknown {
    fn GetMixFormat(&self, device_id: PCWSTR, format: *mut *mut c_void) -> HRESULT;
    fn GetDeviceFormat(&self, device_id: PCWSTR, default: i32, format: *mut *mut c_void)
    -> HRESULT;
    fn SetDeviceFormat(&self, device_id: PCWSTR, endpoint: *mut c_void, mix: *mut c_void)
    -> HRESULT;
    fn GetProcessingPeriod(
        &self,
        device_id: PCWSTR,
        default: i32,
        default_period: *mut i64,
        minimum_period: *mut i64,
    ) -> HRESULT;
    fn SetProcessingPeriod(&self, device_id: PCWSTR, period: *mut i64) -> HRESULT;
    fn GetShareMode(&self, device_id: PCWSTR, mode: *mut c_void) -> HRESULT;
    fn SetShareMode(&self, device_id: PCWSTR, mode: *mut c_void) -> HRESULT;
    fn GetPropertyValue(&self, device_id: PCWSTR, key: *const c_void, value: *mut c_void)
    -> HRESULT;
    fn SetPropertyValue(&self, device_id: PCWSTR, key: *const c_void, value: *mut c_void)
    -> HRESULT;
    fn SetDefaultEndpoint(&self, device_id: PCWSTR, role: ERole) -> HRESULT;
    fn SetEndpointVisibility(&self, device_id: PCWSTR, visible: i32) -> HRESULT;
}

/// Keeps COM initialized on this thread for the lifetime of the guard.
struct ComApartment {
    owned: bool,
}

impl ComApartment {
    fn enter() -> windows::core::Result<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            // Someone else initialized COM with another model; it is still usable
            return Ok(Self { owned: false });
        }
        hr.ok()?;
        Ok(Self { owned: true })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            unsafe { CoUninitialize() };
        }
    }
}

/// Production implementation of the endpoint capabilities.
#[derive(Debug, Default)]
pub struct WasapiAudioSystem;

impl WasapiAudioSystem {
    pub fn new() -> Result<Self> {
        info!("Initialized Windows audio endpoint system");
        Ok(Self)
    }

    fn device_enumerator() -> windows::core::Result<IMMDeviceEnumerator> {
        unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }
    }

    fn device_id(device: &IMMDevice) -> windows::core::Result<String> {
        unsafe {
            let raw = device.GetId()?;
            let id = raw.to_string();
            CoTaskMemFree(Some(raw.0 as *const c_void));
            id.map_err(|e| windows::core::Error::new(E_FAIL, e.to_string()))
        }
    }

    fn friendly_name(device: &IMMDevice) -> windows::core::Result<String> {
        unsafe {
            let store = device.OpenPropertyStore(STGM_READ)?;
            let value = store.GetValue(&PKEY_Device_FriendlyName)?;
            Ok(value.to_string())
        }
    }
}

impl EndpointDirectory for WasapiAudioSystem {
    fn list_active_render_endpoints(&self) -> Result<Vec<AudioDevice>> {
        let enumeration_error = |e: windows::core::Error| Error::Enumeration(e.to_string());

        let _com = ComApartment::enter().map_err(enumeration_error)?;
        let enumerator = Self::device_enumerator().map_err(enumeration_error)?;
        let collection = unsafe { enumerator.EnumAudioEndpoints(eRender, DEVICE_STATE_ACTIVE) }
            .map_err(enumeration_error)?;
        let count = unsafe { collection.GetCount() }.map_err(enumeration_error)?;

        let mut devices = Vec::with_capacity(count as usize);
        for index in 0..count {
            let device = match unsafe { collection.Item(index) } {
                Ok(device) => device,
                Err(e) => {
                    warn!("Skipping endpoint {}: {}", index, e);
                    continue;
                }
            };

            let id = match Self::device_id(&device) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping endpoint {} without id: {}", index, e);
                    continue;
                }
            };

            match Self::friendly_name(&device) {
                Ok(name) => devices.push(AudioDevice { id, name }),
                Err(e) => warn!("Skipping endpoint {} without friendly name: {}", id, e),
            }
        }

        debug!("Enumerated {} active render endpoints", devices.len());
        Ok(devices)
    }

    fn get_default_render_endpoint_id(&self, role: Role) -> Result<String> {
        let query_error = |e: windows::core::Error| Error::Query(e.to_string());

        let _com = ComApartment::enter().map_err(query_error)?;
        let enumerator = Self::device_enumerator().map_err(query_error)?;
        let device = unsafe { enumerator.GetDefaultAudioEndpoint(eRender, ERole(role as i32)) }
            .map_err(query_error)?;
        Self::device_id(&device).map_err(query_error)
    }
}

impl EndpointSwitcher for WasapiAudioSystem {
    fn set_role_default(&self, device_id: &str, role: Role) -> Result<()> {
        let switch_error = |reason: String| Error::Switch {
            role,
            device_id: device_id.to_string(),
            reason,
        };

        let _com = ComApartment::enter().map_err(|e| switch_error(e.to_string()))?;
        let policy: IPolicyConfigVista =
            unsafe { CoCreateInstance(&CLSID_POLICY_CONFIG, None, CLSCTX_ALL) }
                .map_err(|e| switch_error(format!("failed to create PolicyConfig: {}", e)))?;

        let wide = HSTRING::from(device_id);
        let hr = unsafe { policy.SetDefaultEndpoint(PCWSTR(wide.as_ptr()), ERole(role as i32)) };
        if hr.is_err() {
            return Err(switch_error(format!(
                "SetDefaultEndpoint failed (HR: {:#010x})",
                hr.0
            )));
        }

        Ok(())
    }
}
