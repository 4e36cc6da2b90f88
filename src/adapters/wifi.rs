//! WiFi soft-AP adapter.
//!
//! The controller hosts its own access point; clients join it and browse
//! to the device.  There is no station mode and no reconnect policy: once
//! the AP is up it stays up until reset.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub for host-side tests.

use core::fmt;
use log::info;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi},
};

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApError {
    InvalidSsid,
    InvalidPassword,
    StartFailed,
}

impl fmt::Display for ApError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-63 bytes for WPA2, or empty for open)"),
            Self::StartFailed => write!(f, "access point failed to start"),
        }
    }
}

impl core::error::Error for ApError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ApError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ApError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 63 || !is_printable_ascii(password) {
        return Err(ApError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Soft AP
// ───────────────────────────────────────────────────────────────

pub struct SoftAp {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    up: bool,
    #[cfg(target_os = "espidf")]
    wifi: Option<BlockingWifi<EspWifi<'static>>>,
}

impl SoftAp {
    /// Validate credentials.  Nothing is started yet.
    pub fn new(ssid: &str, password: &str) -> Result<Self, ApError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|_| ApError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password).map_err(|_| ApError::InvalidPassword)?;
        Ok(Self {
            ssid: s,
            password: p,
            up: false,
            #[cfg(target_os = "espidf")]
            wifi: None,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    fn auth_label(&self) -> &'static str {
        if self.password.is_empty() { "open" } else { "WPA2" }
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Bring the access point up and wait for its interface.
    #[cfg(target_os = "espidf")]
    pub fn start(
        &mut self,
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<(), ApError> {
        let driver = EspWifi::new(modem, sysloop.clone(), nvs).map_err(|e| {
            log::error!("WiFi: driver init failed: {:?}", e);
            ApError::StartFailed
        })?;
        let mut wifi = BlockingWifi::wrap(driver, sysloop).map_err(|_| ApError::StartFailed)?;

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ApError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ApError::InvalidPassword)?,
            auth_method,
            channel: 1,
            ..Default::default()
        }))
        .map_err(|_| ApError::StartFailed)?;
        wifi.start().map_err(|_| ApError::StartFailed)?;
        wifi.wait_netif_up().map_err(|_| ApError::StartFailed)?;

        match wifi.wifi().ap_netif().get_ip_info() {
            Ok(ip) => info!("WiFi: AP '{}' up ({}) at {}", self.ssid, self.auth_label(), ip.ip),
            Err(_) => info!("WiFi: AP '{}' up ({})", self.ssid, self.auth_label()),
        }
        self.wifi = Some(wifi);
        self.up = true;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(&mut self) -> Result<(), ApError> {
        info!("WiFi(sim): AP '{}' up ({})", self.ssid, self.auth_label());
        self.up = true;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
