//! The platform location API as the provider sees it.
//!
//! Shaped after the browser/mobile geolocation primitives: a one-shot request
//! and a continuous watch, both reporting through callbacks, plus numeric
//! error codes.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// How long a one-shot request may be answered from the device's own cache.
pub const ONE_SHOT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Raw position report from the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres.
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

/// Error codes the device reports, numbered as in the W3C Geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

impl DeviceErrorCode {
    /// Classify a raw platform error code. Codes outside the known set are
    /// reported as [`DeviceErrorCode::PositionUnavailable`].
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => DeviceErrorCode::PermissionDenied,
            2 => DeviceErrorCode::PositionUnavailable,
            3 => DeviceErrorCode::Timeout,
            other => {
                tracing::warn!(code = other, "unknown device error code");
                DeviceErrorCode::PositionUnavailable
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the device may answer with. Zero forces a fresh one.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// Options for a single request: cached fixes up to five minutes old are
    /// acceptable.
    #[must_use]
    pub fn one_shot(timeout: Duration) -> Self {
        Self {
            enable_high_accuracy: true,
            timeout,
            maximum_age: ONE_SHOT_MAX_AGE,
        }
    }

    /// Options for a watch: every report must be a fresh fix.
    #[must_use]
    pub fn watch(timeout: Duration) -> Self {
        Self {
            enable_high_accuracy: true,
            timeout,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Device-assigned watch identifier.
pub type DeviceWatchId = u64;

pub type PositionCallback = Box<dyn FnOnce(Result<DeviceFix, DeviceErrorCode>) + Send>;
pub type WatchCallback = Box<dyn FnMut(Result<DeviceFix, DeviceErrorCode>) + Send>;

/// A platform location API.
///
/// Implementations may invoke callbacks on any thread, synchronously inside
/// the registering call or later. A one-shot callback that is dropped without
/// being invoked is treated as "position unavailable".
pub trait LocationDevice: Send + Sync {
    /// `false` when the platform has no location capability at all.
    fn is_supported(&self) -> bool;

    fn get_current_position(&self, options: &PositionOptions, callback: PositionCallback);

    fn watch_position(&self, options: &PositionOptions, callback: WatchCallback) -> DeviceWatchId;

    fn clear_watch(&self, id: DeviceWatchId);
}
