//! Device location access for GrainGuard.
//!
//! [`LocationDevice`] is the callback-style platform API; [`LocationProvider`]
//! turns it into a single awaited fix ([`LocationProvider::get_once`]) and an
//! explicit subscription ([`LocationProvider::start_watch`] /
//! [`LocationProvider::stop_watch`]) that report classified
//! [`grainguard_core::LocationError`]s instead of raw device codes.

pub mod device;
pub mod provider;
pub mod static_device;

pub use device::{
    DeviceErrorCode, DeviceFix, DeviceWatchId, LocationDevice, PositionCallback, PositionOptions,
    WatchCallback,
};
pub use provider::{LocationProvider, WatchHandle, DEFAULT_TIMEOUT};
pub use static_device::StaticDevice;
