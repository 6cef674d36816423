use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use grainguard_core::Coordinate;

use crate::device::{
    DeviceErrorCode, DeviceFix, DeviceWatchId, LocationDevice, PositionCallback, PositionOptions,
    WatchCallback,
};

/// A device with a fixed answer, for hosts without positioning hardware.
///
/// Every request (and the first report of every watch) gets the same fix,
/// stamped with the current time, or the same error.
#[derive(Debug)]
pub struct StaticDevice {
    answer: Option<Result<(Coordinate, f64), DeviceErrorCode>>,
    next_id: AtomicU64,
}

impl StaticDevice {
    /// Always reports `coordinate` with `accuracy` metres.
    #[must_use]
    pub fn fixed(coordinate: Coordinate, accuracy: f64) -> Self {
        Self {
            answer: Some(Ok((coordinate, accuracy))),
            next_id: AtomicU64::new(1),
        }
    }

    /// Always fails with `code`.
    #[must_use]
    pub fn failing(code: DeviceErrorCode) -> Self {
        Self {
            answer: Some(Err(code)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Always fails with the platform's raw error `code`.
    #[must_use]
    pub fn failing_with_code(code: u16) -> Self {
        Self::failing(DeviceErrorCode::from_code(code))
    }

    /// Reports no location capability.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            answer: None,
            next_id: AtomicU64::new(1),
        }
    }

    fn reply(&self) -> Result<DeviceFix, DeviceErrorCode> {
        match self.answer {
            Some(Ok((coordinate, accuracy))) => Ok(DeviceFix {
                latitude: coordinate.lat(),
                longitude: coordinate.lng(),
                accuracy,
                timestamp: Utc::now(),
            }),
            Some(Err(code)) => Err(code),
            None => Err(DeviceErrorCode::PositionUnavailable),
        }
    }
}

impl LocationDevice for StaticDevice {
    fn is_supported(&self) -> bool {
        self.answer.is_some()
    }

    fn get_current_position(&self, _options: &PositionOptions, callback: PositionCallback) {
        callback(self.reply());
    }

    fn watch_position(&self, _options: &PositionOptions, mut callback: WatchCallback) -> DeviceWatchId {
        callback(self.reply());
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn clear_watch(&self, _id: DeviceWatchId) {}
}
