use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use grainguard_core::{Coordinate, LocationError, LocationSample};
use tokio::sync::{mpsc, oneshot};

use crate::device::{DeviceErrorCode, DeviceFix, DeviceWatchId, LocationDevice, PositionOptions};

/// How long [`LocationProvider::get_once`] waits for the device.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Token returned by [`LocationProvider::start_watch`].
///
/// Pass it to [`LocationProvider::stop_watch`] to release the subscription.
/// Stopping an unknown or already-stopped handle does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(u64);

/// Classified, awaitable access to a [`LocationDevice`].
///
/// Neither operation fails with anything but a [`LocationError`]; device
/// quirks (dropped callbacks, out-of-range fixes, unknown codes) are folded
/// into [`LocationError::PositionUnavailable`].
pub struct LocationProvider<D> {
    device: D,
    timeout: Duration,
    next_watch: AtomicU64,
    /// Our handle id → the device's watch id, for every live subscription.
    watches: Mutex<HashMap<u64, DeviceWatchId>>,
}

impl<D: LocationDevice> LocationProvider<D> {
    pub fn new(device: D) -> Self {
        Self::with_timeout(device, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(device: D, timeout: Duration) -> Self {
        Self {
            device,
            timeout,
            next_watch: AtomicU64::new(1),
            watches: Mutex::new(HashMap::new()),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Request a single fix.
    ///
    /// Resolves with whatever the device reports first, or with
    /// [`LocationError::Timeout`] once the timeout elapses. The device may
    /// answer from a cache up to five minutes old.
    ///
    /// Each call owns its own reply channel, so dropping this future (or
    /// issuing a newer request) leaves no listener behind: a late device
    /// reply is simply discarded. Callers that run several requests
    /// concurrently should order results by `captured_at`.
    ///
    /// # Errors
    ///
    /// Returns the [`LocationError`] matching the device's failure.
    pub async fn get_once(&self) -> Result<LocationSample, LocationError> {
        if !self.device.is_supported() {
            return Err(LocationError::Unsupported);
        }

        let (tx, rx) = oneshot::channel();
        self.device.get_current_position(
            &PositionOptions::one_shot(self.timeout),
            Box::new(move |result| {
                // Receiver gone means the caller stopped waiting.
                let _ = tx.send(result);
            }),
        );

        let result = match tokio::time::timeout(self.timeout, rx).await {
            Err(_elapsed) => Err(LocationError::Timeout),
            Ok(Err(_dropped)) => Err(LocationError::PositionUnavailable),
            Ok(Ok(reply)) => into_sample(reply),
        };
        if let Err(error) = &result {
            tracing::warn!(error = %error, "one-shot location request failed");
        }
        result
    }

    /// Subscribe to continuous fresh fixes.
    ///
    /// `on_sample` runs for every fix and `on_error` for every failure report,
    /// on whichever thread the device calls back on. On an unsupported device
    /// `on_error(Unsupported)` runs immediately and the returned handle is inert.
    pub fn start_watch<S, E>(&self, mut on_sample: S, mut on_error: E) -> WatchHandle
    where
        S: FnMut(LocationSample) + Send + 'static,
        E: FnMut(LocationError) + Send + 'static,
    {
        let handle = WatchHandle(self.next_watch.fetch_add(1, Ordering::Relaxed));

        if !self.device.is_supported() {
            on_error(LocationError::Unsupported);
            return handle;
        }

        let device_id = self.device.watch_position(
            &PositionOptions::watch(self.timeout),
            Box::new(move |reply| match into_sample(reply) {
                Ok(sample) => on_sample(sample),
                Err(error) => on_error(error),
            }),
        );
        self.lock_watches().insert(handle.0, device_id);
        tracing::debug!(watch = handle.0, device_watch = device_id, "location watch started");
        handle
    }

    /// [`Self::start_watch`] delivering into a channel instead of callbacks.
    pub fn watch_channel(
        &self,
    ) -> (
        WatchHandle,
        mpsc::UnboundedReceiver<Result<LocationSample, LocationError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let error_tx = tx.clone();
        let handle = self.start_watch(
            move |sample| {
                let _ = tx.send(Ok(sample));
            },
            move |error| {
                let _ = error_tx.send(Err(error));
            },
        );
        (handle, rx)
    }

    /// Release a watch subscription. Idempotent.
    pub fn stop_watch(&self, handle: WatchHandle) {
        let removed = self.lock_watches().remove(&handle.0);
        if let Some(device_id) = removed {
            self.device.clear_watch(device_id);
            tracing::debug!(watch = handle.0, device_watch = device_id, "location watch stopped");
        }
    }

    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.lock_watches().len()
    }

    fn lock_watches(&self) -> std::sync::MutexGuard<'_, HashMap<u64, DeviceWatchId>> {
        self.watches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D> Drop for LocationProvider<D> {
    fn drop(&mut self) {
        let watches = self
            .watches
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if !watches.is_empty() {
            tracing::warn!(
                active = watches.len(),
                "location provider dropped with active watches"
            );
        }
    }
}

fn into_sample(reply: Result<DeviceFix, DeviceErrorCode>) -> Result<LocationSample, LocationError> {
    match reply {
        Ok(fix) => {
            let coordinate = Coordinate::new(fix.latitude, fix.longitude).map_err(|e| {
                tracing::warn!(error = %e, "device reported an invalid fix");
                LocationError::PositionUnavailable
            })?;
            Ok(LocationSample {
                coordinate,
                accuracy_meters: fix.accuracy,
                captured_at: fix.timestamp,
            })
        }
        Err(DeviceErrorCode::PermissionDenied) => Err(LocationError::PermissionDenied),
        Err(DeviceErrorCode::PositionUnavailable) => Err(LocationError::PositionUnavailable),
        Err(DeviceErrorCode::Timeout) => Err(LocationError::Timeout),
    }
}
