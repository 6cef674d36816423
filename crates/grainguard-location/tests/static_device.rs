//! `LocationProvider` driven by the bundled `StaticDevice`.

use std::sync::{Arc, Mutex};

use grainguard_core::{builtin_catalog, Coordinate, LocationError, NearbyFacilities};
use grainguard_location::{DeviceErrorCode, LocationProvider, StaticDevice};

#[tokio::test]
async fn fixed_device_feeds_the_ranking() {
    let here = Coordinate::new(12.9816, 77.5946).unwrap();
    let provider = LocationProvider::new(StaticDevice::fixed(here, 25.0));

    let sample = provider.get_once().await.expect("fixed device always answers");
    assert_eq!(sample.coordinate, here);

    let mut nearby = NearbyFacilities::new(builtin_catalog());
    nearby.apply(Ok(sample));
    assert_eq!(nearby.reference(), here);
    assert_eq!(nearby.ranking()[0].facility.name, "Bengaluru Cold Storage");
    assert_eq!(nearby.ranking()[0].distance_label, "0 m");
}

#[tokio::test]
async fn failing_device_maps_error_code() {
    let provider = LocationProvider::new(StaticDevice::failing(DeviceErrorCode::PermissionDenied));
    assert_eq!(
        provider.get_once().await,
        Err(LocationError::PermissionDenied)
    );
}

#[tokio::test]
async fn raw_device_codes_are_classified() {
    let denied = LocationProvider::new(StaticDevice::failing_with_code(1));
    assert_eq!(denied.get_once().await, Err(LocationError::PermissionDenied));

    let unknown = LocationProvider::new(StaticDevice::failing_with_code(7));
    assert_eq!(
        unknown.get_once().await,
        Err(LocationError::PositionUnavailable)
    );
}

#[tokio::test]
async fn unsupported_device_falls_back_to_default_ranking() {
    let provider = LocationProvider::new(StaticDevice::unsupported());
    let mut nearby = NearbyFacilities::new(builtin_catalog());
    let before = nearby.ranking().to_vec();

    nearby.apply(provider.get_once().await);
    assert_eq!(nearby.last_error(), Some(LocationError::Unsupported));
    assert_eq!(nearby.ranking(), before.as_slice());
}

#[test]
fn fixed_device_watch_reports_immediately() {
    let here = Coordinate::new(13.0, 77.6).unwrap();
    let provider = LocationProvider::new(StaticDevice::fixed(here, 5.0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let handle = provider.start_watch(
        {
            let seen = Arc::clone(&seen);
            move |s| seen.lock().unwrap().push(s.coordinate)
        },
        |_| panic!("fixed device never errors"),
    );
    assert_eq!(*seen.lock().unwrap(), vec![here]);
    provider.stop_watch(handle);
    provider.stop_watch(handle);
    assert_eq!(provider.active_watches(), 0);
}
