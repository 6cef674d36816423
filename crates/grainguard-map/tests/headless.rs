//! `MapView` driven end to end through the in-memory engine.

use grainguard_core::{builtin_catalog, rank, Coordinate, DEFAULT_CENTER};
use grainguard_map::{HeadlessEngine, MapState, MapView, MarkerKind, FIT_MAX_ZOOM, FIT_PADDING};

fn ready_view() -> MapView<HeadlessEngine> {
    MapView::new(Some("pk.headless"), |_, _| Ok(HeadlessEngine::new()))
}

#[test]
fn ranked_catalog_is_drawn_with_fitted_viewport() {
    let mut view = ready_view();
    let ranking = rank(&builtin_catalog(), DEFAULT_CENTER);
    view.refresh(&ranking, DEFAULT_CENTER).unwrap();

    let engine = view.engine().expect("engine should be live");
    assert_eq!(engine.marker_count(), 5);
    assert!(engine
        .markers()
        .all(|m| m.kind == MarkerKind::Facility && m.label.contains(" km)")));

    let (bounds, options) = engine.last_fit().expect("refresh should fit");
    assert_eq!(options.padding, FIT_PADDING);
    assert!((options.max_zoom - FIT_MAX_ZOOM).abs() < f64::EPSILON);
    assert!(bounds.contains(DEFAULT_CENTER));
}

#[test]
fn nearest_facility_label_comes_first_in_ranking_order() {
    let mut view = ready_view();
    let here = Coordinate::new(12.9816, 77.5946).unwrap();
    let ranking = rank(&builtin_catalog(), here);
    view.refresh(&ranking, here).unwrap();
    view.set_user_position(here).unwrap();

    let engine = view.engine().unwrap();
    let first = engine.markers().next().unwrap();
    assert_eq!(first.label, "Bengaluru Cold Storage (0 m)");
    assert_eq!(
        engine
            .markers()
            .filter(|m| m.kind == MarkerKind::User)
            .count(),
        1
    );
}

#[test]
fn placeholder_view_has_no_engine() {
    let mut view: MapView<HeadlessEngine> = MapView::new(None, |_, _| Ok(HeadlessEngine::new()));
    assert_eq!(view.state(), MapState::Uninitialized);
    view.refresh(&rank(&builtin_catalog(), DEFAULT_CENTER), DEFAULT_CENTER)
        .unwrap();
    assert!(view.engine().is_none());
    assert_eq!(view.facilities().len(), 5);
}
