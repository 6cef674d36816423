use std::collections::BTreeMap;

use grainguard_core::{
    directions_url, search_url, Coordinate, DirectionsProvider, MapToken, RankedFacility,
    DEFAULT_CENTER,
};

use crate::engine::{Camera, FitOptions, LngLatBounds, MapEngine, MarkerId, MarkerKind};
use crate::error::MapError;

pub const DEFAULT_ZOOM: f64 = 12.0;
pub const FIT_PADDING: u32 = 50;
pub const FIT_MAX_ZOOM: f64 = 14.0;
pub const SELECT_ZOOM: f64 = 14.0;
pub const LOCATE_ZOOM: f64 = 13.0;

const USER_MARKER_LABEL: &str = "You are here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// No engine. The caller renders a placeholder.
    Uninitialized,
    Ready,
    /// Terminal. Every marker and the engine have been released.
    Destroyed,
}

/// What the view believes is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    camera: Camera,
    markers: BTreeMap<String, MarkerId>,
    selected: Option<String>,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self {
            camera: Camera {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            markers: BTreeMap::new(),
            selected: None,
        }
    }
}

impl MapViewState {
    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.camera.center
    }

    /// Zoom of the last camera move. After a fit this is [`FIT_MAX_ZOOM`],
    /// the ceiling the engine was given.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    /// Facility id to marker handle. Matches the last applied facility list.
    #[must_use]
    pub fn markers(&self) -> &BTreeMap<String, MarkerId> {
        &self.markers
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

type PendingRefresh = (Vec<RankedFacility>, Coordinate);

/// Facility map over a [`MapEngine`].
///
/// All mutation goes through `&mut self`, so the marker set has a single
/// writer. Facility markers are recreated on every refresh rather than
/// diffed. Dropping a `Ready` view releases its markers and then the engine.
pub struct MapView<E: MapEngine> {
    state: MapState,
    engine: Option<E>,
    view: MapViewState,
    facilities: Vec<RankedFacility>,
    reference: Coordinate,
    user_position: Option<Coordinate>,
    user_marker: Option<MarkerId>,
    pending: Option<PendingRefresh>,
}

impl<E: MapEngine> MapView<E> {
    /// A view with no engine, showing the default center.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            state: MapState::Uninitialized,
            engine: None,
            view: MapViewState::default(),
            facilities: Vec::new(),
            reference: DEFAULT_CENTER,
            user_position: None,
            user_marker: None,
            pending: None,
        }
    }

    /// Try to start the engine with `token`. A missing or malformed token,
    /// or a failing factory, leaves the view `Uninitialized` instead of
    /// failing; `factory` is never called without a well-formed token.
    #[must_use]
    pub fn new<F>(token: Option<&str>, factory: F) -> Self
    where
        F: FnOnce(&MapToken, Camera) -> Result<E, MapError>,
    {
        let mut view = Self::uninitialized();
        if let Err(e) = view.initialize(token, factory) {
            tracing::info!(error = %e, "map unavailable, showing placeholder");
        }
        view
    }

    /// `Uninitialized → Ready`. Anything recorded while uninitialized (the
    /// facility list, the user position) is drawn immediately.
    ///
    /// # Errors
    ///
    /// - [`MapError::MissingToken`] / [`MapError::InvalidToken`] without a
    ///   well-formed token; the factory is not called.
    /// - Whatever the factory returns, typically [`MapError::EngineInit`].
    /// - [`MapError::AlreadyInitialized`] or [`MapError::Destroyed`] outside
    ///   `Uninitialized`.
    pub fn initialize<F>(&mut self, token: Option<&str>, factory: F) -> Result<(), MapError>
    where
        F: FnOnce(&MapToken, Camera) -> Result<E, MapError>,
    {
        match self.state {
            MapState::Uninitialized => {}
            MapState::Ready => return Err(MapError::AlreadyInitialized),
            MapState::Destroyed => return Err(MapError::Destroyed),
        }

        let token = MapToken::parse(token.ok_or(MapError::MissingToken)?)?;
        let engine = factory(&token, self.view.camera).inspect_err(|e| {
            tracing::warn!(error = %e, "map engine construction failed");
        })?;

        self.engine = Some(engine);
        self.state = MapState::Ready;
        tracing::debug!("map engine ready");

        self.place_user_marker();
        self.rebuild_markers();
        self.refit();
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> MapState {
        self.state
    }

    #[must_use]
    pub fn view(&self) -> &MapViewState {
        &self.view
    }

    #[must_use]
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    #[must_use]
    pub fn facilities(&self) -> &[RankedFacility] {
        &self.facilities
    }

    #[must_use]
    pub fn reference(&self) -> Coordinate {
        self.reference
    }

    #[must_use]
    pub fn user_position(&self) -> Option<Coordinate> {
        self.user_position
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace every facility marker with one per entry of `facilities` and
    /// refit the viewport around them plus `reference`. Discards any
    /// scheduled refresh, which is older than this one.
    ///
    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn refresh(
        &mut self,
        facilities: &[RankedFacility],
        reference: Coordinate,
    ) -> Result<(), MapError> {
        self.ensure_live()?;
        self.pending = None;
        self.apply(facilities.to_vec(), reference);
        Ok(())
    }

    /// Queue a refresh for the next [`MapView::flush`]. A newer schedule
    /// replaces an older one, so bursts of updates draw only the latest.
    ///
    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn schedule_refresh(
        &mut self,
        facilities: Vec<RankedFacility>,
        reference: Coordinate,
    ) -> Result<(), MapError> {
        self.ensure_live()?;
        if self.pending.replace((facilities, reference)).is_some() {
            tracing::debug!("superseded pending map refresh");
        }
        Ok(())
    }

    /// Apply the latest scheduled refresh, if any. Returns whether one ran.
    ///
    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn flush(&mut self) -> Result<bool, MapError> {
        self.ensure_live()?;
        match self.pending.take() {
            Some((facilities, reference)) => {
                self.apply(facilities, reference);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Select a facility and fly to it. The marker set is untouched.
    ///
    /// # Errors
    ///
    /// [`MapError::UnknownFacility`] if `id` is not in the current list, or
    /// [`MapError::Destroyed`] after teardown.
    pub fn select(&mut self, id: &str) -> Result<(), MapError> {
        self.ensure_live()?;
        let coordinate = self
            .facilities
            .iter()
            .find(|f| f.facility.id == id)
            .map(|f| f.facility.coordinate)
            .ok_or_else(|| MapError::UnknownFacility(id.to_string()))?;

        self.view.selected = Some(id.to_string());
        self.fly_to(Camera {
            center: coordinate,
            zoom: SELECT_ZOOM,
        });
        Ok(())
    }

    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn clear_selection(&mut self) -> Result<(), MapError> {
        self.ensure_live()?;
        self.view.selected = None;
        Ok(())
    }

    #[must_use]
    pub fn selected_facility(&self) -> Option<&RankedFacility> {
        let id = self.view.selected.as_deref()?;
        self.facilities.iter().find(|f| f.facility.id == id)
    }

    /// Move the user marker to `position`, make it the reference and refit.
    ///
    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn set_user_position(&mut self, position: Coordinate) -> Result<(), MapError> {
        self.ensure_live()?;
        self.user_position = Some(position);
        self.reference = position;
        self.place_user_marker();
        self.refit();
        Ok(())
    }

    /// [`MapView::set_user_position`], then fly in on it.
    ///
    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn locate(&mut self, position: Coordinate) -> Result<(), MapError> {
        self.set_user_position(position)?;
        self.fly_to(Camera {
            center: position,
            zoom: LOCATE_ZOOM,
        });
        Ok(())
    }

    /// Deep link to the selected facility: turn-by-turn from the user's
    /// position when known, otherwise a plain map search. `None` without a
    /// selection.
    ///
    /// # Errors
    ///
    /// [`MapError::Destroyed`] after teardown.
    pub fn directions_for_selected(
        &self,
        provider: DirectionsProvider,
    ) -> Result<Option<String>, MapError> {
        self.ensure_live()?;
        let Some(selected) = self.selected_facility() else {
            return Ok(None);
        };
        let dest = selected.facility.coordinate;
        Ok(Some(match self.user_position {
            Some(origin) => directions_url(origin, dest, provider),
            None => search_url(dest),
        }))
    }

    /// `→ Destroyed`. Removes every facility marker, then the user marker,
    /// then releases the engine. Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if self.state == MapState::Destroyed {
            return;
        }

        if let Some(mut engine) = self.engine.take() {
            let facility_markers = std::mem::take(&mut self.view.markers);
            let count = facility_markers.len();
            for id in facility_markers.into_values() {
                engine.remove_marker(id);
            }
            if let Some(id) = self.user_marker.take() {
                engine.remove_marker(id);
            }
            engine.release();
            tracing::debug!(markers = count, "map engine released");
        }

        self.view.markers.clear();
        self.view.selected = None;
        self.facilities.clear();
        self.pending = None;
        self.state = MapState::Destroyed;
    }

    fn ensure_live(&self) -> Result<(), MapError> {
        if self.state == MapState::Destroyed {
            Err(MapError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn apply(&mut self, facilities: Vec<RankedFacility>, reference: Coordinate) {
        self.facilities = facilities;
        self.reference = reference;

        let selection_gone = self
            .view
            .selected
            .as_deref()
            .is_some_and(|id| !self.facilities.iter().any(|f| f.facility.id == id));
        if selection_gone {
            self.view.selected = None;
        }

        self.rebuild_markers();
        self.refit();
    }

    fn rebuild_markers(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        for id in std::mem::take(&mut self.view.markers).into_values() {
            engine.remove_marker(id);
        }

        for ranked in &self.facilities {
            let label = format!("{} ({})", ranked.facility.name, ranked.distance_label);
            let id = engine.add_marker(ranked.facility.coordinate, MarkerKind::Facility, &label);
            // Duplicate ids would otherwise orphan the earlier marker.
            if let Some(previous) = self.view.markers.insert(ranked.facility.id.clone(), id) {
                engine.remove_marker(previous);
            }
        }

        tracing::debug!(markers = self.view.markers.len(), "refreshed facility markers");
    }

    fn place_user_marker(&mut self) {
        let (Some(engine), Some(position)) = (self.engine.as_mut(), self.user_position) else {
            return;
        };
        if let Some(previous) = self.user_marker.take() {
            engine.remove_marker(previous);
        }
        self.user_marker = Some(engine.add_marker(position, MarkerKind::User, USER_MARKER_LABEL));
    }

    fn refit(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if self.facilities.is_empty() {
            return;
        }

        let points = self
            .facilities
            .iter()
            .map(|f| f.facility.coordinate)
            .chain(std::iter::once(self.reference));
        let Some(bounds) = LngLatBounds::from_points(points) else {
            return;
        };

        engine.fit_bounds(
            bounds,
            FitOptions {
                padding: FIT_PADDING,
                max_zoom: FIT_MAX_ZOOM,
            },
        );
        if let Some(center) = bounds.center() {
            self.view.camera = Camera {
                center,
                zoom: FIT_MAX_ZOOM,
            };
        }
    }

    fn fly_to(&mut self, camera: Camera) {
        self.view.camera = camera;
        if let Some(engine) = self.engine.as_mut() {
            engine.fly_to(camera);
        }
    }
}

impl<E: MapEngine> Drop for MapView<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use grainguard_core::{builtin_catalog, rank, Facility};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(MarkerId, MarkerKind),
        Remove(MarkerId),
        Fit(LngLatBounds, FitOptions),
        FlyTo(Camera),
        Release,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        live: BTreeMap<MarkerId, (MarkerKind, String)>,
        released: bool,
    }

    struct RecordingEngine {
        next: MarkerId,
        log: Rc<RefCell<Recorder>>,
    }

    impl MapEngine for RecordingEngine {
        fn add_marker(&mut self, _: Coordinate, kind: MarkerKind, label: &str) -> MarkerId {
            self.next += 1;
            let mut log = self.log.borrow_mut();
            assert!(!log.released, "marker added after release");
            log.calls.push(Call::Add(self.next, kind));
            log.live.insert(self.next, (kind, label.to_string()));
            self.next
        }

        fn remove_marker(&mut self, id: MarkerId) {
            let mut log = self.log.borrow_mut();
            assert!(!log.released, "marker removed after release");
            assert!(log.live.remove(&id).is_some(), "unknown marker {id}");
            log.calls.push(Call::Remove(id));
        }

        fn fit_bounds(&mut self, bounds: LngLatBounds, options: FitOptions) {
            self.log.borrow_mut().calls.push(Call::Fit(bounds, options));
        }

        fn fly_to(&mut self, camera: Camera) {
            self.log.borrow_mut().calls.push(Call::FlyTo(camera));
        }

        fn release(&mut self) {
            let mut log = self.log.borrow_mut();
            assert!(!log.released, "engine released twice");
            log.released = true;
            log.calls.push(Call::Release);
        }
    }

    fn ready_view() -> (MapView<RecordingEngine>, Rc<RefCell<Recorder>>) {
        let log = Rc::new(RefCell::new(Recorder::default()));
        let shared = Rc::clone(&log);
        let view = MapView::new(Some("pk.test"), move |_, _| {
            Ok(RecordingEngine {
                next: 0,
                log: shared,
            })
        });
        assert_eq!(view.state(), MapState::Ready);
        (view, log)
    }

    fn ranked(ids: &[&str]) -> Vec<RankedFacility> {
        let catalog: Vec<Facility> = builtin_catalog()
            .into_iter()
            .filter(|f| ids.contains(&f.id.as_str()))
            .collect();
        rank(&catalog, DEFAULT_CENTER)
    }

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn live_labels(log: &Rc<RefCell<Recorder>>, kind: MarkerKind) -> Vec<String> {
        let mut labels: Vec<String> = log
            .borrow()
            .live
            .values()
            .filter(|(k, _)| *k == kind)
            .map(|(_, label)| label.clone())
            .collect();
        labels.sort();
        labels
    }

    #[test]
    fn malformed_token_keeps_placeholder_without_calling_factory() {
        let view: MapView<RecordingEngine> =
            MapView::new(Some("sk.not-public"), |_, _| panic!("factory must not run"));
        assert_eq!(view.state(), MapState::Uninitialized);
        assert!(view.engine().is_none());

        let view: MapView<RecordingEngine> =
            MapView::new(None, |_, _| panic!("factory must not run"));
        assert_eq!(view.state(), MapState::Uninitialized);
    }

    #[test]
    fn factory_failure_stays_uninitialized() {
        let mut view: MapView<RecordingEngine> = MapView::new(Some("pk.test"), |_, _| {
            Err(MapError::EngineInit("no GL context".into()))
        });
        assert_eq!(view.state(), MapState::Uninitialized);
        assert!(view.refresh(&ranked(&["1"]), DEFAULT_CENTER).is_ok());
        assert!(view.view().markers().is_empty());
    }

    #[test]
    fn factory_receives_default_camera() {
        let log = Rc::new(RefCell::new(Recorder::default()));
        let shared = Rc::clone(&log);
        let view = MapView::new(Some("pk.test"), move |token, camera| {
            assert_eq!(token.as_str(), "pk.test");
            assert_eq!(camera.center, DEFAULT_CENTER);
            assert!((camera.zoom - DEFAULT_ZOOM).abs() < f64::EPSILON);
            Ok(RecordingEngine {
                next: 0,
                log: shared,
            })
        });
        assert_eq!(view.state(), MapState::Ready);
    }

    #[test]
    fn refresh_creates_one_marker_per_facility_and_fits() {
        let (mut view, log) = ready_view();
        let facilities = ranked(&["1", "2", "3"]);
        view.refresh(&facilities, DEFAULT_CENTER).unwrap();

        let ids: Vec<&str> = view.view().markers().keys().map(String::as_str).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(log.borrow().live.len(), 3);

        let last = log.borrow().calls.last().cloned();
        let Some(Call::Fit(bounds, options)) = last else {
            panic!("expected a fit, got {last:?}");
        };
        assert_eq!(options.padding, FIT_PADDING);
        assert!((options.max_zoom - FIT_MAX_ZOOM).abs() < f64::EPSILON);
        assert!(bounds.contains(DEFAULT_CENTER));
        for f in &facilities {
            assert!(bounds.contains(f.facility.coordinate));
        }
    }

    #[test]
    fn refresh_replaces_previous_markers() {
        let (mut view, log) = ready_view();
        view.refresh(&ranked(&["1", "2"]), DEFAULT_CENTER).unwrap();
        view.refresh(&ranked(&["4", "5"]), DEFAULT_CENTER).unwrap();

        let ids: Vec<&str> = view.view().markers().keys().map(String::as_str).collect();
        assert_eq!(ids, ["4", "5"]);
        let labels = live_labels(&log, MarkerKind::Facility);
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().any(|l| l.starts_with("KrishiCold Center")));
        assert!(labels.iter().any(|l| l.starts_with("GreenGrain Storage")));
    }

    #[test]
    fn burst_of_scheduled_updates_draws_only_the_latest() {
        let (mut view, log) = ready_view();
        view.schedule_refresh(ranked(&["1", "2", "3"]), DEFAULT_CENTER)
            .unwrap();
        view.schedule_refresh(ranked(&["5"]), DEFAULT_CENTER).unwrap();
        assert!(view.has_pending());

        assert!(view.flush().unwrap());
        assert!(!view.flush().unwrap());

        let adds = log
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Add(_, MarkerKind::Facility)))
            .count();
        assert_eq!(adds, 1, "the superseded list must never be drawn");
        assert_eq!(live_labels(&log, MarkerKind::Facility).len(), 1);
        assert_eq!(view.facilities().len(), 1);
        assert_eq!(view.facilities()[0].facility.id, "5");
    }

    #[test]
    fn direct_refresh_discards_older_schedule() {
        let (mut view, _log) = ready_view();
        view.schedule_refresh(ranked(&["1"]), DEFAULT_CENTER).unwrap();
        view.refresh(&ranked(&["2"]), DEFAULT_CENTER).unwrap();
        assert!(!view.flush().unwrap());
        assert_eq!(view.facilities()[0].facility.id, "2");
    }

    #[test]
    fn select_flies_to_facility_without_touching_markers() {
        let (mut view, log) = ready_view();
        let facilities = ranked(&["1", "2"]);
        view.refresh(&facilities, DEFAULT_CENTER).unwrap();
        let before = log.borrow().live.clone();

        view.select("2").unwrap();

        assert_eq!(view.view().selected(), Some("2"));
        assert_eq!(log.borrow().live, before);
        let target = builtin_catalog()
            .into_iter()
            .find(|f| f.id == "2")
            .unwrap()
            .coordinate;
        assert_eq!(
            log.borrow().calls.last(),
            Some(&Call::FlyTo(Camera {
                center: target,
                zoom: SELECT_ZOOM
            }))
        );
        assert_eq!(view.view().center(), target);
    }

    #[test]
    fn select_unknown_facility_is_an_error() {
        let (mut view, _log) = ready_view();
        view.refresh(&ranked(&["1"]), DEFAULT_CENTER).unwrap();
        assert!(matches!(
            view.select("99"),
            Err(MapError::UnknownFacility(ref id)) if id == "99"
        ));
        assert_eq!(view.view().selected(), None);
    }

    #[test]
    fn selection_is_dropped_when_facility_leaves_the_list() {
        let (mut view, _log) = ready_view();
        view.refresh(&ranked(&["1", "2"]), DEFAULT_CENTER).unwrap();
        view.select("1").unwrap();

        view.refresh(&ranked(&["1", "3"]), DEFAULT_CENTER).unwrap();
        assert_eq!(view.view().selected(), Some("1"));

        view.refresh(&ranked(&["3"]), DEFAULT_CENTER).unwrap();
        assert_eq!(view.view().selected(), None);
    }

    #[test]
    fn clear_selection_keeps_markers_and_camera() {
        let (mut view, log) = ready_view();
        view.refresh(&ranked(&["1", "2"]), DEFAULT_CENTER).unwrap();
        view.select("2").unwrap();
        let calls = log.borrow().calls.len();
        let (center, zoom) = (view.view().center(), view.view().zoom());

        view.clear_selection().unwrap();
        view.clear_selection().unwrap();

        assert_eq!(view.view().selected(), None);
        assert!(view.selected_facility().is_none());
        assert_eq!(log.borrow().calls.len(), calls);
        assert_eq!(view.view().markers().len(), 2);
        assert_eq!(view.view().center(), center);
        assert!((view.view().zoom() - zoom).abs() < f64::EPSILON);
        assert_eq!(
            view.directions_for_selected(DirectionsProvider::Google)
                .unwrap(),
            None
        );

        view.destroy();
        assert!(matches!(view.clear_selection(), Err(MapError::Destroyed)));
    }

    #[test]
    fn refit_records_fit_ceiling_as_zoom() {
        let (mut view, _log) = ready_view();
        view.locate(coord(12.95, 77.60)).unwrap();
        assert!((view.view().zoom() - LOCATE_ZOOM).abs() < f64::EPSILON);

        view.refresh(&ranked(&["1", "2"]), DEFAULT_CENTER).unwrap();
        assert!((view.view().zoom() - FIT_MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn user_marker_moves_and_refits() {
        let (mut view, log) = ready_view();
        view.refresh(&ranked(&["1"]), DEFAULT_CENTER).unwrap();

        let here = coord(12.95, 77.60);
        view.set_user_position(here).unwrap();
        view.set_user_position(coord(12.96, 77.61)).unwrap();

        assert_eq!(live_labels(&log, MarkerKind::User), [USER_MARKER_LABEL]);
        assert_eq!(view.reference(), coord(12.96, 77.61));
        assert!(matches!(log.borrow().calls.last(), Some(Call::Fit(..))));
    }

    #[test]
    fn locate_flies_to_user_at_locate_zoom() {
        let (mut view, log) = ready_view();
        let here = coord(12.95, 77.60);
        view.locate(here).unwrap();

        assert_eq!(view.user_position(), Some(here));
        assert_eq!(
            log.borrow().calls.last(),
            Some(&Call::FlyTo(Camera {
                center: here,
                zoom: LOCATE_ZOOM
            }))
        );
    }

    #[test]
    fn directions_use_user_position_when_known() {
        let (mut view, _log) = ready_view();
        view.refresh(&ranked(&["2"]), DEFAULT_CENTER).unwrap();
        assert_eq!(
            view.directions_for_selected(DirectionsProvider::Google)
                .unwrap(),
            None
        );

        view.select("2").unwrap();
        assert_eq!(
            view.directions_for_selected(DirectionsProvider::Google)
                .unwrap()
                .as_deref(),
            Some("https://www.google.com/maps/search/?api=1&query=12.9352,77.6245")
        );

        view.set_user_position(coord(12.9716, 77.5946)).unwrap();
        assert_eq!(
            view.directions_for_selected(DirectionsProvider::Google)
                .unwrap()
                .as_deref(),
            Some("https://www.google.com/maps/dir/12.9716,77.5946/12.9352,77.6245")
        );
    }

    #[test]
    fn destroy_releases_markers_before_engine() {
        let (mut view, log) = ready_view();
        view.refresh(&ranked(&["1", "2", "3"]), DEFAULT_CENTER).unwrap();
        view.set_user_position(coord(12.95, 77.60)).unwrap();
        let user_marker = view.user_marker.unwrap();

        view.destroy();

        let log = log.borrow();
        assert!(log.live.is_empty());
        assert!(log.released);
        let tail: Vec<&Call> = log.calls.iter().rev().take(5).collect();
        assert_eq!(tail[0], &Call::Release);
        assert_eq!(tail[1], &Call::Remove(user_marker));
        assert!(tail[2..].iter().all(|c| matches!(c, Call::Remove(_))));
        drop(log);

        assert_eq!(view.state(), MapState::Destroyed);
        assert!(view.engine().is_none());
    }

    #[test]
    fn destroyed_view_rejects_operations_and_destroy_is_idempotent() {
        let (mut view, log) = ready_view();
        view.destroy();
        view.destroy();

        assert!(matches!(
            view.refresh(&ranked(&["1"]), DEFAULT_CENTER),
            Err(MapError::Destroyed)
        ));
        assert!(matches!(view.select("1"), Err(MapError::Destroyed)));
        assert!(matches!(view.flush(), Err(MapError::Destroyed)));
        assert!(matches!(
            view.initialize(Some("pk.test"), |_, _| panic!("factory must not run")),
            Err(MapError::Destroyed)
        ));
        let releases = log
            .borrow()
            .calls
            .iter()
            .filter(|c| **c == Call::Release)
            .count();
        assert_eq!(releases, 1);
    }

    #[test]
    fn dropping_ready_view_tears_down() {
        let (mut view, log) = ready_view();
        view.refresh(&ranked(&["1", "2"]), DEFAULT_CENTER).unwrap();
        drop(view);

        let log = log.borrow();
        assert!(log.released);
        assert!(log.live.is_empty());
        assert_eq!(log.calls.last(), Some(&Call::Release));
    }

    #[test]
    fn late_initialize_draws_recorded_state() {
        let mut view: MapView<RecordingEngine> = MapView::new(None, |_, _| {
            panic!("factory must not run")
        });
        view.refresh(&ranked(&["1", "2"]), DEFAULT_CENTER).unwrap();
        view.set_user_position(coord(12.95, 77.60)).unwrap();

        let log = Rc::new(RefCell::new(Recorder::default()));
        let shared = Rc::clone(&log);
        view.initialize(Some("pk.later"), move |_, _| {
            Ok(RecordingEngine {
                next: 0,
                log: shared,
            })
        })
        .unwrap();

        assert_eq!(view.state(), MapState::Ready);
        assert_eq!(live_labels(&log, MarkerKind::Facility).len(), 2);
        assert_eq!(live_labels(&log, MarkerKind::User), [USER_MARKER_LABEL]);
        assert!(matches!(
            view.initialize(Some("pk.again"), |_, _| panic!("factory must not run")),
            Err(MapError::AlreadyInitialized)
        ));
    }
}
