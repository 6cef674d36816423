//! Geometry and state for the storage temperature dial.
//!
//! The dial is a 270° arc drawn as an SVG circle whose stroke dash offset
//! reveals the active portion. Temperatures are whole degrees Celsius.

pub const MIN_CELSIUS: i32 = 5;
pub const MAX_CELSIUS: i32 = 30;
pub const RECOMMENDED_MIN_CELSIUS: i32 = 12;
pub const RECOMMENDED_MAX_CELSIUS: i32 = 15;
pub const DEFAULT_CELSIUS: i32 = 15;

/// Full circumference of the r=90 dial circle, as drawn.
const DASH_ARRAY: f64 = 424.0;
/// Portion of [`DASH_ARRAY`] covering the 270° sweep.
const SWEEP_LENGTH: f64 = 318.0;
const SWEEP_DEGREES: f64 = 270.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialMode {
    #[default]
    Manual,
    /// Setpoint is managed by the facility; manual steps are ignored.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureDial {
    celsius: i32,
    pub mode: DialMode,
}

impl Default for TemperatureDial {
    fn default() -> Self {
        Self {
            celsius: DEFAULT_CELSIUS,
            mode: DialMode::Manual,
        }
    }
}

impl TemperatureDial {
    /// A manual-mode dial at `celsius`, clamped into the supported range.
    #[must_use]
    pub fn new(celsius: i32) -> Self {
        Self {
            celsius: celsius.clamp(MIN_CELSIUS, MAX_CELSIUS),
            mode: DialMode::Manual,
        }
    }

    #[must_use]
    pub fn celsius(&self) -> i32 {
        self.celsius
    }

    /// Position of the setpoint along the range, 0–100.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        f64::from(self.celsius - MIN_CELSIUS) / f64::from(MAX_CELSIUS - MIN_CELSIUS) * 100.0
    }

    /// Needle rotation in degrees, −135° at the minimum to 135° at the maximum.
    #[must_use]
    pub fn needle_angle(&self) -> f64 {
        self.percentage() / 100.0 * SWEEP_DEGREES - SWEEP_DEGREES / 2.0
    }

    /// `stroke-dashoffset` for the active arc.
    #[must_use]
    pub fn dash_offset(&self) -> f64 {
        DASH_ARRAY - self.percentage() / 100.0 * SWEEP_LENGTH
    }

    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        !(RECOMMENDED_MIN_CELSIUS..=RECOMMENDED_MAX_CELSIUS).contains(&self.celsius)
    }

    /// Step up one degree. Returns whether the setpoint changed.
    pub fn increase(&mut self) -> bool {
        self.step(1)
    }

    /// Step down one degree. Returns whether the setpoint changed.
    pub fn decrease(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, delta: i32) -> bool {
        if self.mode == DialMode::Auto {
            return false;
        }
        let next = (self.celsius + delta).clamp(MIN_CELSIUS, MAX_CELSIUS);
        let changed = next != self.celsius;
        self.celsius = next;
        changed
    }
}
