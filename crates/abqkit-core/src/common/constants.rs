//! Physical constants and model defaults shared by the calculators and tools.

pub const PI: f64 = std::f64::consts::PI;
pub const FOUR_THIRDS_PI: f64 = 4.0 / 3.0 * PI;

/// Newtonian gravitational constant, m^3 kg^-1 s^-2.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.673_84e-11;

/// Lunar mean radius, m.
pub const LUNAR_RADIUS: f64 = 1740.0e3;

pub const DEFAULT_BASIN_DEPTH: f64 = 8000.0;
pub const DEFAULT_RIGHTSIDE_ANGLE: f64 = -3.14159;
pub const DEFAULT_RIGHTSIDE_DISTANCE: f64 = 2.7e6;
