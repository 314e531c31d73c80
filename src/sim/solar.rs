use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::geom::vector::Vector;

/// Sun position (altitude and azimuth angles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    /// Altitude angle in degrees (0 = horizon, 90 = zenith, negative below
    /// the horizon).
    pub altitude: f64,
    /// Azimuth angle in degrees, clockwise compass bearing. See [`compute`]
    /// for the 0/360 convention.
    ///
    /// [`compute`]: SunPosition::compute
    pub azimuth: f64,
}

impl SunPosition {
    /// Computes the sun position for a local wall-clock instant.
    ///
    /// - `latitude`: in degrees (positive north)
    /// - `longitude`: in degrees (positive east)
    ///
    /// Simplified model: declination from a sine fit over the Julian day
    /// count, hour angle at 15 degrees per hour around local solar noon,
    /// no refraction or equation-of-time correction. The azimuth is the
    /// `atan2` result shifted by +180 degrees and not re-wrapped, so
    /// extreme latitude/date combinations may fall slightly outside
    /// [0, 360). Any finite inputs produce finite angles; a negative
    /// altitude (sun below the horizon) is a valid result.
    pub fn compute(instant: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        let _ = longitude; // Only enters a solar-time correction, which this model omits
        let day_count = julian_day_number(
            i64::from(instant.year()),
            i64::from(instant.month()),
            i64::from(instant.day()),
        );
        let declination = declination_degrees(day_count).to_radians();

        // Hour angle: zero at local solar noon, 15 degrees per hour
        let hour = f64::from(instant.hour()) + f64::from(instant.minute()) / 60.0;
        let hour_angle = (hour - 12.0) * 15.0_f64.to_radians();

        let lat = latitude.to_radians();

        let altitude = (lat.sin() * declination.sin()
            + lat.cos() * declination.cos() * hour_angle.cos())
        .asin();

        let azimuth = hour_angle
            .sin()
            .atan2(hour_angle.cos() * lat.sin() - declination.tan() * lat.cos());

        Self {
            altitude: altitude.to_degrees(),
            azimuth: azimuth.to_degrees() + 180.0,
        }
    }

    /// Returns true if the sun is above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }

    /// Unit vector pointing from the world origin toward the sun.
    ///
    /// Renderer frame: +Y up, azimuth 0 along +Z, bearings turning toward +X.
    pub fn to_direction(&self) -> Vector {
        let alt = self.altitude.to_radians();
        let azi = self.azimuth.to_radians();
        Vector::new(alt.cos() * azi.sin(), alt.sin(), alt.cos() * azi.cos())
    }

    /// Direction the sunlight travels (the opposite of [`to_direction`]).
    ///
    /// [`to_direction`]: SunPosition::to_direction
    pub fn light_direction(&self) -> Vector {
        -self.to_direction()
    }
}

/// Gregorian-calendar Julian Day Number.
pub fn julian_day_number(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

/// Solar declination in degrees for a given day count.
///
/// The day count is the full Julian Day Number rather than a day-of-year
/// ordinal, so the sine fit drifts slowly against the calendar seasons.
/// This matches the behavior the simulation reproduces and is kept as is.
fn declination_degrees(day_count: i64) -> f64 {
    23.45 * (2.0 * std::f64::consts::PI / 365.0 * (284.0 + day_count as f64)).sin()
}
