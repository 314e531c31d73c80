//! Prints the sun path and shadow length over one day at the first sample
//! location.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use sunlight3d::catalog::{sample_buildings, sample_locations};
use sunlight3d::sim::shadow::shadow_length;
use sunlight3d::Simulator;

fn main() -> Result<()> {
    env_logger::init();

    let location = sample_locations()
        .into_iter()
        .next()
        .context("empty location catalog")?;
    let buildings = sample_buildings()?;
    let height = buildings
        .first()
        .map(|b| b.height)
        .context("empty building catalog")?;

    let start = NaiveDate::from_ymd_opt(2024, 6, 21)
        .context("invalid date")?
        .and_hms_opt(0, 0, 0)
        .context("invalid time")?;
    let mut simulator = Simulator::new(location.clone(), start, buildings)?;

    println!(
        "Sun path for {} on {} ({} m building)",
        location.display_name,
        start.date(),
        height
    );
    for hour in 0..24 {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).context("invalid hour")?;
        let snapshot = simulator.set_time(time);
        let sun = snapshot.sun;
        if sun.is_above_horizon() {
            println!(
                "{hour:02}:00  alt {:6.2}  az {:6.2}  shadow {:8.2} m",
                sun.altitude,
                sun.azimuth,
                shadow_length(height, sun.altitude),
            );
        } else {
            println!(
                "{hour:02}:00  alt {:6.2}  az {:6.2}  no shadow (sun below horizon)",
                sun.altitude, sun.azimuth,
            );
        }
    }

    Ok(())
}
