//! Records a full-day shadow sweep to a Rerun viewer in 15-minute steps.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use sunlight3d::catalog::{sample_buildings, sample_locations};
use sunlight3d::draw::rerun::{draw_buildings, draw_shadow_step, start_session};
use sunlight3d::Simulator;

fn main() -> Result<()> {
    env_logger::init();

    let location = sample_locations()
        .into_iter()
        .next()
        .context("empty location catalog")?;
    let start = NaiveDate::from_ymd_opt(2024, 6, 21)
        .context("invalid date")?
        .and_hms_opt(0, 0, 0)
        .context("invalid time")?;
    let mut simulator = Simulator::new(location, start, sample_buildings()?)?;

    let session = start_session()?;
    draw_buildings(&session, simulator.buildings())?;

    // Sweep the day in 15-minute steps
    for step in 0..96 {
        let snapshot = simulator.advance_minutes(15);
        draw_shadow_step(&session, &snapshot, step)?;
    }

    Ok(())
}
