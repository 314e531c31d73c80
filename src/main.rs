use anyhow::{Context, Result};
use chrono::NaiveDate;

use sunlight3d::catalog::{sample_buildings, sample_locations};
use sunlight3d::draw::{run_viewer, ViewerOptions};
use sunlight3d::Simulator;

fn main() -> Result<()> {
    env_logger::init();

    let location = sample_locations()
        .into_iter()
        .next()
        .context("empty location catalog")?;
    let start = NaiveDate::from_ymd_opt(2024, 6, 21)
        .context("invalid start date")?
        .and_hms_opt(8, 0, 0)
        .context("invalid start time")?;
    let simulator = Simulator::new(location, start, sample_buildings()?)?;

    run_viewer(simulator, ViewerOptions::default())
}
