//! Sunlight and shadow simulation for box-shaped buildings.
//!
//! The crate computes the sun position for a geographic location and a
//! local wall-clock instant, projects building footprints into ground
//! shadows, and keeps a 3D scene's light and shadow geometry synchronized
//! with the simulation state.

pub mod catalog;
pub mod draw;
pub mod geom;
pub mod scene;
pub mod sim;

// Prelude
pub use catalog::{Building, GeoLocation};
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use geom::vector::Vector;
pub use scene::sync::{SceneBackend, SceneSync};
pub use sim::coordinator::{ShadowEntry, SimulationSnapshot, Simulator};
pub use sim::solar::SunPosition;
