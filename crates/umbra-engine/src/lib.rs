//! Umbra engine crate.
//!
//! A two-pass shadow-mapped renderer: a depth-only pass from the light into a
//! fixed-size shadow map, then a lit main pass from the camera that samples it.
//!
//! Layers, bottom-up:
//! - `geometry`: CPU mesh data for the cube and the UV sphere
//! - `scene`: object transforms, bounce animation, light and camera state
//! - `device`: wgpu instance/surface/device ownership
//! - `render`: pipelines, bindings, depth targets, and the per-frame recorder
//! - `window` + `core`: the winit loop and the application contract

pub mod core;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
