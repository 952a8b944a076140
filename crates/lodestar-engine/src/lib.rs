//! Lodestar engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! device/surface management, the window runtime loop, input, timing, a 3D
//! camera, retained scene geometry with dirty-flag attributes, and the
//! sprite/line renderers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod orient;
pub mod paint;
pub mod render;
pub mod scene;
