//! Color types shared by scene geometry and renderers.

mod color;

pub use color::Color;
