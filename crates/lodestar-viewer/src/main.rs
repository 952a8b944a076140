//! Interactive oriented-sprite demo.
//!
//! Renders an arrow point sprite pinned at the origin whose glyph rotates in
//! screen space to point at a draggable target, plus the connecting line,
//! coordinate axes, and a translate gizmo. Drag the gizmo handles to move the
//! target; drag elsewhere to orbit, scroll to zoom, Escape to quit.

mod app;
mod glyph;
mod gizmo;
mod orbit;

use anyhow::Result;
use lodestar_engine::device::GpuInit;
use lodestar_engine::logging::{init_logging, LoggingConfig};
use lodestar_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "lodestar".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
    };

    log::info!("starting lodestar viewer");
    Runtime::run(config, GpuInit::default(), app::ViewerApp::new())
}
