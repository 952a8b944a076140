use glam::{Vec2, Vec3};

use lodestar_engine::camera::Camera;
use lodestar_engine::core::{App, AppControl, FrameCtx};
use lodestar_engine::input::Key;
use lodestar_engine::paint::Color;
use lodestar_engine::render::primitives::{LineRenderer, SpriteItem, SpriteRenderer};
use lodestar_engine::render::Texture2d;
use lodestar_engine::scene::{Axes, OrientedSprite, SpriteStyle, TrackingLine};
use lodestar_engine::window::CursorIcon;

use crate::gizmo::TransformGizmo;
use crate::glyph;
use crate::orbit::OrbitController;

/// Where the draggable target starts.
const INITIAL_TARGET: Vec3 = Vec3::new(5.0, 5.0, 0.0);

/// Glyph textures, created lazily on the first frame (the device is not
/// available before the window exists).
struct Textures {
    arrow: Texture2d,
    disc: Texture2d,
}

impl Textures {
    fn create(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            arrow: Texture2d::from_r8(
                device,
                queue,
                glyph::GLYPH_SIZE,
                glyph::GLYPH_SIZE,
                &glyph::arrow_glyph(),
            ),
            disc: Texture2d::from_r8(
                device,
                queue,
                glyph::GLYPH_SIZE,
                glyph::GLYPH_SIZE,
                &glyph::disc_glyph(),
            ),
        }
    }
}

/// The demo application: anchor sprite at the origin tracking a draggable
/// target, connecting line, coordinate axes, orbit camera, translate gizmo.
pub struct ViewerApp {
    camera: Camera,
    orbit: OrbitController,
    gizmo: TransformGizmo,

    arrow: OrientedSprite,
    marker: OrientedSprite,
    line: TrackingLine,
    axes: Axes,

    sprite_renderer: SpriteRenderer,
    line_renderer: LineRenderer,
    textures: Option<Textures>,
}

impl ViewerApp {
    pub fn new() -> Self {
        let marker_style = SpriteStyle {
            size: 12.0,
            color: Color::from_srgb_u8(255, 0, 0, 255),
            opacity: 1.0,
        };

        Self {
            camera: Camera::perspective(Vec3::new(0.0, 0.0, 30.0), 45.0, 16.0 / 9.0, 1.0, 10_000.0),
            orbit: OrbitController::new(0.0, 0.0, 30.0),
            gizmo: TransformGizmo::new(INITIAL_TARGET),

            arrow: OrientedSprite::new(Vec3::ZERO, INITIAL_TARGET, SpriteStyle::default()),
            marker: OrientedSprite::new(INITIAL_TARGET, INITIAL_TARGET, marker_style),
            line: TrackingLine::new(
                Vec3::ZERO,
                INITIAL_TARGET,
                Color::from_srgb_u8(255, 0, 0, 255),
            ),
            axes: Axes::new(5.0),

            sprite_renderer: SpriteRenderer::new(),
            line_renderer: LineRenderer::new(),
            textures: None,
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input.key_down(Key::Escape) {
            return AppControl::Exit;
        }

        // Aspect follows the live viewport; nothing else hooks resizes.
        self.camera.aspect = ctx.viewport().aspect();

        let (w, h) = ctx.window.logical_size();
        let logical_size = Vec2::new(w, h);

        // Gizmo first: while it owns the pointer, the orbit stands down.
        let dragging = self
            .gizmo
            .update(&self.camera, logical_size, ctx.input, ctx.input_frame);
        self.orbit.enabled = !dragging;
        self.orbit.update(ctx.input, ctx.input_frame);
        self.orbit.apply_to(&mut self.camera);

        ctx.window.set_cursor(if self.gizmo.dragging() {
            CursorIcon::Grabbing
        } else if self.gizmo.hovered() {
            CursorIcon::Grab
        } else {
            CursorIcon::Default
        });

        // Per-frame synchronizers: the gizmo owns the target position; the
        // sprite and line each compare their shadow copy and re-upload only
        // on change.
        let target = self.gizmo.position;
        self.arrow.sync_target(target);
        self.line.sync_target(target);
        self.marker.set_position(target);
        // The disc is rotationally symmetric, so the bearing is irrelevant;
        // a unit offset just keeps the direction from degenerating to zero.
        self.marker.sync_target(target + Vec3::X);

        if self.textures.is_none() {
            self.textures = Some(Textures::create(ctx.gpu.device(), ctx.gpu.queue()));
        }

        let camera = self.camera.clone();
        let axes = &self.axes;
        let gizmo = &self.gizmo;
        let line = &mut self.line;
        let arrow = &mut self.arrow;
        let marker = &mut self.marker;
        let sprite_renderer = &mut self.sprite_renderer;
        let line_renderer = &mut self.line_renderer;
        let textures = match self.textures.as_ref() {
            Some(t) => t,
            None => return AppControl::Continue,
        };

        ctx.render(Color::from_srgb_u8(13, 13, 18, 255), |rctx, target| {
            let mut segments = Vec::with_capacity(6);
            segments.extend_from_slice(&axes.segments());
            segments.extend_from_slice(&gizmo.segments());

            line_renderer.render(rctx, target, &camera, &mut [line], &segments);

            let mut items = [
                SpriteItem {
                    sprite: arrow,
                    texture: &textures.arrow,
                },
                SpriteItem {
                    sprite: marker,
                    texture: &textures.disc,
                },
            ];
            sprite_renderer.render(rctx, target, &camera, &mut items);
        })
    }
}
