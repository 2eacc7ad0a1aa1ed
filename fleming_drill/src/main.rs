//! Fleming's Left Hand Rule - Interactive Drill
//!
//! Two magnets and a current-carrying wire; one of field, current and force
//! is hidden and the learner names its direction.
//!
//! Controls:
//! - Arrow keys: Answer up/down/left/right
//! - I / O: Answer into / out of the screen
//! - H: Toggle the hand reference model
//! - R: Reset view
//! - Left mouse drag: Orbit camera
//! - Scroll: Zoom in/out

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use common::{Camera3D, GraphicsContext};
use fleming_drill::config::DrillConfig;
use fleming_drill::panels::{
    draw_question_panel, draw_reference_sidebar, draw_scene_labels, draw_status_bar,
};
use fleming_drill::renderer::SceneRenderer;
use fleming_drill::scene::{apparatus_layout, hand_reference, SceneGeometry};
use fleming_drill::{Direction, DrillSession};
use glam::Vec3;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const MAX_MESH_VERTICES: usize = 16_384;
const MAX_LINE_VERTICES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Apparatus,
    Hand,
}

impl ViewMode {
    fn name(self) -> &'static str {
        match self {
            ViewMode::Apparatus => "Apparatus",
            ViewMode::Hand => "Left hand",
        }
    }

    fn toggled(self) -> Self {
        match self {
            ViewMode::Apparatus => ViewMode::Hand,
            ViewMode::Hand => ViewMode::Apparatus,
        }
    }

    fn eye(self) -> Vec3 {
        match self {
            ViewMode::Apparatus => Vec3::new(3.0, 2.0, 6.0),
            ViewMode::Hand => Vec3::new(5.0, 3.0, 5.0),
        }
    }

    fn target(self) -> Vec3 {
        match self {
            ViewMode::Apparatus => Vec3::ZERO,
            ViewMode::Hand => Vec3::new(0.8, 0.6, 0.8),
        }
    }
}

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: SceneRenderer,
    session: DrillSession,
    camera: Camera3D,
    view: ViewMode,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, config: &DrillConfig) -> Self {
        let renderer = SceneRenderer::new(&ctx, MAX_MESH_VERTICES, MAX_LINE_VERTICES);
        let session = DrillSession::new(config.generator(), config.settings());

        let view = if config.show_hand {
            ViewMode::Hand
        } else {
            ViewMode::Apparatus
        };
        let mut camera = Camera3D::new(ctx.aspect_ratio());
        camera.fov = 40.0f32.to_radians();
        camera.look_from(view.eye(), view.target());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            session,
            camera,
            view,
            mouse_pressed: false,
            last_mouse_pos: None,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.renderer.resize(&self.ctx);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
    }

    fn update(&mut self, dt: f32) {
        if self.session.update(Duration::from_secs_f32(dt)) {
            log::debug!("round {} started", self.session.round());
        }
    }

    fn reset_view(&mut self) {
        self.camera.look_from(self.view.eye(), self.view.target());
    }

    fn answer(&mut self, direction: Direction) {
        self.session.submit(direction);
    }

    fn scene_geometry(&self) -> SceneGeometry {
        let scenario = self.session.question().scenario();
        match self.view {
            ViewMode::Apparatus => apparatus_layout(scenario).tessellate(),
            ViewMode::Hand => hand_reference(Some(scenario.hidden())),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);

        let geometry = self.scene_geometry();
        let counts = self.renderer.update_scene(&self.ctx.queue, &geometry);

        // Build egui UI
        let mut clicked = None;
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            let asked = self.session.question().answer().kind;

            draw_status_bar(ctx, &self.session, self.view.name());
            clicked = draw_question_panel(ctx, &self.session);
            draw_reference_sidebar(ctx, asked);
            draw_scene_labels(ctx, &self.camera, &geometry.labels);
        });

        if let Some(direction) = clicked {
            self.answer(direction);
        }

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, counts);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::ArrowUp => self.answer(Direction::Up),
            KeyCode::ArrowDown => self.answer(Direction::Down),
            KeyCode::ArrowLeft => self.answer(Direction::Left),
            KeyCode::ArrowRight => self.answer(Direction::Right),
            KeyCode::KeyI => self.answer(Direction::In),
            KeyCode::KeyO => self.answer(Direction::Out),
            KeyCode::KeyH => {
                self.view = self.view.toggled();
                self.reset_view();
            }
            KeyCode::KeyR => self.reset_view(),
            _ => {}
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.mouse_pressed {
            if let Some((last_x, last_y)) = self.last_mouse_pos {
                let dx = (x - last_x) as f32 * 0.01;
                let dy = (y - last_y) as f32 * 0.01;
                self.camera.orbit(-dx, dy);
            }
            self.last_mouse_pos = Some((x, y));
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.camera.zoom(delta * 0.5);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui
            .state
            .on_window_event(&self.ctx.window, event)
            .consumed
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DrillConfig::parse();
    config.validate()?;
    log::info!(
        "starting drill: seed {:?}, cooldowns {}ms/{}ms, retry on incorrect {}",
        config.seed,
        config.correct_delay_ms,
        config.incorrect_delay_ms,
        config.retry_on_incorrect
    );

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Fleming's Left Hand Rule - Interactive Drill",
        config.width,
        config.height,
    ))?;

    let mut app = App::new(ctx, &config);
    let mut last_time = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::MouseInput { state, button, .. } => {
                            if *button == MouseButton::Left {
                                app.mouse_pressed = *state == ElementState::Pressed;
                                if !app.mouse_pressed {
                                    app.last_mouse_pos = None;
                                }
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => app.handle_key(*key, *state),
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let dt = (now - last_time).as_secs_f32().min(0.1);
                            last_time = now;

                            app.update(dt);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => {
                                    log::warn!("surface lost, reconfiguring");
                                    app.resize(app.ctx.size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("out of GPU memory, exiting");
                                    elwt.exit();
                                }
                                Err(e) => log::error!("render error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
