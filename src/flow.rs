//! Application event loop.
//!
//! The loop follows the usual winit lifecycle:
//! 1. `resumed` creates the window and GPU context and prepares the scene once
//! 2. every `RedrawRequested` replays the scene script into the frame
//!    recorder, uploads the per-draw uniforms and records one render pass
//! 3. `Resized` reconfigures the surface and depth buffer
//! 4. `CloseRequested` releases the scene textures and leaves the loop
//!
//! [`run_headless`] performs the same preparation and one frame without a
//! window or GPU.

use std::{collections::HashSet, iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::Context,
    render::{DrawLog, FrameRecorder},
    resources::texture::HeadlessTextures,
    scene::{RenderReport, SceneManager},
};

struct AppState {
    ctx: Context,
    scene: SceneManager,
    recorder: FrameRecorder,
    is_surface_configured: bool,
    // render issues already logged, so a missing texture warns once and not every frame
    reported: HashSet<String>,
}

impl AppState {
    fn new(mut ctx: Context, config: SceneConfig) -> Self {
        let mut scene = SceneManager::new(config);
        let mut recorder = FrameRecorder::new(&ctx.device, &ctx.object_layout);

        let report = scene.prepare_scene(&mut ctx.textures, &mut recorder);
        for failure in &report.failures {
            log::warn!("Scene preparation: {failure}");
        }

        Self {
            ctx,
            scene,
            recorder,
            is_surface_configured: false,
            reported: HashSet::new(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn report_issues(&mut self, report: &RenderReport) {
        for issue in &report.issues {
            let message = issue.to_string();
            if !self.reported.insert(message.clone()) {
                continue;
            }
            if issue.is_unknown_tag() {
                log::warn!("Rendering continued with stale state: {message}");
            } else {
                log::error!("{message}");
            }
        }
    }

    fn render(&mut self) -> Result<(), wgpu::CurrentSurfaceTexture> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.recorder.begin_frame();
        let report = self.scene.render_scene(&mut self.recorder);
        self.report_issues(&report);
        self.recorder.upload(&self.ctx.queue, &self.ctx.lights_buffer);

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(t) | wgpu::CurrentSurfaceTexture::Suboptimal(t) => t,
            other => return Err(other),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.ctx.pipeline);
            render_pass.set_bind_group(0, &self.ctx.globals_bind_group, &[]);
            self.recorder.draw(&mut render_pass, &self.ctx.textures);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: SceneConfig,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
    started: Instant,
}

impl App {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Builder::new_current_thread().build()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            error: None,
            started: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes().with_title(self.config.window_title.clone());
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let clear_colour = self.config.wgpu_clear_colour();
        let ctx = match self.async_runtime.block_on(Context::new(window, clear_colour)) {
            Ok(ctx) => ctx,
            Err(e) => return self.fail(event_loop, e.context("cannot create the main context")),
        };

        let mut state = AppState::new(ctx, self.config.clone());
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        log::info!("Scene ready after {:?}", self.started.elapsed());
        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                state.scene.destroy_textures(&mut state.ctx.textures);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => {
                    log::error!("Unable to render {:?}", e);
                }
            },
            _ => {}
        }
    }
}

/// Open a window and render the desk scene until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Prepare the scene and render one frame without a window.
///
/// Textures are decoded and checked but never uploaded. Useful to validate an
/// asset directory or a config file.
pub fn run_headless(config: SceneConfig) -> anyhow::Result<RenderReport> {
    let _ = env_logger::try_init();

    let mut textures = HeadlessTextures::new();
    let mut target = DrawLog::new();
    let mut scene = SceneManager::new(config);

    let prepared = scene.prepare_scene(&mut textures, &mut target);
    for failure in &prepared.failures {
        log::warn!("Scene preparation: {failure}");
    }
    let report = scene.render_scene(&mut target);
    log::info!(
        "Dry run: {} textures, {} draws recorded, {} render issues",
        prepared.textures_loaded,
        target.draws().len(),
        report.issues.len()
    );
    scene.destroy_textures(&mut textures);
    Ok(report)
}
