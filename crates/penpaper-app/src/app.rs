//! Event loop, windows and the host handed to drawing programs.

use kurbo::{Point, Size};
use penpaper_core::{Paper, PaperConfig, PaperId, PaperResult, TextMetrics};
use penpaper_render::{
    ParleyMetrics, RenderContext, RenderResult, Renderer, RendererError, VelloRenderer,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::dialog::{show_prompt, PendingPrompt};
use crate::display::{UserEvent, WindowDisplay};
use crate::event_handler::{key_for_event, KeyDispatcher};

/// Host errors.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to start thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sync presentation to the display refresh rate.
    pub vsync: bool,
    pub antialiasing: AaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            antialiasing: AaConfig::Area,
        }
    }
}

/// Handle the drawing program uses to open papers.
#[derive(Clone)]
pub struct Host {
    display: Arc<WindowDisplay>,
    metrics: Arc<dyn TextMetrics>,
}

impl Host {
    /// Open a paper in a new window.
    pub fn open_paper(&self, config: PaperConfig) -> PaperResult<Paper> {
        let paper = Paper::open(config, self.display.clone(), self.metrics.clone());
        if let Err(err) = self.display.open(&paper) {
            paper.close();
            return Err(err);
        }
        Ok(paper)
    }
}

/// Tells the event loop the program is done, even if it panicked.
struct FinishGuard(EventLoopProxy<UserEvent>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        let _ = self.0.send_event(UserEvent::ProgramFinished);
    }
}

/// Run `program` on its own thread while the event loop drives the windows.
///
/// Blocks until the program has returned and every window is closed. Must be
/// called from the main thread.
pub fn run<F>(config: AppConfig, program: F) -> Result<(), HostError>
where
    F: FnOnce(Host) + Send + 'static,
{
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let display = Arc::new(WindowDisplay::new(event_loop.create_proxy()));
    let host = Host {
        display: display.clone(),
        metrics: Arc::new(ParleyMetrics::new()),
    };
    let keys = KeyDispatcher::spawn()?;

    let guard = FinishGuard(event_loop.create_proxy());
    thread::Builder::new()
        .name("penpaper-program".to_string())
        .spawn(move || {
            let _guard = guard;
            program(host);
        })?;

    let mut app = App::new(config, display, keys);
    event_loop.run_app(&mut app)?;
    log::info!("Event loop finished");
    Ok(())
}

/// Everything one paper's window needs.
struct WindowState {
    paper: Paper,

    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    paper_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    /// Prompts in arrival order; only the first is shown.
    prompts: VecDeque<PendingPrompt>,
}

impl WindowState {
    fn render(
        &mut self,
        render_cx: &vello::util::RenderContext,
        antialiasing: AaConfig,
    ) -> RenderResult<()> {
        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let ctx = RenderContext::new(&self.paper, Size::new(f64::from(width), f64::from(height)))
            .with_scale_factor(self.window.scale_factor());
        self.paper_renderer.build_scene(&ctx);
        let base_color = self.paper_renderer.background_color(&ctx);
        let scene = self.paper_renderer.take_scene();

        // Run egui
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut confirmed = false;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            if let Some(pending) = self.prompts.front_mut() {
                confirmed = show_prompt(ctx, pending);
            }
        });
        if confirmed {
            if let Some(pending) = self.prompts.pop_front() {
                pending.finish();
            }
        }
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: antialiasing,
        };

        // Vello's compute shaders need a Rgba8Unorm storage texture, the
        // surface may be Bgra8Unorm
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        // egui on top of the paper
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };
        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        // Keep the dialog responsive while one is open
        if !self.prompts.is_empty() {
            self.window.request_redraw();
        }
        Ok(())
    }
}

/// Main application struct.
struct App {
    config: AppConfig,
    render_cx: vello::util::RenderContext,
    windows: HashMap<WindowId, WindowState>,
    papers: HashMap<PaperId, WindowId>,
    display: Arc<WindowDisplay>,
    keys: KeyDispatcher,
    program_finished: bool,
}

impl App {
    fn new(config: AppConfig, display: Arc<WindowDisplay>, keys: KeyDispatcher) -> Self {
        Self {
            config,
            render_cx: vello::util::RenderContext::new(),
            windows: HashMap::new(),
            papers: HashMap::new(),
            display,
            keys,
            program_finished: false,
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop, paper: Paper) -> RenderResult<WindowState> {
        let size = paper.size();
        let window_attrs = Window::default_attributes()
            .with_title(paper.title())
            .with_inner_size(LogicalSize::new(size.width, size.height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| RendererError::InitFailed(e.to_string()))?,
        );

        let inner = window.inner_size();
        let (width, height) = if inner.width == 0 || inner.height == 0 {
            (size.width as u32, size.height as u32)
        } else {
            (inner.width, inner.height)
        };
        let present_mode = if self.config.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        };
        let surface = pollster::block_on(self.render_cx.create_surface(
            window.clone(),
            width,
            height,
            present_mode,
        ))
        .map_err(|e| RendererError::Surface(e.to_string()))?;

        let device = &self.render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::light());
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!("Opened window for {} \"{}\" - {width}x{height}", paper.id(), paper.title());
        window.request_redraw();

        Ok(WindowState {
            paper,
            window,
            surface,
            vello_renderer,
            paper_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            prompts: VecDeque::new(),
        })
    }

    fn window_for(&mut self, paper: PaperId) -> Option<&mut WindowState> {
        let id = self.papers.get(&paper)?;
        self.windows.get_mut(id)
    }

    /// Drop a paper's window; prompts still waiting on it fail their callers.
    fn close_window(&mut self, paper: PaperId) {
        let Some(window_id) = self.papers.remove(&paper) else {
            return;
        };
        if let Some(state) = self.windows.remove(&window_id) {
            if !state.prompts.is_empty() {
                log::debug!("Dropping {} open prompt(s) of {paper}", state.prompts.len());
            }
        }
        self.display.set_pointer(paper, None);
        log::debug!("Closed window of {paper}");
    }

    fn exit_if_done(&self, event_loop: &ActiveEventLoop) {
        if self.program_finished && self.windows.is_empty() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("Resumed with {} window(s)", self.windows.len());
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Open(paper) => {
                if !paper.is_open() {
                    return;
                }
                match self.open_window(event_loop, paper.clone()) {
                    Ok(state) => {
                        let window_id = state.window.id();
                        self.papers.insert(paper.id(), window_id);
                        self.windows.insert(window_id, state);
                    }
                    Err(e) => {
                        log::error!("Failed to open window for {}: {e}", paper.id());
                        paper.close();
                    }
                }
            }
            UserEvent::Redraw(paper) => {
                if let Some(state) = self.window_for(paper) {
                    state.window.request_redraw();
                }
            }
            UserEvent::Focus(paper) => {
                if let Some(state) = self.window_for(paper) {
                    state.window.focus_window();
                }
            }
            UserEvent::Close(paper) => {
                self.close_window(paper);
                self.exit_if_done(event_loop);
            }
            UserEvent::Prompt {
                paper,
                prompt,
                reply,
            } => match self.window_for(paper) {
                Some(state) => {
                    state.prompts.push_back(PendingPrompt::new(prompt, reply));
                    state.window.focus_window();
                    state.window.request_redraw();
                }
                None => log::warn!("Prompt for {paper} without a window"),
            },
            UserEvent::ProgramFinished => {
                log::debug!("Program finished, {} window(s) open", self.windows.len());
                self.program_finished = true;
                self.exit_if_done(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.windows.get_mut(&window_id) else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let modal = !state.prompts.is_empty() || egui_response.consumed;

        match event {
            WindowEvent::CloseRequested => {
                let paper = state.paper.clone();
                self.close_window(paper.id());
                paper.close();
                self.exit_if_done(event_loop);
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                self.render_cx
                    .resize_surface(&mut state.surface, size.width, size.height);
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = state.render(&self.render_cx, self.config.antialiasing) {
                    log::warn!("Failed to render {}: {e}", state.paper.id());
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                self.display
                    .set_pointer(state.paper.id(), Some(Point::new(logical.x, logical.y)));
            }

            WindowEvent::CursorLeft { .. } => {
                self.display.set_pointer(state.paper.id(), None);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if modal {
                    return;
                }
                if let Some(key) = key_for_event(&event) {
                    self.keys.dispatch(&state.paper, key);
                }
            }

            _ => {}
        }
    }
}
