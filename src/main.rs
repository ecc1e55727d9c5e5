mod config;
mod core;
mod headless;
mod input;
mod playback;
mod projection;
mod session;
mod store;
mod ui;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use imgui::{Context, FontConfig, FontSource};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use tokio::runtime::{Handle, Runtime};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin_winit::{DisplayBuilder, GlWindow};
use glow::HasContext;
use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use config::ReplayConfig;
use input::{bundled_sample, SourceSpec, StaticSource, TrackSource};
use playback::FrameClock;
use session::ReplaySession;
use store::TrackLoader;
use ui::controls::{self, ControlAction};
use ui::{FileDialogs, MapView, PlaybackControls, ShortcutAction, ShortcutManager};

/// Replay a recorded flight path on a map
#[derive(Parser, Debug)]
#[command(name = "flight-replay", version, about)]
struct Args {
    /// Track URL or file (.json, .tlog, .csv); defaults to the configured source
    source: Option<String>,

    /// Playback speed multiplier
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    speed: Option<u8>,

    /// Only fetch samples uploaded from this log file
    #[arg(long)]
    file_name: Option<String>,

    /// Map zoom level
    #[arg(short, long)]
    zoom: Option<f32>,

    /// Replay without a window, logging each sample
    #[arg(long)]
    headless: bool,

    /// Replay the built-in sample track
    #[arg(long, conflicts_with = "source")]
    demo: bool,
}

impl Args {
    fn apply(&self, config: &mut ReplayConfig) {
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(speed) = self.speed {
            config.default_speed = speed;
        }
        if let Some(name) = &self.file_name {
            config.file_name = Some(name.clone());
        }
        if let Some(zoom) = self.zoom {
            config.zoom = zoom;
        }
    }
}

fn track_source(args: &Args, config: &ReplayConfig) -> Result<Arc<dyn TrackSource>> {
    if args.demo {
        let track = bundled_sample().context("Built-in sample track is unreadable")?;
        return Ok(Arc::new(StaticSource::new("bundled sample", track)));
    }
    SourceSpec::parse(&config.source)
        .into_source(config.file_name.as_deref(), config.request_timeout())
        .with_context(|| format!("Invalid track source {}", config.source))
}

struct AppState {
    session: ReplaySession,
    loader: TrackLoader,
    source: Arc<dyn TrackSource>,
    request_timeout: std::time::Duration,
    controls: PlaybackControls,
    map_view: MapView,
    shortcuts: ShortcutManager,
    clock: FrameClock,
    ctrl_held: bool,
    open_file_pending: bool,
    quit_requested: bool,
    show_map: bool,
    show_playback: bool,
    show_shortcuts: bool,
}

impl AppState {
    fn new(config: &ReplayConfig, session: ReplaySession, source: Arc<dyn TrackSource>) -> Self {
        Self {
            session,
            loader: TrackLoader::new(),
            source,
            request_timeout: config.request_timeout(),
            controls: PlaybackControls::new(),
            map_view: MapView::new(config.zoom, config.follow_aircraft),
            shortcuts: ShortcutManager::new(),
            clock: FrameClock::new(),
            ctrl_held: false,
            open_file_pending: false,
            quit_requested: false,
            show_map: true,
            show_playback: true,
            show_shortcuts: false,
        }
    }

    /// (Re)load from the current source in the background
    fn reload(&mut self, runtime: &Handle) {
        self.session.store_mut().set_loading();
        self.loader.start(runtime, self.source.clone());
    }

    fn process_file_dialogs(&mut self, runtime: &Handle) {
        if !self.open_file_pending {
            return;
        }
        self.open_file_pending = false;

        if let Some(path) = FileDialogs::open_track_file() {
            match SourceSpec::File(path).into_source(None, self.request_timeout) {
                Ok(source) => {
                    self.source = source;
                    self.reload(runtime);
                }
                Err(e) => error!("Cannot open track: {}", e),
            }
        }
    }

    fn process_loading(&mut self) {
        if let Some(store) = self.loader.poll() {
            self.session.install(store);
        }
    }

    fn status_line(&self) -> String {
        match self.loader.source() {
            Some(source) => format!("Loading {}...", source),
            None => controls::status_text(self.session.store().status()),
        }
    }

    fn handle_shortcut(&mut self, action: ShortcutAction, runtime: &Handle) {
        match action {
            ShortcutAction::OpenFile => self.open_file_pending = true,
            ShortcutAction::Reload if !self.loader.is_loading() => self.reload(runtime),
            ShortcutAction::Reload => {}
            ShortcutAction::TogglePlay => controls::apply(&mut self.session, ControlAction::TogglePlay),
            ShortcutAction::Restart => controls::apply(&mut self.session, ControlAction::Restart),
            ShortcutAction::StepForward => self.session.driver_mut().step_forward(),
            ShortcutAction::StepBack => self.session.driver_mut().step_back(),
            ShortcutAction::SetSpeed(speed) => controls::apply(&mut self.session, ControlAction::SetSpeed(speed)),
            ShortcutAction::ToggleHelp => self.show_shortcuts = !self.show_shortcuts,
            ShortcutAction::Quit => self.quit_requested = true,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = ReplayConfig::load();
    args.apply(&mut config);

    let source = track_source(&args, &config)?;
    let session = ReplaySession::new(config.default_center(), config.speed());

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;

    if args.headless {
        return rt.block_on(headless::run(session, source));
    }

    run_viewer(rt, &config, AppState::new(&config, session, source))
}

fn run_viewer(rt: Runtime, config: &ReplayConfig, mut state: AppState) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create EventLoop")?;

    // Build the window and GL display using glutin-winit
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(
            WindowBuilder::new()
                .with_title("Flight Replay")
                .with_inner_size(winit::dpi::LogicalSize::new(940.0, 760.0)),
        ))
        .build(&event_loop, glutin::config::ConfigTemplateBuilder::new(), |mut iter| {
            iter.next().expect("glutin offers at least one config")
        })
        .map_err(|e| anyhow!("Failed to create window and display: {}", e))?;

    let window = window.context("Failed to create window")?;
    let gl_display = gl_config.display();

    let context = unsafe {
        gl_display.create_context(
            &gl_config,
            &glutin::context::ContextAttributesBuilder::new().build(Some(window.raw_window_handle())),
        )
    }
    .context("Failed to create GL context")?;

    let attrs = window.build_surface_attributes(glutin::surface::SurfaceAttributesBuilder::<
        glutin::surface::WindowSurface,
    >::new());
    let surface =
        unsafe { gl_display.create_window_surface(&gl_config, &attrs) }.context("Failed to create surface")?;
    let context = context
        .make_current(&surface)
        .context("Failed to make context current")?;

    let load_gl = || unsafe {
        glow::Context::from_loader_function(|ptr| {
            gl_display.get_proc_address(&CString::new(ptr).unwrap_or_default()) as *const _
        })
    };
    let gl = load_gl();
    // Second handle on the same GL context, for clearing
    let gl_clear = load_gl();

    let mut imgui = Context::create();
    imgui.set_ini_filename(None::<std::path::PathBuf>);
    imgui.set_log_filename(None::<std::path::PathBuf>);
    imgui.io_mut().config_flags |= imgui::ConfigFlags::DOCKING_ENABLE;

    let hidpi_factor = window.scale_factor();
    let font_size = (14.0 * hidpi_factor) as f32;
    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: font_size,
            ..FontConfig::default()
        }),
    }]);
    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

    let mut renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .map_err(|e| anyhow!("Failed to initialize renderer: {}", e))?;

    info!("Source: {}, speed {}", state.source.describe(), config.speed().label());
    state.reload(rt.handle());
    let mut last_frame_time = Instant::now();

    event_loop
        .run(move |event, window_target| {
            match &event {
                Event::NewEvents(_) => {
                    let now = Instant::now();
                    imgui.io_mut().update_delta_time(now - last_frame_time);
                    last_frame_time = now;
                }
                Event::AboutToWait => {
                    state.process_file_dialogs(rt.handle());
                    state.process_loading();
                    state.session.pump(state.clock.now_ms());

                    if state.quit_requested {
                        window_target.exit();
                        return;
                    }

                    if let Err(e) = platform.prepare_frame(imgui.io_mut(), &window) {
                        error!("Failed to prepare frame: {}", e);
                    }
                    window.request_redraw();
                }
                Event::WindowEvent {
                    event: WindowEvent::RedrawRequested,
                    ..
                } => {
                    let ui = imgui.new_frame();

                    ui.main_menu_bar(|| {
                        ui.menu("File", || {
                            if ui.menu_item_config("Open Track...").shortcut("Ctrl+O").build() {
                                state.open_file_pending = true;
                            }
                            if ui
                                .menu_item_config("Reload")
                                .shortcut("Ctrl+R")
                                .enabled(!state.loader.is_loading())
                                .build()
                            {
                                state.reload(rt.handle());
                            }
                            ui.separator();
                            if ui.menu_item_config("Exit").shortcut("Ctrl+Q").build() {
                                state.quit_requested = true;
                            }
                        });
                        ui.menu("View", || {
                            ui.menu_item_config("Map").build_with_ref(&mut state.show_map);
                            ui.menu_item_config("Playback").build_with_ref(&mut state.show_playback);
                            ui.menu_item_config("Keyboard Shortcuts")
                                .shortcut("F1")
                                .build_with_ref(&mut state.show_shortcuts);
                        });
                    });

                    if state.show_map {
                        let frame = state.session.frame();
                        let home = state.session.home();
                        let bounds = state.session.store().track().bounds();
                        state.map_view.render(ui, &frame, home, bounds, &mut state.show_map);
                    }

                    if state.show_playback {
                        let status = state.status_line();
                        let action = state
                            .controls
                            .render(ui, &state.session, &status, &mut state.show_playback);
                        controls::apply(&mut state.session, action);
                    }

                    if state.show_shortcuts {
                        state.shortcuts.render_help(ui, &mut state.show_shortcuts);
                    }

                    platform.prepare_render(ui, &window);
                    let draw_data = imgui.render();

                    unsafe {
                        gl_clear.clear_color(0.1, 0.1, 0.1, 1.0);
                        gl_clear.clear(glow::COLOR_BUFFER_BIT);
                    }

                    if let Err(e) = renderer.render(draw_data) {
                        error!("Rendering failed: {}", e);
                    }
                    if let Err(e) = surface.swap_buffers(&context) {
                        error!("Failed to swap buffers: {}", e);
                    }
                }
                Event::WindowEvent {
                    event: WindowEvent::Resized(size),
                    ..
                } => {
                    if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                        surface.resize(&context, width, height);
                    }
                }
                Event::WindowEvent {
                    event: WindowEvent::ModifiersChanged(modifiers),
                    ..
                } => {
                    state.ctrl_held = modifiers.state().control_key();
                }
                Event::WindowEvent {
                    event: WindowEvent::KeyboardInput { event, .. },
                    ..
                } => {
                    if !imgui.io().want_capture_keyboard {
                        if let Some(action) = state.shortcuts.process_event(event, state.ctrl_held) {
                            state.handle_shortcut(action, rt.handle());
                        }
                    }
                }
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    window_target.exit();
                }
                Event::LoopExiting => {
                    state.session.shutdown();
                    info!("Viewer closed");
                }
                _ => {}
            }

            platform.handle_event(imgui.io_mut(), &window, &event);
        })
        .context("EventLoop error")
}
