use std::sync::Arc;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Extent, InitError, WgpuBackend, WgpuInit};
use crate::render::{FrameDriver, GraphicsContext};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "primer".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point: opens one window and renders into it until it is closed.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop to completion.
    ///
    /// Returns an error if the window or the graphics context could not be
    /// created; per-frame problems never end the loop.
    pub fn run(config: RuntimeConfig, init: WgpuInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, WgpuBackend::new(init));

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Window plus the context rendering into it and the driver borrowing that
/// context.
#[self_referencing]
struct WindowEntry {
    window: Arc<Window>,
    clock: FrameClock,
    context: GraphicsContext<WgpuBackend>,

    #[borrows(context)]
    #[covariant]
    driver: FrameDriver<'this, WgpuBackend>,
}

impl WindowEntry {
    fn create(backend: &WgpuBackend, window: Arc<Window>) -> Result<Self, InitError> {
        let context = GraphicsContext::new(backend, &window)?;
        Ok(WindowEntryBuilder {
            window,
            clock: FrameClock::default(),
            context,
            driver_builder: |context| FrameDriver::new(context),
        }
        .build())
    }

    fn report(&self) {
        let stats = self.with_driver(|d| d.stats());
        let avg_ms = self
            .with_clock(|c| c.average_frame_time())
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0);
        log::info!(
            "submitted {} frames, skipped {}, average frame time {avg_ms:.2} ms",
            stats.submitted,
            stats.skipped
        );
    }
}

struct AppState {
    config: RuntimeConfig,
    backend: WgpuBackend,

    /// `None` until the platform first resumes.
    entry: Option<WindowEntry>,
    startup_error: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: RuntimeConfig, backend: WgpuBackend) -> Self {
        Self {
            config,
            backend,
            entry: None,
            startup_error: None,
        }
    }

    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let entry = WindowEntry::create(&self.backend, Arc::clone(&window)).map_err(|err| {
            log::error!("{err}");
            anyhow::Error::new(err).context("graphics context initialization failed")
        })?;

        self.entry = Some(entry);
        window.request_redraw();
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.entry.take() {
            entry.report();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_entry(event_loop) {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces it to the display.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                entry.with_context(|c| c.resize_surface(Extent::new(size.width, size.height)));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_context(|c| c.resize_surface(Extent::new(size.width, size.height)));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::Occluded(false) => {
                entry.with_clock_mut(|c| c.reset());
            }

            WindowEvent::RedrawRequested => {
                entry.with_mut(|fields| {
                    let ft = fields.clock.tick();
                    let outcome = fields.driver.render_frame();
                    log::trace!("frame {} ({:.2} ms): {outcome:?}", ft.frame_index, ft.dt * 1000.0);
                });
            }

            _ => {}
        }
    }
}
