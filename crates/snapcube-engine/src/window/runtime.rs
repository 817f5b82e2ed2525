use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, WindowCtx};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// How often `App::on_idle` runs while nothing else wakes the loop.
    pub idle_poll: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "snapcube".to_string(),
            initial_size: LogicalSize::new(720.0, 1280.0),
            idle_poll: Duration::from_millis(16),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    app: A,

    window: Option<Arc<Window>>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            window: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.exit_requested {
            self.exit_requested = true;
            self.app.on_close();
        }
        event_loop.exit();
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        if let Some(window) = &self.window {
            return Ok(Arc::clone(window));
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_transparent(true);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window = Some(Arc::clone(&window));
        Ok(window)
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, control: AppControl) {
        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = match self.ensure_window(event_loop) {
            Ok(w) => w,
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.request_exit(event_loop);
                return;
            }
        };

        let control = self.app.on_resumed(&WindowCtx::new(&window));
        self.apply(event_loop, control);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.on_suspended();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.config.idle_poll));

        let Some(window) = self.window.clone() else { return };
        let control = self.app.on_idle(&WindowCtx::new(&window));
        self.apply(event_loop, control);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(window) = self.window.clone() else { return };
        if window.id() != window_id {
            return;
        }
        let ctx = WindowCtx::new(&window);

        let control = self.app.on_window_event(&ctx, &event);
        self.apply(event_loop, control);
        if self.exit_requested {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.request_exit(event_loop);
                self.window = None;
            }

            WindowEvent::RedrawRequested => {
                let control = self.app.on_redraw(&ctx);
                window.pre_present_notify();
                self.apply(event_loop, control);
            }

            _ => {}
        }
    }
}
