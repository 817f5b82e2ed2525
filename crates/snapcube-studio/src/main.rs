//! Desktop host for the camera overlay.
//!
//! The "camera" is an image file read on a background thread, the gyroscope is
//! synthetic, and permission is granted unless `SNAPCUBE_DENY_CAMERA=1`.
//!
//! Usage: `snapcube-studio <image> [--spin] [--recreate]`
//! Space or left click captures; Escape quits.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use snapcube_app::{
    CameraCapture, CaptureError, CaptureEvent, CaptureOptions, CapturePolicy, OrientationSample,
    OverlaySession, PendingCapture, PermissionProvider, PermissionStatus, SensorSource,
    SessionConfig, Subscription,
};
use snapcube_engine::core::{App, AppControl, WindowCtx};
use snapcube_engine::device::GpuInit;
use snapcube_engine::logging::{LoggingConfig, init_logging};
use snapcube_engine::render::RenderMode;
use snapcube_engine::surface::SurfaceSize;
use snapcube_engine::texture::{DecodeWorker, RasterBytes, RasterDecoder};
use snapcube_engine::window::{Runtime, RuntimeConfig, WindowHost};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let args = StudioArgs::parse(std::env::args().skip(1))?;
    log::info!("capturing from {}", args.image.display());

    let config = SessionConfig {
        render_mode: if args.spin {
            RenderMode::Continuous { spin: 0.8 }
        } else {
            RenderMode::OnDemand
        },
        policy: CapturePolicy {
            recreate_surface_after_capture: args.recreate,
        },
        ..SessionConfig::default()
    };

    Runtime::run(
        RuntimeConfig {
            title: "snapcube".to_string(),
            ..RuntimeConfig::default()
        },
        StudioApp::new(args.image, config),
    )
}

struct StudioArgs {
    image: PathBuf,
    spin: bool,
    recreate: bool,
}

impl StudioArgs {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut image = None;
        let mut spin = false;
        let mut recreate = false;

        for arg in args {
            match arg.as_str() {
                "--spin" => spin = true,
                "--recreate" => recreate = true,
                flag if flag.starts_with("--") => anyhow::bail!("unknown flag {flag}"),
                _ => image = Some(PathBuf::from(arg)),
            }
        }

        Ok(Self {
            image: image.context("usage: snapcube-studio <image> [--spin] [--recreate]")?,
            spin,
            recreate,
        })
    }
}

type Session = OverlaySession<WindowHost, FileCamera, DecodeWorker>;

struct StudioApp {
    image: PathBuf,
    config: SessionConfig,
    gyro: SyntheticGyro,
    session: Option<Session>,
    title: String,
}

impl StudioApp {
    fn new(image: PathBuf, config: SessionConfig) -> Self {
        Self {
            image,
            config,
            gyro: SyntheticGyro,
            session: None,
            title: String::new(),
        }
    }

    fn start_session(&mut self, ctx: &WindowCtx<'_>) -> Result<()> {
        let worker = DecodeWorker::spawn(RasterDecoder::default())?;
        let mut session = OverlaySession::new(
            ctx.host(GpuInit::default()),
            FileCamera::new(&self.image),
            worker,
            self.config.clone(),
        );

        if let Err(err) = session.start(&mut EnvPermission, &mut self.gyro) {
            log::error!("overlay did not start: {err}");
        }
        self.session = Some(session);
        Ok(())
    }

    fn trigger(&mut self) {
        if let Some(session) = &mut self.session {
            log::debug!("capture trigger: {:?}", session.trigger_capture());
        }
    }

    fn refresh_title(&mut self, ctx: &WindowCtx<'_>) {
        let Some(session) = &self.session else { return };
        let title = match session.message() {
            Some(message) => format!("snapcube | {message}"),
            None => format!("snapcube | {}", session.readout()),
        };
        if title != self.title {
            ctx.set_title(&title);
            self.title = title;
        }
    }
}

impl App for StudioApp {
    fn on_resumed(&mut self, ctx: &WindowCtx<'_>) -> AppControl {
        match &mut self.session {
            Some(session) => {
                if let Err(err) = session.resume() {
                    log::error!("resume failed: {err}");
                }
            }
            None => {
                if let Err(err) = self.start_session(ctx) {
                    log::error!("failed to start overlay: {err:#}");
                    return AppControl::Exit;
                }
            }
        }
        self.refresh_title(ctx);
        AppControl::Continue
    }

    fn on_suspended(&mut self) {
        if let Some(session) = &mut self.session {
            session.suspend();
        }
    }

    fn on_window_event(&mut self, ctx: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(size) => {
                let resized = self
                    .session
                    .as_mut()
                    .is_some_and(|s| s.resize(SurfaceSize::new(size.width, size.height)));
                if resized {
                    ctx.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Space) => self.trigger(),
                    PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
                    _ => {}
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.trigger(),

            _ => {}
        }
        AppControl::Continue
    }

    fn on_redraw(&mut self, _ctx: &WindowCtx<'_>) -> AppControl {
        if let Some(session) = &mut self.session {
            session.redraw();
        }
        AppControl::Continue
    }

    fn on_idle(&mut self, ctx: &WindowCtx<'_>) -> AppControl {
        let Some(session) = &mut self.session else {
            return AppControl::Continue;
        };

        for event in session.pump() {
            match event {
                CaptureEvent::TextureApplied { texture, render } => {
                    log::info!("{texture} on screen ({render:?})");
                }
                CaptureEvent::Failed(err) => log::warn!("capture failed: {err}"),
                CaptureEvent::Abandoned => log::info!("capture abandoned"),
            }
        }
        if session.wants_redraw() {
            ctx.request_redraw();
        }

        self.refresh_title(ctx);
        AppControl::Continue
    }

    fn on_close(&mut self) {
        if let Some(session) = &mut self.session {
            session.teardown();
        }
    }
}

/// Reads the photo from disk on a background thread.
///
/// `.txt` files hold base64 text or a `data:` URI; anything else is taken as
/// encoded image bytes.
struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn read(path: &Path) -> Result<RasterBytes, CaptureError> {
        let device = |e: std::io::Error| CaptureError::Device(format!("{}: {e}", path.display()));
        if path.extension().is_some_and(|ext| ext == "txt") {
            std::fs::read_to_string(path).map(RasterBytes::base64).map_err(device)
        } else {
            std::fs::read(path).map(RasterBytes::encoded).map_err(device)
        }
    }
}

impl CameraCapture for FileCamera {
    fn capture(&mut self, options: &CaptureOptions) -> PendingCapture {
        log::debug!("capture requested ({options:?})");
        let (resolver, pending) = PendingCapture::channel();
        let path = self.path.clone();

        // A failed spawn drops the resolver, which reads as a device failure.
        let spawned = thread::Builder::new()
            .name("snapcube-camera".to_string())
            .spawn(move || resolver.resolve(Self::read(&path)));
        if let Err(err) = spawned {
            log::error!("camera thread failed to start: {err}");
        }
        pending
    }
}

struct EnvPermission;

impl PermissionProvider for EnvPermission {
    fn request_permission(&mut self) -> PermissionStatus {
        match std::env::var("SNAPCUBE_DENY_CAMERA").as_deref() {
            Ok("1") => PermissionStatus::Denied,
            _ => PermissionStatus::Granted,
        }
    }
}

/// Gyroscope stand-in emitting slow sine waves.
struct SyntheticGyro;

impl SensorSource for SyntheticGyro {
    fn subscribe(&mut self, interval: Duration) -> Subscription {
        let (tx, rx) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_thread = Arc::clone(&stop);

        let spawned = thread::Builder::new()
            .name("snapcube-gyro".to_string())
            .spawn(move || {
                let start = Instant::now();
                while !stop_thread.load(Ordering::Acquire) {
                    let t = start.elapsed().as_secs_f32();
                    let sample = OrientationSample::new(
                        (t * TAU * 0.2).sin() * 2.5,
                        (t * TAU * 0.13).cos() * 1.5,
                        (t * TAU * 0.07).sin() * 0.5,
                    );
                    if tx.send(sample).is_err() {
                        break;
                    }
                    thread::sleep(interval);
                }
            });
        if let Err(err) = spawned {
            log::error!("gyro thread failed to start: {err}");
        }

        Subscription::with_release(rx, move || stop.store(true, Ordering::Release))
    }
}
