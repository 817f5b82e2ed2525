mod common;

use common::{FixedPermission, ManualSensor, RecordingHost, ScriptedCamera, png};

use snapcube_app::{
    CaptureError, CaptureEvent, CapturePolicy, CaptureState, OverlayError, OverlaySession,
    PermissionStatus, SessionConfig, Trigger,
};
use snapcube_engine::render::RenderOutcome;
use snapcube_engine::texture::{
    DecodeError, DecodeWorker, DecodedImage, ImageDecoder, InlineExecutor, RasterBytes,
    RasterDecoder,
};

type Session = OverlaySession<RecordingHost, ScriptedCamera, InlineExecutor<RasterDecoder>>;

struct Rig {
    host: RecordingHost,
    camera: ScriptedCamera,
    sensor: ManualSensor,
    session: Session,
}

impl Rig {
    fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, SessionConfig::default())
    }

    fn with_config(width: u32, height: u32, config: SessionConfig) -> Self {
        let host = RecordingHost::new(width, height);
        let camera = ScriptedCamera::default();
        let session = OverlaySession::new(
            host.clone(),
            camera.clone(),
            InlineExecutor::new(RasterDecoder::default()),
            config,
        );
        Self {
            host,
            camera,
            sensor: ManualSensor::default(),
            session,
        }
    }

    fn start(&mut self, status: PermissionStatus) -> Result<(), OverlayError> {
        self.session
            .start(&mut FixedPermission(status), &mut self.sensor)
    }

    fn granted(width: u32, height: u32) -> Self {
        let mut rig = Self::new(width, height);
        rig.start(PermissionStatus::Granted).unwrap();
        rig
    }

    fn mesh_opacity(&self) -> f32 {
        let active = self.session.lifecycle().active().unwrap();
        active.scene().mesh().material.opacity
    }

    fn mesh_is_textured(&self) -> bool {
        let active = self.session.lifecycle().active().unwrap();
        active.scene().mesh().material.map.is_some()
    }
}

#[test]
fn permission_denied_shows_message_and_never_activates() {
    let mut rig = Rig::new(1080, 1920);

    let err = rig.start(PermissionStatus::Denied).unwrap_err();

    assert_eq!(err, OverlayError::PermissionDenied);
    assert_eq!(rig.session.message(), Some("No access to camera"));
    assert_eq!(rig.host.log().created, 0);
    assert!(rig.session.lifecycle().surface().is_none());
    assert_eq!(rig.session.capture_state(), CaptureState::PermissionDenied);

    assert_eq!(rig.session.trigger_capture(), Trigger::Denied);
    assert!(rig.session.pump().is_empty());
    assert_eq!(rig.camera.requests(), 0);
}

#[test]
fn granted_surface_matches_portrait_viewport() {
    let rig = Rig::granted(1080, 1920);

    let active = rig.session.lifecycle().active().unwrap();
    let aspect = active.scene().camera().aspect;
    assert!((aspect - 0.5625).abs() < 1e-6);

    // First frame on creation: hidden mesh over the camera feed.
    let log = rig.host.log();
    assert_eq!(log.presents, 1);
    assert_eq!(log.frames[0].opacity, 0.0);
    assert!(rig.session.message().is_none());
}

#[test]
fn successful_capture_shows_then_textures_then_renders_once() {
    let mut rig = Rig::granted(1080, 1920);
    let before = rig.host.presents();

    assert_eq!(rig.session.trigger_capture(), Trigger::Started);
    assert_eq!(rig.mesh_opacity(), 1.0);
    assert!(!rig.mesh_is_textured());
    assert_eq!(rig.camera.last_options().map(|o| o.quality), Some(0.0));

    rig.camera.succeed(png(4, 4, [200, 10, 10, 255]));
    let events = rig.session.pump();

    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        CaptureEvent::TextureApplied {
            render: RenderOutcome::Presented,
            ..
        }
    ));
    assert!(rig.mesh_is_textured());
    assert_eq!(rig.host.presents() - before, 1);
    assert_eq!(rig.session.capture_state(), CaptureState::Rendered);

    rig.session.pump();
    assert_eq!(rig.session.capture_state(), CaptureState::Idle);
    assert_eq!(rig.host.presents() - before, 1);
}

#[test]
fn mesh_is_never_textured_while_hidden() {
    let mut rig = Rig::granted(640, 480);

    rig.session.trigger_capture();
    rig.camera.succeed(png(2, 2, [1, 2, 3, 255]));
    rig.session.pump();

    for frame in rig.host.log().frames {
        if frame.texture.is_some() {
            assert_eq!(frame.opacity, 1.0);
        }
    }
}

#[test]
fn decode_failure_keeps_pre_capture_material_without_rendering() {
    let mut rig = Rig::granted(1080, 1920);
    let before_material = rig
        .session
        .lifecycle()
        .active()
        .unwrap()
        .scene()
        .mesh()
        .material
        .clone();
    let before = rig.host.presents();

    rig.session.trigger_capture();
    rig.camera.succeed(RasterBytes::encoded(b"definitely not an image".to_vec()));
    let events = rig.session.pump();

    assert!(matches!(
        events.as_slice(),
        [CaptureEvent::Failed(OverlayError::ImageDecodeFailed(_))]
    ));
    let after_material = &rig.session.lifecycle().active().unwrap().scene().mesh().material;
    assert_eq!(*after_material, before_material);
    assert_eq!(rig.host.presents(), before);
    assert_eq!(rig.session.capture_state(), CaptureState::Idle);
    assert!(rig.session.message().is_none());
}

#[test]
fn capture_failure_hides_mesh_and_allows_retry() {
    let mut rig = Rig::granted(1080, 1920);

    rig.session.trigger_capture();
    rig.camera.fail(CaptureError::Device("shutter jammed".into()));
    let events = rig.session.pump();

    assert!(matches!(
        events.as_slice(),
        [CaptureEvent::Failed(OverlayError::DeviceCaptureFailed(_))]
    ));
    assert_eq!(rig.mesh_opacity(), 0.0);
    assert_eq!(rig.session.capture_state(), CaptureState::Idle);

    assert_eq!(rig.session.trigger_capture(), Trigger::Started);
    assert_eq!(rig.camera.requests(), 2);
}

#[test]
fn second_trigger_while_busy_is_debounced() {
    let mut rig = Rig::granted(1080, 1920);

    assert_eq!(rig.session.trigger_capture(), Trigger::Started);
    assert_eq!(rig.session.trigger_capture(), Trigger::Busy);
    assert_eq!(rig.camera.requests(), 1);
    assert_eq!(rig.session.orchestrator().captures_requested(), 1);

    rig.camera.succeed(png(2, 2, [0, 0, 0, 255]));
    rig.session.pump();
    assert_eq!(rig.session.trigger_capture(), Trigger::Started);
    assert_eq!(rig.camera.requests(), 2);
}

#[test]
fn sensor_readout_tracks_latest_sample() {
    let mut rig = Rig::granted(1080, 1920);

    rig.sensor.emit(1.234, -0.002, 0.5);
    rig.session.pump();
    assert_eq!(rig.session.readout(), "Render as 3D 1.23");

    rig.sensor.emit(2.0, 0.0, 0.0);
    rig.session.pump();

    let latest = rig.session.feed().latest().unwrap();
    assert_eq!((latest.x, latest.y, latest.z), (2.0, 0.0, 0.0));
    assert_eq!(rig.session.feed().display_x(), 2.0);
}

#[test]
fn recreate_policy_applies_texture_on_fresh_surface() {
    let config = SessionConfig {
        policy: CapturePolicy {
            recreate_surface_after_capture: true,
        },
        ..SessionConfig::default()
    };
    let mut rig = Rig::with_config(1080, 1920, config);
    rig.start(PermissionStatus::Granted).unwrap();
    let first = rig.session.lifecycle().surface().unwrap().id();

    rig.session.trigger_capture();
    rig.camera.succeed(png(2, 2, [9, 9, 9, 255]));
    let events = rig.session.pump();

    let second = rig.session.lifecycle().surface().unwrap().id();
    assert_ne!(first, second);
    assert_eq!(rig.host.log().created, 2);
    assert!(matches!(events[0], CaptureEvent::TextureApplied { .. }));

    let last = rig.host.log().frames.last().cloned().unwrap();
    assert_eq!(last.surface, second);
    assert!(last.texture.is_some());
}

#[test]
fn photo_after_teardown_is_ignored() {
    let mut rig = Rig::granted(1080, 1920);
    rig.session.trigger_capture();

    rig.session.teardown();
    rig.session.teardown();
    let presents = rig.host.presents();

    rig.camera.succeed(png(2, 2, [5, 5, 5, 255]));
    assert!(rig.session.pump().is_empty());
    assert_eq!(rig.host.presents(), presents);
    assert!(!rig.session.lifecycle().is_active());
    assert!(!rig.session.feed().is_subscribed());
}

#[test]
fn lost_surface_is_recreated_on_next_redraw() {
    let mut rig = Rig::granted(800, 600);
    rig.host.lose_next_render();

    assert_eq!(rig.session.redraw(), RenderOutcome::SurfaceLost);
    assert!(rig.session.lifecycle().is_active());
    assert_eq!(rig.host.log().created, 2);
    assert_eq!(rig.session.redraw(), RenderOutcome::Presented);
}

#[test]
fn resume_after_teardown_stays_down_until_restarted() {
    let mut rig = Rig::granted(1080, 1920);
    rig.session.teardown();

    rig.session.resume().unwrap();
    assert!(!rig.session.lifecycle().is_active());
    assert_eq!(rig.host.log().created, 1);

    rig.start(PermissionStatus::Granted).unwrap();
    assert!(rig.session.lifecycle().is_active());
    assert!(rig.session.feed().is_subscribed());
    rig.sensor.emit(0.5, 0.0, 0.0);
    rig.session.pump();
    assert_eq!(rig.session.readout(), "Render as 3D 0.5");
}

/// Panics on every input, like a decoder choking on a corrupt capture.
struct CrashingDecoder;

impl ImageDecoder for CrashingDecoder {
    fn decode(&self, _encoded: &[u8]) -> Result<DecodedImage, DecodeError> {
        panic!("decoder crashed");
    }
}

#[test]
fn crashing_background_decoder_fails_capture_and_allows_retry() {
    use std::time::{Duration, Instant};

    let host = RecordingHost::new(1080, 1920);
    let camera = ScriptedCamera::default();
    let mut sensor = ManualSensor::default();
    let mut session = OverlaySession::new(
        host.clone(),
        camera.clone(),
        DecodeWorker::spawn(CrashingDecoder).unwrap(),
        SessionConfig::default(),
    );
    session
        .start(&mut FixedPermission(PermissionStatus::Granted), &mut sensor)
        .unwrap();
    let presents = host.presents();

    assert_eq!(session.trigger_capture(), Trigger::Started);
    camera.succeed(png(4, 4, [1, 2, 3, 255]));

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.is_empty() && Instant::now() < deadline {
        events = session.pump();
        std::thread::sleep(Duration::from_millis(5));
    }

    assert!(matches!(
        events.as_slice(),
        [CaptureEvent::Failed(OverlayError::ImageDecodeFailed(_))]
    ));
    assert_eq!(session.capture_state(), CaptureState::Idle);
    assert_eq!(host.presents(), presents);
    assert_eq!(session.trigger_capture(), Trigger::Started);
    assert_eq!(camera.requests(), 2);
}
