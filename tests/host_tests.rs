//! Scene Host Tests
//!
//! Tests for:
//! - Mount target validation before renderer construction
//! - Construction order and exact-reverse teardown
//! - Renderer setup (pixel ratio, viewport, clear colour)
//! - Keys before and after the actor loads, applied synchronously
//! - Atomic resize of camera aspect and renderer viewport
//! - No draws, key handling or scene mutation after unmount

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use glam::{Quat, Vec3};
use tokio::sync::Semaphore;

use prowl::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, LoopMode, TargetPath, Track, TrackData,
    TrackMeta,
};
use prowl::assets::{ModelSource, Prefab, PrefabNode};
use prowl::config::{ClipNames, SceneConfig};
use prowl::errors::{ProwlError, Result};
use prowl::host::{MountStage, MountTarget, SceneHost};
use prowl::render::HeadlessRenderer;
use prowl::render_loop::ManualScheduler;

const EPSILON: f32 = 1e-4;
const SETTLE: Duration = Duration::from_secs(5);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

const CONSTRUCTION_ORDER: [MountStage; 10] = [
    MountStage::Scene,
    MountStage::Camera,
    MountStage::Renderer,
    MountStage::Controls,
    MountStage::Lights,
    MountStage::Helpers,
    MountStage::Ground,
    MountStage::AssetLoads,
    MountStage::RenderLoop,
    MountStage::Listeners,
];

fn config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.stage.stars.count = 50;
    config
}

fn clip(name: &str) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![Track {
            meta: TrackMeta {
                node_name: "Spine".into(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Quat::IDENTITY, Quat::from_rotation_x(0.3)],
                InterpolationMode::Linear,
            )),
        }],
    )
}

/// Serves the wolf rig for the actor URL and a single node for anything else.
struct SceneSource {
    actor_url: String,
    gate: Option<Arc<Semaphore>>,
}

impl SceneSource {
    fn new(config: &SceneConfig) -> Self {
        Self {
            actor_url: config.actor.url.clone(),
            gate: None,
        }
    }
}

impl ModelSource for SceneSource {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Prefab>> {
        let mut prefab = Prefab::new();
        if url == self.actor_url {
            let clips = ClipNames::default();
            let spine = prefab.push_node(PrefabNode::new("Spine"));
            let mut root = PrefabNode::new("Wolf_Skeleton");
            root.children_indices.push(spine);
            let root = prefab.push_node(root);
            prefab.root_indices.push(root);
            prefab.animations = vec![
                clip(&clips.idle),
                clip(&clips.walk),
                clip(&clips.run),
                clip(&clips.seat),
            ];
        } else {
            let house = prefab.push_node(PrefabNode::new("House"));
            prefab.root_indices.push(house);
        }

        let gate = self.gate.clone();
        async move {
            if let Some(gate) = gate {
                gate.acquire().await.map(|permit| permit.forget()).ok();
            }
            Ok(prefab)
        }
        .boxed()
    }
}

struct Fixture {
    host: SceneHost,
    renderer: HeadlessRenderer,
    scheduler: ManualScheduler,
}

fn mount_with(config: SceneConfig, source: SceneSource, scheduler: ManualScheduler) -> Fixture {
    let renderer = HeadlessRenderer::new(0, 0);
    let inspect = renderer.clone();
    let target = MountTarget::new(1280, 720).with_pixel_ratio(3.0);
    let host = SceneHost::mount_with_source(
        Some(&target),
        config,
        move |_| Ok(renderer),
        scheduler.clone(),
        Arc::new(source),
    )
    .unwrap();
    Fixture {
        host,
        renderer: inspect,
        scheduler,
    }
}

fn mount() -> Fixture {
    let config = config();
    let source = SceneSource::new(&config);
    mount_with(config, source, ManualScheduler::new())
}

fn mount_loaded() -> Fixture {
    let mut fixture = mount();
    fixture.host.wait_for_assets(SETTLE);
    assert!(fixture.host.actor().is_some());
    fixture
}

// ============================================================================
// Mounting
// ============================================================================

#[test]
fn mount_without_target_fails_before_renderer() {
    let config = config();
    let source = Arc::new(SceneSource::new(&config));
    let mut created = false;
    let result = SceneHost::mount_with_source(
        None,
        config,
        |_| {
            created = true;
            Ok(HeadlessRenderer::new(1, 1))
        },
        ManualScheduler::new(),
        source,
    );

    assert!(matches!(result, Err(ProwlError::MountTargetMissing)));
    assert!(!created);
}

#[test]
fn mount_with_empty_target_fails_before_renderer() {
    let config = config();
    let source = Arc::new(SceneSource::new(&config));
    let mut created = false;
    let result = SceneHost::mount_with_source(
        Some(&MountTarget::new(0, 720)),
        config,
        |_| {
            created = true;
            Ok(HeadlessRenderer::new(1, 1))
        },
        ManualScheduler::new(),
        source,
    );

    assert!(matches!(
        result,
        Err(ProwlError::InvalidMountTarget {
            width: 0,
            height: 720
        })
    ));
    assert!(!created);
}

#[test]
fn renderer_factory_error_propagates() {
    let config = config();
    let source = Arc::new(SceneSource::new(&config));
    let result = SceneHost::mount_with_source(
        Some(&MountTarget::new(640, 480)),
        config,
        |_| Err::<HeadlessRenderer, _>(ProwlError::Io(std::io::Error::other("no adapter"))),
        ManualScheduler::new(),
        source,
    );
    assert!(matches!(result, Err(ProwlError::Io(_))));
}

#[test]
fn mount_builds_in_order() {
    let fixture = mount();
    assert_eq!(fixture.host.stages(), &CONSTRUCTION_ORDER);
    assert!(fixture.host.is_mounted());
    assert!(fixture.host.listeners_attached());
    assert!(fixture.host.render_loop().is_running());
    assert_eq!(fixture.scheduler.requested(), 1);
}

#[test]
fn mount_configures_renderer_and_camera() {
    let fixture = mount();
    let state = fixture.renderer.snapshot();

    assert_eq!((state.width, state.height), (1280, 720));
    assert!(approx(state.pixel_ratio, 2.0), "pixel ratio is capped");
    assert_eq!(state.drawing_buffer_size(), (2560, 1440));
    assert!(approx_vec3(state.clear_color, Vec3::ZERO));

    let camera = fixture.host.camera();
    assert!(approx(camera.aspect, 1280.0 / 720.0));
    assert!(approx_vec3(camera.transform.position, Vec3::new(20.0, 10.0, 50.0)));
}

#[test]
fn mount_builds_stage() {
    let fixture = mount();
    let scene = fixture.host.scene();
    let nodes = fixture.host.stage_nodes();

    assert_eq!(scene.object_count(), 6);
    let stars = scene.get_node(nodes.stars).unwrap();
    let mesh = &scene.meshes[stars.mesh.unwrap()];
    assert_eq!(mesh.instance_count(), 50);

    let ground = scene.get_node(nodes.ground).unwrap();
    assert!(approx(ground.transform.position.y, -0.5));
    let light = scene.get_node(nodes.directional_light).unwrap();
    assert!(approx(light.transform.position.length(), 1.0));
}

#[test]
fn assets_and_actor_load() {
    let mut fixture = mount();
    let inserted = fixture.host.wait_for_assets(SETTLE);

    assert_eq!(inserted, 3);
    let actor = fixture.host.actor().unwrap();
    assert_eq!(
        actor.controller().current_name(),
        Some(ClipNames::default().idle.as_str())
    );
    assert!(approx_vec3(
        fixture.host.actor_position().unwrap(),
        Vec3::new(30.0, 0.0, 0.0)
    ));
    let root = fixture.host.scene().get_node(actor.root()).unwrap();
    assert!(approx_vec3(root.transform.scale, Vec3::splat(0.08)));
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn keys_before_actor_loads_are_dropped() {
    let config = config();
    let gate = Arc::new(Semaphore::new(0));
    let mut source = SceneSource::new(&config);
    source.gate = Some(Arc::clone(&gate));
    let mut fixture = mount_with(config, source, ManualScheduler::new());

    let intent = fixture.host.key_down("ArrowDown").unwrap();
    assert!(intent.is_empty());
    fixture.host.key_down("Shift");
    assert!(fixture.host.input_state().shift_held);

    gate.add_permits(3);
    fixture.host.wait_for_assets(SETTLE);
    assert!(approx_vec3(
        fixture.host.actor_position().unwrap(),
        Vec3::new(30.0, 0.0, 0.0)
    ));

    // Shift held across the load still selects the fast speed
    fixture.host.key_down("ArrowDown");
    assert!(approx_vec3(
        fixture.host.actor_position().unwrap(),
        Vec3::new(30.0, 0.0, 5.0)
    ));
}

#[test]
fn key_moves_actor_synchronously() {
    let mut fixture = mount_loaded();
    let clips = ClipNames::default();

    fixture.host.key_down("ArrowDown");
    assert!(approx_vec3(
        fixture.host.actor_position().unwrap(),
        Vec3::new(30.0, 0.0, 2.0)
    ));
    let controller = fixture.host.actor().unwrap().controller();
    assert_eq!(controller.current_name(), Some(clips.walk.as_str()));
    assert_eq!(controller.current_loop_mode(), Some(LoopMode::Loop));

    fixture.host.key_up("ArrowDown");
    fixture.host.key_down(" ");
    let controller = fixture.host.actor().unwrap().controller();
    assert_eq!(controller.current_name(), Some(clips.seat.as_str()));
    assert!(fixture.host.input_state().sitting);
}

// ============================================================================
// Frames and resize
// ============================================================================

#[test]
fn frame_draws_and_spins_stars() {
    let mut fixture = mount_loaded();
    let t0 = Instant::now();

    assert!(fixture.host.pump_frame(t0));
    assert!(fixture.host.pump_frame(t0 + Duration::from_millis(16)));
    assert_eq!(fixture.renderer.draw_count(), 2);
    assert_eq!(fixture.host.render_loop().steps(), 2);

    let stars = fixture.host.stage_nodes().stars;
    let rotation = fixture.host.scene().get_node(stars).unwrap().transform.rotation;
    let expected = Quat::from_rotation_y(0.001);
    assert!(approx(rotation.dot(expected).abs(), 1.0));

    let record = fixture.renderer.snapshot().last_draw.unwrap();
    assert_eq!(record.object_count, fixture.host.scene().object_count());
}

#[test]
fn pump_frame_runs_one_step_per_due_frame() {
    let mut fixture = mount();
    let scheduler = fixture.scheduler.clone();
    let now = Instant::now();
    fixture.host.pump_frame(now);
    assert_eq!(scheduler.queued(), 1);
    fixture.host.pump_frame(now);
    assert_eq!(fixture.renderer.draw_count(), 2);
}

#[test]
fn resize_updates_camera_and_viewport_together() {
    let mut fixture = mount();
    fixture.host.resize(800, 400);
    fixture.host.pump_frame(Instant::now());

    let record = fixture.renderer.snapshot().last_draw.unwrap();
    assert_eq!(record.viewport, (800, 400));
    assert!(approx(record.camera_aspect, 2.0));
}

#[test]
fn resize_to_zero_is_ignored() {
    let mut fixture = mount();
    fixture.host.resize(0, 400);
    assert!(approx(fixture.host.camera().aspect, 1280.0 / 720.0));
    assert_eq!(fixture.renderer.snapshot().width, 1280);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn unmount_releases_in_reverse_order() {
    let fixture = mount_loaded();
    let renderer = fixture.renderer.clone();
    let released = fixture.host.unmount();

    let mut expected = CONSTRUCTION_ORDER.to_vec();
    expected.reverse();
    assert_eq!(released, expected);
    assert!(renderer.snapshot().disposed);
}

#[test]
fn no_draws_after_teardown() {
    let config = config();
    let source = SceneSource::new(&config);
    let mut fixture = mount_with(config, source, ManualScheduler::without_retraction());
    let now = Instant::now();
    fixture.host.pump_frame(now);
    fixture.host.teardown();

    // The host still delivers the frame it had already queued
    assert_eq!(fixture.scheduler.queued(), 1);
    for _ in 0..3 {
        assert!(!fixture.host.pump_frame(now));
    }
    assert_eq!(fixture.renderer.draw_count(), 1);
}

#[test]
fn keys_are_ignored_after_teardown() {
    let mut fixture = mount_loaded();
    fixture.host.key_down("Shift");
    fixture.host.teardown();

    assert!(!fixture.host.listeners_attached());
    assert!(fixture.host.key_down("ArrowDown").is_none());
    assert!(!fixture.host.input_state().shift_held);
    assert!(fixture.host.actor().is_none());
}

#[test]
fn completion_after_teardown_is_dropped() {
    let config = config();
    let gate = Arc::new(Semaphore::new(0));
    let mut source = SceneSource::new(&config);
    source.gate = Some(Arc::clone(&gate));
    let mut fixture = mount_with(config, source, ManualScheduler::new());

    fixture.host.teardown();
    let before = fixture.host.scene().object_count();
    gate.add_permits(3);
    std::thread::sleep(Duration::from_millis(100));

    assert_eq!(fixture.host.pump_assets(), 0);
    assert_eq!(fixture.host.scene().object_count(), before);
    assert!(fixture.host.actor().is_none());
}

#[test]
fn teardown_is_idempotent_and_drop_is_safe() {
    let mut fixture = mount();
    let renderer = fixture.renderer.clone();
    assert_eq!(fixture.host.teardown().len(), CONSTRUCTION_ORDER.len());
    assert!(fixture.host.teardown().is_empty());
    assert!(!fixture.host.is_mounted());
    drop(fixture);
    assert!(renderer.snapshot().disposed);
}

#[test]
fn drop_tears_down() {
    let fixture = mount();
    let renderer = fixture.renderer.clone();
    drop(fixture);
    assert!(renderer.snapshot().disposed);
}
