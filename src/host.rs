//! Session orchestration.
//!
//! [`SceneHost`] builds a session in a fixed order (scene, camera, renderer,
//! camera controls, lights, helpers, ground, asset loads, render loop,
//! input listeners) and tears it down in exactly the reverse order. Between
//! those two points it routes host events: keys go to the locomotion
//! controller, resizes update camera and renderer together, asset
//! completions are applied between frames, and due frames run one step.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Affine3A, Quat, Vec2, Vec3};
use rand::Rng;

use crate::actor::Actor;
use crate::assets::loader::{AssetLoader, FileModelSource, LoadId, LoadedModel, ModelSource};
use crate::config::{SceneConfig, StageConfig};
use crate::controls::OrbitControls;
use crate::errors::{ProwlError, Result};
use crate::input::{InputState, Key, PointerButton, PointerState};
use crate::locomotion::{Intent, LocomotionController};
use crate::render::Renderer;
use crate::render_loop::{FrameScheduler, FrameToken, LoopHandle, RenderLoop};
use crate::scene::{Camera, Geometry, Light, Material, Mesh, NodeHandle, Scene, color_from_hex};

/// Region the renderer draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountTarget {
    /// Logical size.
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl MountTarget {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    #[must_use]
    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    fn validate(target: Option<&Self>) -> Result<&Self> {
        let target = target.ok_or(ProwlError::MountTargetMissing)?;
        if target.width == 0 || target.height == 0 {
            return Err(ProwlError::InvalidMountTarget {
                width: target.width,
                height: target.height,
            });
        }
        Ok(target)
    }

    fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// One step of session construction; teardown visits them in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountStage {
    Scene,
    Camera,
    Renderer,
    Controls,
    Lights,
    Helpers,
    Ground,
    AssetLoads,
    RenderLoop,
    Listeners,
}

/// Nodes created for the static stage.
#[derive(Debug, Clone, Copy)]
pub struct StageNodes {
    pub stars: NodeHandle,
    pub directional_light: NodeHandle,
    pub ambient_light: NodeHandle,
    pub grid: NodeHandle,
    pub axes: NodeHandle,
    pub ground: NodeHandle,
}

pub struct SceneHost {
    config: SceneConfig,
    stages: Vec<MountStage>,

    scene: Scene,
    camera: Camera,
    renderer: Box<dyn Renderer>,
    controls: OrbitControls,
    pointer: PointerState,
    stage: StageNodes,

    loader: AssetLoader,
    actor_load: Option<LoadId>,
    actor: Option<Actor>,
    locomotion: LocomotionController,

    scheduler: Box<dyn FrameScheduler>,
    render_loop: RenderLoop,
    loop_handle: Option<LoopHandle>,

    listeners_attached: bool,
}

impl SceneHost {
    /// Mounts a session reading models from `config.asset_root`.
    pub fn mount<R, F, S>(
        target: Option<&MountTarget>,
        config: SceneConfig,
        create_renderer: F,
        scheduler: S,
    ) -> Result<Self>
    where
        R: Renderer + 'static,
        F: FnOnce(&MountTarget) -> Result<R>,
        S: FrameScheduler + 'static,
    {
        let source = Arc::new(FileModelSource::new(&config.asset_root));
        Self::mount_with_source(target, config, create_renderer, scheduler, source)
    }

    /// Mounts a session loading models through `source`.
    ///
    /// Fails with [`ProwlError::MountTargetMissing`] or
    /// [`ProwlError::InvalidMountTarget`] before any renderer is created.
    pub fn mount_with_source<R, F, S>(
        target: Option<&MountTarget>,
        config: SceneConfig,
        create_renderer: F,
        scheduler: S,
        source: Arc<dyn ModelSource>,
    ) -> Result<Self>
    where
        R: Renderer + 'static,
        F: FnOnce(&MountTarget) -> Result<R>,
        S: FrameScheduler + 'static,
    {
        let target = MountTarget::validate(target)?;
        let mut stages = Vec::with_capacity(10);

        let mut scene = Scene::new();
        stages.push(MountStage::Scene);

        let cam = &config.camera;
        let mut camera = Camera::new_perspective(cam.fov, target.aspect(), cam.near, cam.far);
        camera.transform.position = cam.position;
        stages.push(MountStage::Camera);

        let mut renderer: Box<dyn Renderer> = Box::new(create_renderer(target)?);
        renderer.set_pixel_ratio(target.device_pixel_ratio.min(config.renderer.max_pixel_ratio));
        renderer.resize(target.width, target.height);
        renderer.set_clear_color(color_from_hex(config.renderer.clear_color));
        stages.push(MountStage::Renderer);

        let orbit = &config.orbit;
        let mut controls = OrbitControls::from_position(cam.position, orbit.target);
        controls.enable_damping = orbit.enable_damping;
        controls.damping_factor = orbit.damping_factor;
        controls.enable_zoom = orbit.enable_zoom;
        controls.set_polar_range(orbit.min_polar_angle, orbit.max_polar_angle);
        let mut pointer = PointerState::new();
        pointer.handle_resize(target.width, target.height);
        stages.push(MountStage::Controls);

        let (directional_light, ambient_light) = add_lights(&mut scene, &config.stage);
        let stars = add_star_field(&mut scene, &config.stage);
        stages.push(MountStage::Lights);

        let (grid, axes) = add_helpers(&mut scene, &config.stage);
        stages.push(MountStage::Helpers);

        let ground = add_ground(&mut scene, &config.stage);
        stages.push(MountStage::Ground);

        let mut loader = AssetLoader::new(source)?;
        for entry in &config.assets {
            loader.load(entry.to_request());
        }
        let actor_load = Some(loader.load(config.actor.to_request()));
        stages.push(MountStage::AssetLoads);

        let mut scheduler: Box<dyn FrameScheduler> = Box::new(scheduler);
        let mut render_loop = RenderLoop::new();
        let loop_handle = Some(render_loop.start(scheduler.as_mut()));
        stages.push(MountStage::RenderLoop);

        let locomotion = LocomotionController::new(config.locomotion, config.actor.clips.clone());
        stages.push(MountStage::Listeners);

        log::info!(
            "Scene mounted at {}x{} ({} models requested)",
            target.width,
            target.height,
            config.assets.len() + 1
        );

        Ok(Self {
            config,
            stages,
            scene,
            camera,
            renderer,
            controls,
            pointer,
            stage: StageNodes {
                stars,
                directional_light,
                ambient_light,
                grid,
                axes,
                ground,
            },
            loader,
            actor_load,
            actor: None,
            locomotion,
            scheduler,
            render_loop,
            loop_handle,
            listeners_attached: true,
        })
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Handles a key press identified the DOM way (`"ArrowUp"`, `" "`, `"a"`).
    ///
    /// The resulting intent is applied to the actor before returning.
    /// Returns `None` once listeners are detached.
    pub fn key_down(&mut self, key: &str) -> Option<Intent> {
        if !self.listeners_attached {
            return None;
        }
        let key = Key::parse(key);
        let intent = self.locomotion.key_down(&key, self.actor.is_some());
        if let Some(actor) = self.actor.as_mut() {
            actor.apply(&intent, &mut self.scene);
        }
        Some(intent)
    }

    pub fn key_up(&mut self, key: &str) {
        if !self.listeners_attached {
            return;
        }
        self.locomotion.key_up(&Key::parse(key));
    }

    /// Updates camera aspect and renderer viewport in one call, so the next
    /// frame sees both or neither.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.listeners_attached {
            return;
        }
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        self.camera.set_aspect(width as f32 / height as f32);
        self.renderer.resize(width, height);
        self.pointer.handle_resize(width, height);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.listeners_attached {
            self.pointer.handle_cursor_move(x, y);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer.handle_cursor_left();
    }

    pub fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        if self.listeners_attached {
            self.pointer.handle_button(button, pressed);
        }
    }

    pub fn wheel(&mut self, lines: Vec2) {
        if self.listeners_attached {
            self.pointer.handle_wheel(lines);
        }
    }

    // ========================================================================
    // Assets
    // ========================================================================

    /// Applies finished asset loads. Returns how many models were inserted.
    pub fn pump_assets(&mut self) -> usize {
        let loaded = self.loader.poll(&mut self.scene);
        self.accept_models(loaded)
    }

    /// Blocks until every requested model has settled or `timeout` passes.
    pub fn wait_for_assets(&mut self, timeout: Duration) -> usize {
        let loaded = self.loader.wait_until_settled(&mut self.scene, timeout);
        self.accept_models(loaded)
    }

    fn accept_models(&mut self, loaded: Vec<LoadedModel>) -> usize {
        let count = loaded.len();
        for model in loaded {
            if self.actor_load != Some(model.id) {
                continue;
            }
            let rotation = self.config.actor.rotation.unwrap_or(Vec3::ZERO);
            let actor = Actor::bind(
                model.root,
                rotation,
                model.animations,
                &self.config.actor.clips.idle,
                self.config.animation.crossfade,
                &self.scene,
            );
            log::info!("Actor ready: '{}'", model.url);
            self.actor = Some(actor);
        }
        count
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Runs the next due frame, if the scheduler has one.
    pub fn pump_frame(&mut self, now: Instant) -> bool {
        match self.scheduler.take_due() {
            Some(token) => self.on_frame(token, now),
            None => false,
        }
    }

    /// Runs one step for `token`; stale tokens are ignored.
    pub fn on_frame(&mut self, token: FrameToken, now: Instant) -> bool {
        let Self {
            scene,
            camera,
            renderer,
            controls,
            pointer,
            stage,
            actor,
            config,
            scheduler,
            render_loop,
            ..
        } = self;

        let spin = config.stage.stars.spin_per_frame;
        render_loop.on_frame(token, now, scheduler.as_mut(), |dt| {
            if let Some(actor) = actor.as_mut() {
                actor.advance(dt, scene);
            }

            if let Some(stars) = scene.get_node_mut(stage.stars) {
                let t = &mut stars.transform;
                t.rotation = (Quat::from_rotation_y(spin) * t.rotation).normalize();
            }

            let fov = camera.fov.to_degrees();
            controls.update(&mut camera.transform, pointer, fov, dt);
            pointer.end_frame();
            camera.update_view_matrix();

            scene.update_matrix_world();
            renderer.draw(scene, camera);
        })
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Tears the session down in reverse construction order and returns the
    /// stages in the order they were released. Idempotent.
    pub fn teardown(&mut self) -> Vec<MountStage> {
        let mut released = Vec::with_capacity(self.stages.len());
        while let Some(stage) = self.stages.pop() {
            match stage {
                MountStage::Listeners => {
                    self.listeners_attached = false;
                    self.locomotion.reset();
                }
                MountStage::RenderLoop => {
                    if let Some(handle) = self.loop_handle.take() {
                        self.render_loop.stop(handle, self.scheduler.as_mut());
                    }
                }
                MountStage::AssetLoads => {
                    self.loader.dispose();
                    if let Some(actor) = self.actor.as_mut() {
                        actor.controller_mut().stop_all();
                    }
                    self.actor = None;
                    self.actor_load = None;
                }
                MountStage::Ground => self.scene.remove_node(self.stage.ground),
                MountStage::Helpers => {
                    self.scene.remove_node(self.stage.grid);
                    self.scene.remove_node(self.stage.axes);
                }
                MountStage::Lights => {
                    self.scene.remove_node(self.stage.stars);
                    self.scene.remove_node(self.stage.directional_light);
                    self.scene.remove_node(self.stage.ambient_light);
                }
                MountStage::Controls => self.pointer.reset(),
                MountStage::Renderer => self.renderer.dispose(),
                MountStage::Camera => {}
                MountStage::Scene => self.scene = Scene::new(),
            }
            log::debug!("Released {stage:?}");
            released.push(stage);
        }
        if !released.is_empty() {
            log::info!("Scene unmounted");
        }
        released
    }

    /// Consumes the host, tearing it down.
    pub fn unmount(mut self) -> Vec<MountStage> {
        self.teardown()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Stages currently alive, in construction order.
    #[must_use]
    pub fn stages(&self) -> &[MountStage] {
        &self.stages
    }

    #[must_use]
    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    #[must_use]
    pub fn stage_nodes(&self) -> &StageNodes {
        &self.stage
    }

    #[must_use]
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    #[must_use]
    pub fn actor_position(&self) -> Option<Vec3> {
        self.actor.as_ref().and_then(|a| a.position(&self.scene))
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        self.locomotion.state()
    }

    #[must_use]
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    #[must_use]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn add_lights(scene: &mut Scene, stage: &StageConfig) -> (NodeHandle, NodeHandle) {
    let d = &stage.directional_light;
    let directional = scene.add_light(
        "DirectionalLight",
        Light::new_directional(color_from_hex(d.color), d.intensity),
    );
    if let Some(node) = scene.get_node_mut(directional) {
        node.transform.position = stage.directional_position.normalize_or_zero();
    }

    let a = &stage.ambient_light;
    let ambient = scene.add_light(
        "AmbientLight",
        Light::new_ambient(color_from_hex(a.color), a.intensity),
    );
    (directional, ambient)
}

fn add_star_field(scene: &mut Scene, stage: &StageConfig) -> NodeHandle {
    let stars = &stage.stars;
    let extent = stars.extent.abs();
    let mut rng = rand::thread_rng();
    let instances: Vec<Affine3A> = (0..stars.count)
        .map(|_| {
            Affine3A::from_translation(Vec3::new(
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
            ))
        })
        .collect();

    scene.add_mesh(Mesh::new_instanced(
        "Stars",
        Geometry::Sphere {
            radius: stars.radius,
            width_segments: 8,
            height_segments: 8,
        },
        Material::new_basic(color_from_hex(stars.color)),
        instances,
    ))
}

fn add_helpers(scene: &mut Scene, stage: &StageConfig) -> (NodeHandle, NodeHandle) {
    let grid = scene.add_mesh(Mesh::new(
        "GridHelper",
        Geometry::GridHelper {
            size: stage.grid_size,
            divisions: stage.grid_divisions,
        },
        Material::new_basic(color_from_hex(0x888888)),
    ));
    let axes = scene.add_mesh(Mesh::new(
        "AxesHelper",
        Geometry::AxesHelper {
            size: stage.axes_size,
        },
        Material::new_basic(Vec3::ONE),
    ));
    (grid, axes)
}

fn add_ground(scene: &mut Scene, stage: &StageConfig) -> NodeHandle {
    let ground = scene.add_mesh(Mesh::new(
        "Ground",
        Geometry::Plane {
            width: stage.ground_size,
            height: stage.ground_size,
        },
        Material::new_phong(color_from_hex(stage.ground_color)),
    ));
    if let Some(node) = scene.get_node_mut(ground) {
        node.transform.set_rotation_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        node.transform.position.y = stage.ground_y;
    }
    ground
}
