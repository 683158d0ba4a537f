//! Headless Walk Example
//!
//! Mounts a session without a window, feeds it a scripted key sequence and
//! prints where the wolf ends up after every frame.
//!
//! The wolf is a small in-memory rig, so no model files are needed. Static
//! scenery requested by the default configuration fails to load and is
//! reported through the progress channel.
//!
//! Run with `RUST_LOG=debug` to follow crossfades and loader events.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use glam::{Quat, Vec3};
use prowl::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use prowl::assets::{Prefab, PrefabNode};
use prowl::config::{ClipNames, SceneConfig};
use prowl::errors::{ProwlError, Result};
use prowl::{HeadlessRenderer, ManualScheduler, ModelSource, MountTarget, SceneHost};

/// Serves a two-node wolf rig for the actor URL and nothing else.
struct DemoSource {
    actor_url: String,
    clips: ClipNames,
}

fn bob(name: &str, height: f32, period: f32) -> AnimationClip {
    let track = KeyframeTrack::new(
        vec![0.0, period * 0.5, period],
        vec![Vec3::ZERO, Vec3::new(0.0, height, 0.0), Vec3::ZERO],
        InterpolationMode::Linear,
    );
    let turn = KeyframeTrack::new(
        vec![0.0, period],
        vec![Quat::IDENTITY, Quat::from_rotation_z(0.1)],
        InterpolationMode::Linear,
    );
    AnimationClip::new(
        name,
        vec![
            Track {
                meta: TrackMeta {
                    node_name: "Spine".into(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(track),
            },
            Track {
                meta: TrackMeta {
                    node_name: "Spine".into(),
                    target: TargetPath::Rotation,
                },
                data: TrackData::Quaternion(turn),
            },
        ],
    )
}

impl ModelSource for DemoSource {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Prefab>> {
        if url != self.actor_url {
            let url = url.to_string();
            return async move { Err(ProwlError::AssetNotFound(url)) }.boxed();
        }

        let mut prefab = Prefab::new();
        let spine = prefab.push_node(PrefabNode::new("Spine"));
        let mut skeleton = PrefabNode::new("Wolf_Skeleton");
        skeleton.children_indices.push(spine);
        let root = prefab.push_node(skeleton);
        prefab.root_indices.push(root);
        prefab.animations = vec![
            bob(&self.clips.idle, 0.05, 2.0),
            bob(&self.clips.walk, 0.2, 1.0),
            bob(&self.clips.run, 0.4, 0.6),
            bob(&self.clips.seat, -0.3, 1.5),
        ];

        async move { Ok(prefab) }.boxed()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::default();
    let source = Arc::new(DemoSource {
        actor_url: config.actor.url.clone(),
        clips: config.actor.clips.clone(),
    });

    let renderer = HeadlessRenderer::new(1280, 720);
    let inspect = renderer.clone();
    let scheduler = ManualScheduler::new();

    let target = MountTarget::new(1280, 720).with_pixel_ratio(2.0);
    let mut host = SceneHost::mount_with_source(
        Some(&target),
        config,
        move |_| Ok(renderer),
        scheduler,
        source,
    )?;

    host.wait_for_assets(Duration::from_secs(5));
    for event in host.loader().progress().drain() {
        println!("loader: {event:?}");
    }

    let script: &[(&str, bool)] = &[
        ("ArrowRight", true),
        ("ArrowRight", true),
        ("Shift", true),
        ("ArrowUp", true),
        ("Shift", false),
        ("ArrowLeft", true),
        (" ", true),
        (" ", false),
        ("x", true),
    ];

    let mut now = Instant::now();
    for &(key, pressed) in script {
        if pressed {
            host.key_down(key);
        } else {
            host.key_up(key);
        }
        for _ in 0..15 {
            now += Duration::from_millis(16);
            host.pump_frame(now);
        }
        let current = host
            .actor()
            .and_then(|a| a.controller().current_name())
            .unwrap_or("-");
        println!(
            "{:>10} {:<5} position={:?} clip={current}",
            format!("{key:?}"),
            if pressed { "down" } else { "up" },
            host.actor_position().unwrap_or(Vec3::ZERO),
        );
    }

    let stages = host.unmount();
    let state = inspect.snapshot();
    println!(
        "drew {} frames at {:?}, released {stages:?}",
        state.draw_count,
        state.drawing_buffer_size()
    );

    Ok(())
}
