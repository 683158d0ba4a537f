//! Configuration Tests
//!
//! Tests for:
//! - Reference-scene defaults
//! - Partial JSON overriding individual fields
//! - Load requests derived from asset entries
//! - Error reporting for malformed input

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use glam::Vec3;

use prowl::config::{AssetEntry, SceneConfig};
use prowl::errors::ProwlError;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[test]
fn defaults_describe_reference_scene() {
    let config = SceneConfig::default();

    assert_eq!(config.assets.len(), 2);
    assert_eq!(config.actor.url, "models/wolf/Wolf.glb");
    assert!(approx(config.actor.scale, 0.08));
    assert_eq!(config.actor.position, Vec3::new(30.0, 0.0, 0.0));
    assert_eq!(config.actor.clips.idle, "Wolf_Skeleton|Wolf_Idle_");
    assert_eq!(config.actor.clips.seat, "Wolf_Skeleton|Wolf_seat_");

    assert!(approx(config.locomotion.normal_speed, 2.0));
    assert!(approx(config.locomotion.fast_speed, 5.0));
    assert!(approx(config.animation.crossfade, 0.2));

    assert!(approx(config.camera.fov, 75.0));
    assert_eq!(config.camera.position, Vec3::new(20.0, 10.0, 50.0));
    assert!(approx(config.orbit.min_polar_angle, FRAC_PI_6));
    assert!(approx(config.orbit.max_polar_angle, FRAC_PI_2));
    assert!(approx(config.renderer.max_pixel_ratio, 2.0));

    assert_eq!(config.stage.stars.count, 10_000);
    assert_eq!(config.stage.ambient_light.color, 0x404040);
    assert!(approx(config.stage.ground_y, -0.5));
}

#[test]
fn empty_object_is_the_default() {
    let config = SceneConfig::from_json_str("{}").unwrap();
    assert_eq!(config, SceneConfig::default());
}

#[test]
fn partial_json_overrides_fields() {
    let json = r#"{
        "asset_root": "assets",
        "assets": [{ "url": "models/tree.glb", "position": [1.0, 0.0, -4.0] }],
        "locomotion": { "fast_speed": 8.0 },
        "actor": { "scale": 1.0, "clips": { "walk": "Walk" } },
        "stage": { "stars": { "count": 10 } }
    }"#;
    let config = SceneConfig::from_json_str(json).unwrap();

    assert_eq!(config.asset_root, std::path::PathBuf::from("assets"));
    assert_eq!(config.assets.len(), 1);
    assert!(approx(config.assets[0].scale, 1.0));
    assert_eq!(config.assets[0].rotation, None);

    assert!(approx(config.locomotion.fast_speed, 8.0));
    assert!(approx(config.locomotion.normal_speed, 2.0));

    assert!(approx(config.actor.scale, 1.0));
    assert_eq!(config.actor.url, "models/wolf/Wolf.glb");
    assert_eq!(config.actor.clips.walk, "Walk");
    assert_eq!(config.actor.clips.run, "Wolf_Skeleton|Wolf_Run_Cycle_");

    assert_eq!(config.stage.stars.count, 10);
    assert!(approx(config.stage.stars.spin_per_frame, 0.0005));
}

#[test]
fn asset_entry_becomes_load_request() {
    let entry = AssetEntry {
        url: "models/house2/City_House_2_BI.glb".into(),
        scale: 3.0,
        position: Vec3::new(18.0, 0.0, 0.0),
        rotation: Some(Vec3::new(FRAC_PI_2, PI, PI)),
    };
    let request = entry.to_request();
    assert_eq!(request.url, entry.url);
    assert!(approx(request.scale, 3.0));
    assert_eq!(request.position, entry.position);
    assert_eq!(request.rotation, entry.rotation);

    let actor = SceneConfig::default().actor.to_request();
    assert!(approx(actor.scale, 0.08));
}

#[test]
fn json_round_trip_preserves_config() {
    let mut config = SceneConfig::default();
    config.locomotion.fast_speed = 7.5;
    config.assets.pop();

    let json = config.to_json_string().unwrap();
    assert_eq!(SceneConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn malformed_json_is_a_config_error() {
    assert!(matches!(
        SceneConfig::from_json_str("{ \"assets\": 3 }"),
        Err(ProwlError::Config(_))
    ));
}

#[test]
fn load_reads_file_and_reports_missing() {
    let path = std::env::temp_dir().join(format!("prowl-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "camera": { "fov": 60.0 } }"#).unwrap();
    let config = SceneConfig::load(&path).unwrap();
    assert!(approx(config.camera.fov, 60.0));
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        SceneConfig::load("/nonexistent/prowl/scene.json"),
        Err(ProwlError::Io(_))
    ));
}
