//! Data-driven scene configuration.
//!
//! Every field has a default matching the reference scene, so an empty JSON
//! object (`{}`) is a valid configuration. Vectors are `[x, y, z]` arrays.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::loader::LoadRequest;
use crate::errors::Result;

/// A static model placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub url: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    #[serde(default)]
    pub rotation: Option<Vec3>,
}

const fn default_scale() -> f32 {
    1.0
}

impl AssetEntry {
    #[must_use]
    pub fn to_request(&self) -> LoadRequest {
        LoadRequest {
            url: self.url.clone(),
            scale: self.scale,
            position: self.position,
            rotation: self.rotation,
        }
    }
}

/// Names of the clips the locomotion controller selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipNames {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub seat: String,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            idle: "Wolf_Skeleton|Wolf_Idle_".to_string(),
            walk: "Wolf_Skeleton|Wolf_Walk_cycle_".to_string(),
            run: "Wolf_Skeleton|Wolf_Run_Cycle_".to_string(),
            seat: "Wolf_Skeleton|Wolf_seat_".to_string(),
        }
    }
}

/// The user-driven model and the clips it is expected to carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub url: String,
    pub scale: f32,
    pub position: Vec3,
    pub rotation: Option<Vec3>,
    pub clips: ClipNames,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            url: "models/wolf/Wolf.glb".to_string(),
            scale: 0.08,
            position: Vec3::new(30.0, 0.0, 0.0),
            rotation: None,
            clips: ClipNames::default(),
        }
    }
}

impl ActorConfig {
    #[must_use]
    pub fn to_request(&self) -> LoadRequest {
        LoadRequest {
            url: self.url.clone(),
            scale: self.scale,
            position: self.position,
            rotation: self.rotation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    pub normal_speed: f32,
    pub fast_speed: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            normal_speed: 2.0,
            fast_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Crossfade duration in seconds.
    pub crossfade: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            crossfade: crate::animation::CROSSFADE_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(20.0, 10.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.25,
            enable_zoom: true,
            min_polar_angle: FRAC_PI_6,
            max_polar_angle: FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    pub count: usize,
    pub radius: f32,
    /// Stars are scattered uniformly in `[-extent, extent]` on each axis.
    pub extent: f32,
    pub color: u32,
    /// Y rotation applied per frame, in radians.
    pub spin_per_frame: f32,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            radius: 0.1,
            extent: 100.0,
            color: 0xffffff,
            spin_per_frame: 0.0005,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub stars: StarFieldConfig,
    pub directional_light: LightConfig,
    /// Direction the directional light shines from; normalized on use.
    pub directional_position: Vec3,
    pub ambient_light: LightConfig,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub axes_size: f32,
    pub ground_size: f32,
    pub ground_color: u32,
    pub ground_y: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            stars: StarFieldConfig::default(),
            directional_light: LightConfig {
                color: 0xffffff,
                intensity: 4.0,
            },
            directional_position: Vec3::ONE,
            ambient_light: LightConfig {
                color: 0x404040,
                intensity: 2.0,
            },
            grid_size: 200.0,
            grid_divisions: 200,
            axes_size: 200.0,
            ground_size: 200.0,
            ground_color: 0x808080,
            ground_y: -0.5,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub max_pixel_ratio: f32,
    pub clear_color: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            clear_color: 0x000000,
        }
    }
}

/// Complete description of a session's scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory every asset URL is resolved against.
    pub asset_root: PathBuf,
    pub assets: Vec<AssetEntry>,
    pub actor: ActorConfig,
    pub locomotion: LocomotionSettings,
    pub animation: AnimationSettings,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub stage: StageConfig,
    pub renderer: RendererConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("public"),
            assets: vec![
                AssetEntry {
                    url: "models/house1/Big_Old_House.glb".to_string(),
                    scale: 0.035,
                    position: Vec3::new(2.0, 0.0, 0.0),
                    rotation: None,
                },
                AssetEntry {
                    url: "models/house2/City_House_2_BI.glb".to_string(),
                    scale: 3.0,
                    position: Vec3::new(18.0, 0.0, 0.0),
                    rotation: Some(Vec3::new(FRAC_PI_2, PI, PI)),
                },
            ],
            actor: ActorConfig::default(),
            locomotion: LocomotionSettings::default(),
            animation: AnimationSettings::default(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            stage: StageConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded scene configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
