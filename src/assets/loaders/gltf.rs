//! glTF 2.0 model loader.
//!
//! Parses `.gltf` (JSON with external or data-URI buffers) and `.glb` files
//! into a [`Prefab`]: the node hierarchy with transforms, triangle positions
//! for each mesh, and every animation as a named [`AnimationClip`].
//!
//! Parsing is split in two phases. Buffer resolution is async (external
//! buffer files are read through a [`FileAssetReader`]), prefab building is
//! synchronous and touches no I/O.

use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::io::{FileAssetReader, decode_data_uri, is_data_uri};
use crate::assets::prefab::{Prefab, PrefabNode};
use crate::errors::{ProwlError, Result};
use crate::scene::color_from_hex;
use crate::scene::mesh::{Geometry, Material, Mesh};

/// Surface colour for imported meshes; materials are not carried over.
const IMPORTED_MESH_COLOR: u32 = 0xcccccc;

pub struct GltfLoader;

impl GltfLoader {
    /// Reads and parses the model at `uri` relative to `reader`'s root.
    pub async fn load(reader: &FileAssetReader, uri: &str) -> Result<Prefab> {
        let bytes = reader.read_bytes(uri).await?;
        let gltf = gltf::Gltf::from_slice_without_validation(&bytes)?;

        let sibling = reader.sibling_reader(uri);
        let mut buffers = Vec::with_capacity(gltf.buffers().count());
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => Self::blob(&gltf)?,
                gltf::buffer::Source::Uri(buffer_uri) => sibling.read_bytes(buffer_uri).await?,
            };
            buffers.push(data);
        }

        Self::build_prefab(&gltf, &buffers)
    }

    /// Parses a self-contained model (`.glb`, or `.gltf` with data URIs only).
    pub fn from_slice(bytes: &[u8]) -> Result<Prefab> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;

        let mut buffers = Vec::with_capacity(gltf.buffers().count());
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => Self::blob(&gltf)?,
                gltf::buffer::Source::Uri(uri) if is_data_uri(uri) => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => {
                    return Err(ProwlError::Gltf(format!(
                        "external buffer '{uri}' cannot be resolved without a reader"
                    )));
                }
            };
            buffers.push(data);
        }

        Self::build_prefab(&gltf, &buffers)
    }

    fn blob(gltf: &gltf::Gltf) -> Result<Vec<u8>> {
        gltf.blob
            .clone()
            .ok_or_else(|| ProwlError::Gltf("missing GLB binary chunk".to_string()))
    }

    fn build_prefab(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Prefab> {
        for (index, buffer) in gltf.buffers().enumerate() {
            let available = buffers.get(index).map_or(0, Vec::len);
            if available < buffer.length() {
                return Err(ProwlError::Gltf(format!(
                    "buffer {index} is {available} bytes, expected {}",
                    buffer.length()
                )));
            }
        }

        let mut prefab = Prefab::new();

        // Nodes first, so child indices line up with glTF node indices
        for node in gltf.nodes() {
            let mut prefab_node = PrefabNode::new(node_name(&node));
            let (t, r, s) = node.transform().decomposed();
            prefab_node.transform.position = Vec3::from_array(t);
            prefab_node.transform.rotation = Quat::from_array(r);
            prefab_node.transform.scale = Vec3::from_array(s);
            prefab_node.children_indices = node.children().map(|c| c.index()).collect();
            prefab_node.mesh = node.mesh().and_then(|mesh| Self::load_mesh(&mesh, buffers));
            prefab.push_node(prefab_node);
        }

        prefab.root_indices = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => scene.nodes().map(|n| n.index()).collect(),
            // No scene: every node without a parent is a root
            None => {
                let mut has_parent = vec![false; prefab.nodes.len()];
                for node in &prefab.nodes {
                    for &child in &node.children_indices {
                        if let Some(flag) = has_parent.get_mut(child) {
                            *flag = true;
                        }
                    }
                }
                (0..prefab.nodes.len()).filter(|&i| !has_parent[i]).collect()
            }
        };

        prefab.animations = Self::load_animations(gltf, buffers);

        log::debug!(
            "Parsed glTF: {} nodes, {} animations",
            prefab.nodes.len(),
            prefab.animations.len()
        );
        Ok(prefab)
    }

    /// Merges every triangle primitive of `mesh` into one position list.
    fn load_mesh(mesh: &gltf::Mesh, buffers: &[Vec<u8>]) -> Option<Mesh> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(iter) = reader.read_positions() else {
                continue;
            };
            let base = positions.len() as u32;
            positions.extend(iter.map(Vec3::from_array));
            let count = positions.len() as u32 - base;
            match reader.read_indices() {
                Some(read) => indices.extend(read.into_u32().map(|i| i + base)),
                None => indices.extend(base..base + count),
            }
        }

        if positions.is_empty() {
            return None;
        }

        let name = mesh.name().map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string);
        Some(Mesh::new(
            &name,
            Geometry::Imported {
                positions,
                indices: Some(indices),
            },
            Material::new_phong(color_from_hex(IMPORTED_MESH_COLOR)),
        ))
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<AnimationClip> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_name = node_name(&target.node());

                let Some(inputs) = reader.read_inputs() else {
                    log::warn!("Animation channel on '{node_name}' has no input keyframes");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let (target_path, data) = match reader.read_outputs() {
                    Some(ReadOutputs::Translations(iter)) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    Some(ReadOutputs::Rotations(iter)) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    Some(ReadOutputs::Scales(iter)) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    // Morph targets are not animated
                    Some(ReadOutputs::MorphTargetWeights(_)) => continue,
                    None => {
                        log::warn!("Animation channel on '{node_name}' has no output values");
                        continue;
                    }
                };

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            let name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            animations.push(AnimationClip::new(name, tracks));
        }

        animations
    }
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}
