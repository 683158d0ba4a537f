use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionKey;
}

/// A property value in the form it is blended.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PropertyValue {
    Vector(Vec3),
    Rotation(Quat),
}

/// Running weighted sum for one (node, property) pair.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    value: PropertyValue,
    weight: f32,
}

impl Accumulator {
    fn accumulate(&mut self, incoming: TrackValue, weight: f32) {
        let total = self.weight + weight;
        match (&mut self.value, incoming) {
            (PropertyValue::Vector(sum), TrackValue::Vector3(v)) => *sum += v * weight,
            // Incremental slerp keeps the running result a unit quaternion
            (PropertyValue::Rotation(q), TrackValue::Quaternion(r)) => {
                if total > 0.0 {
                    *q = q.slerp(r, weight / total);
                }
            }
            _ => return,
        }
        self.weight = total;
    }

    /// Final value, mixing in `rest` when the total weight is below one.
    fn resolve(&self, rest: Option<PropertyValue>) -> PropertyValue {
        let w = self.weight;
        match (self.value, rest) {
            (PropertyValue::Vector(sum), Some(PropertyValue::Vector(r))) if w < 1.0 => {
                PropertyValue::Vector(sum + r * (1.0 - w))
            }
            (PropertyValue::Rotation(q), Some(PropertyValue::Rotation(r))) if w < 1.0 => {
                PropertyValue::Rotation(r.slerp(q, w))
            }
            (PropertyValue::Vector(sum), _) if w > 0.0 && (w - 1.0).abs() > f32::EPSILON => {
                PropertyValue::Vector(sum / w)
            }
            (value, _) => value,
        }
    }
}

/// Evaluates any number of actions against one rig and writes the blended
/// pose into the scene.
pub struct AnimationMixer {
    actions: SlotMap<ActionKey, AnimationAction>,
    /// Bind pose of every property some action has been bound to.
    rest_pose: FxHashMap<(NodeHandle, TargetPath), PropertyValue>,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: SlotMap::with_key(),
            rest_pose: FxHashMap::default(),
        }
    }

    /// Adds an action, capturing the current pose of its bound properties
    /// as rest pose if they were not seen before.
    pub fn add_action(&mut self, action: AnimationAction, scene: &Scene) -> ActionKey {
        for binding in &action.bindings {
            let key = (binding.node_handle, binding.target);
            if self.rest_pose.contains_key(&key) {
                continue;
            }
            let Some(node) = scene.get_node(binding.node_handle) else {
                continue;
            };
            let t = &node.transform;
            let value = match binding.target {
                TargetPath::Translation => PropertyValue::Vector(t.position),
                TargetPath::Rotation => PropertyValue::Rotation(t.rotation),
                TargetPath::Scale => PropertyValue::Vector(t.scale),
            };
            self.rest_pose.insert(key, value);
        }
        self.actions.insert(action)
    }

    /// Creates an action for `clip` with pre-resolved bindings.
    pub fn clip_action(
        &mut self,
        clip: Arc<AnimationClip>,
        bindings: Vec<PropertyBinding>,
        scene: &Scene,
    ) -> ActionKey {
        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        self.add_action(action, scene)
    }

    pub fn remove_action(&mut self, key: ActionKey) -> Option<AnimationAction> {
        self.actions.remove(key)
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn action_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionKey, &AnimationAction)> {
        self.actions.iter()
    }

    /// Number of actions currently contributing to the pose.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.actions.values().filter(|a| a.is_running()).count()
    }

    pub fn stop_all(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advances every action by `dt` seconds and applies the blended pose.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        let mut accumulators: FxHashMap<(NodeHandle, TargetPath), Accumulator> =
            FxHashMap::default();

        for action in self.actions.values_mut() {
            action.update(dt);
            if !action.is_running() {
                continue;
            }
            let weight = action.weight;

            for i in 0..action.bindings.len() {
                let binding = &action.bindings[i];
                let key = (binding.node_handle, binding.target);
                let track_index = binding.track_index;
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };
                let entry = accumulators.entry(key).or_insert(Accumulator {
                    value: match value {
                        TrackValue::Vector3(_) => PropertyValue::Vector(Vec3::ZERO),
                        TrackValue::Quaternion(q) => PropertyValue::Rotation(q),
                    },
                    weight: 0.0,
                });
                entry.accumulate(value, weight);
            }
        }

        for ((node_handle, target), acc) in accumulators {
            let rest = self.rest_pose.get(&(node_handle, target)).copied();
            let Some(node) = scene.get_node_mut(node_handle) else {
                continue;
            };
            match (target, acc.resolve(rest)) {
                (TargetPath::Translation, PropertyValue::Vector(v)) => node.transform.position = v,
                (TargetPath::Scale, PropertyValue::Vector(v)) => node.transform.scale = v,
                (TargetPath::Rotation, PropertyValue::Rotation(q)) => node.transform.rotation = q,
                _ => {}
            }
        }
    }
}
