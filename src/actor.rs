use glam::Vec3;

use crate::animation::clip::AnimationClip;
use crate::animation::controller::AnimationController;
use crate::animation::mixer::ActionKey;
use crate::locomotion::Intent;
use crate::scene::{NodeHandle, Scene};

/// The user-driven creature: a loaded subtree plus its animation controller.
pub struct Actor {
    root: NodeHandle,
    controller: AnimationController,
    /// XYZ Euler angles of the root; movement only rewrites the Y angle.
    euler: Vec3,
}

impl Actor {
    /// Binds a fresh controller to `root`, registers every clip under its
    /// authored name and starts `idle_clip` looping if it is among them.
    ///
    /// `rotation` is the XYZ Euler rotation the root was placed with. A
    /// missing idle clip leaves the actor motionless with no active action.
    pub fn bind(
        root: NodeHandle,
        rotation: Vec3,
        clips: Vec<AnimationClip>,
        idle_clip: &str,
        crossfade: f32,
        scene: &Scene,
    ) -> Self {
        let mut controller = AnimationController::with_crossfade(root, crossfade);
        for clip in clips {
            let name = clip.name.clone();
            controller.register_clip(name, clip, scene);
        }

        if controller.activate(idle_clip, true).is_none() {
            log::info!("Actor has no '{idle_clip}' clip, starting without animation");
        }

        Self {
            root,
            controller,
            euler: rotation,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    /// Current yaw about +Y in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.euler.y
    }

    #[must_use]
    pub fn position(&self, scene: &Scene) -> Option<Vec3> {
        scene.get_node(self.root).map(|n| n.transform.position)
    }

    /// Applies `intent` immediately: moves and turns the root node, then
    /// crossfades to the requested clip.
    ///
    /// Returns the activated action, if any.
    pub fn apply(&mut self, intent: &Intent, scene: &mut Scene) -> Option<ActionKey> {
        if let Some(movement) = intent.movement {
            match scene.get_node_mut(self.root) {
                Some(node) => {
                    let t = &mut node.transform;
                    t.position += movement.delta;
                    self.euler.y = movement.yaw;
                    t.set_rotation_euler(self.euler.x, self.euler.y, self.euler.z);
                }
                None => log::warn!("Actor root node is gone, ignoring movement"),
            }
        }

        let request = intent.animation.as_ref()?;
        self.controller.activate(&request.clip, request.looping)
    }

    /// Steps the actor's animation by `dt` seconds.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        self.controller.advance(dt, scene);
    }
}
