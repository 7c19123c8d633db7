//! Collision box component
//!
//! Registers an axis-aligned box with the world's [`crate::physics::PhysWorld`]
//! while attached and keeps its world-space box in step with the owner's
//! transform.

use crate::physics::collision::Aabb;
use crate::physics::{BoxId, CollidableBox};
use crate::scene::{ActorContext, Component};

/// Owner-relative collision box
#[derive(Debug, Clone)]
pub struct BoxComponent {
    object_box: Aabb,
    rotate_with_owner: bool,
    box_id: Option<BoxId>,
}

impl BoxComponent {
    /// Create a box in the owner's object space
    pub fn new(object_box: Aabb) -> Self {
        Self {
            object_box,
            rotate_with_owner: true,
            box_id: None,
        }
    }

    /// Builder pattern: ignore the owner's rotation
    pub fn without_rotation(mut self) -> Self {
        self.rotate_with_owner = false;
        self
    }

    /// Registry handle while attached
    pub fn box_id(&self) -> Option<BoxId> {
        self.box_id
    }

    /// Box in the owner's object space
    pub fn object_box(&self) -> &Aabb {
        &self.object_box
    }
}

impl Component for BoxComponent {
    fn on_attach(&mut self, ctx: &mut ActorContext<'_>) {
        let entry = CollidableBox::new(ctx.owner(), self.object_box, self.rotate_with_owner, ctx.transform());
        self.box_id = Some(ctx.phys_mut().add_box(entry));
    }

    fn on_detach(&mut self, ctx: &mut ActorContext<'_>) {
        if let Some(id) = self.box_id.take() {
            ctx.phys_mut().remove_box(id);
        }
    }

    fn on_world_transform_changed(&mut self, ctx: &mut ActorContext<'_>) {
        if let Some(id) = self.box_id {
            let transform = ctx.transform().clone();
            ctx.phys_mut().refresh_box(id, &transform);
        }
    }
}
