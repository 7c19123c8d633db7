//! Collision world
//!
//! A flat registry of axis-aligned boxes owned by actors. There is no spatial
//! partitioning: the box count is small and queries are issued per shot, not
//! per pair per frame. Registration and removal are O(1) (append and
//! swap-remove inside the dense slot map).

use slotmap::{new_key_type, DenseSlotMap};

use super::collision::{aabb_aabb, segment_aabb, Aabb, LineSegment};
use crate::foundation::math::Vec3;
use crate::scene::{ActorId, Transform};

new_key_type! {
    /// Handle to a registered collidable box
    pub struct BoxId;
}

/// A registry entry: an object-space box and its world-space image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollidableBox {
    /// Box in the owner's object space
    pub object_box: Aabb,
    /// Box in world space, derived from `object_box` and the owner transform
    pub world_box: Aabb,
    /// Actor this box belongs to
    pub owner: ActorId,
    /// Whether the owner's rotation is applied when deriving `world_box`
    pub rotate_with_owner: bool,
}

impl CollidableBox {
    /// Create an entry whose world box is derived from `transform`
    pub fn new(owner: ActorId, object_box: Aabb, rotate_with_owner: bool, transform: &Transform) -> Self {
        let mut entry = Self {
            object_box,
            world_box: object_box,
            owner,
            rotate_with_owner,
        };
        entry.refresh(transform);
        entry
    }

    /// Recompute the world box: scale, then optionally rotate, then translate
    pub fn refresh(&mut self, transform: &Transform) {
        let scale = transform.scale();
        let mut world = Aabb::new(self.object_box.min * scale, self.object_box.max * scale);

        if self.rotate_with_owner {
            world.rotate(&transform.rotation());
        }

        let position = transform.position();
        world.min += position;
        world.max += position;
        self.world_box = world;
    }
}

/// Result of a successful segment cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// World-space point where the segment entered the box
    pub point: Vec3,
    /// Outward normal of the entered face
    pub normal: Vec3,
    /// Parametric position of the hit along the segment
    pub t: f32,
    /// Owner of the box that was hit
    pub actor: ActorId,
    /// The box that was hit
    pub box_id: BoxId,
}

/// Registry of collidable boxes answering segment casts
#[derive(Default)]
pub struct PhysWorld {
    boxes: DenseSlotMap<BoxId, CollidableBox>,
}

impl PhysWorld {
    /// Create an empty collision world
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a box
    pub fn add_box(&mut self, entry: CollidableBox) -> BoxId {
        let id = self.boxes.insert(entry);
        log::debug!("Registered collision box {:?} for actor {:?}", id, entry.owner);
        id
    }

    /// Deregister a box
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered. Removing a box twice is a lifecycle
    /// bug in the caller.
    pub fn remove_box(&mut self, id: BoxId) -> CollidableBox {
        match self.boxes.remove(id) {
            Some(entry) => {
                log::debug!("Removed collision box {:?} for actor {:?}", id, entry.owner);
                entry
            }
            None => panic!("remove_box: collision box {id:?} is not registered"),
        }
    }

    /// Look up a registered box
    pub fn get(&self, id: BoxId) -> Option<&CollidableBox> {
        self.boxes.get(id)
    }

    /// Re-derive a box's world box from its owner's transform
    pub fn refresh_box(&mut self, id: BoxId, transform: &Transform) {
        if let Some(entry) = self.boxes.get_mut(id) {
            entry.refresh(transform);
        }
    }

    /// Number of registered boxes
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True when no boxes are registered
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Iterate all registered boxes
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, &CollidableBox)> {
        self.boxes.iter()
    }

    /// Closest hit of `segment` against every registered box
    pub fn segment_cast(&self, segment: &LineSegment) -> Option<CollisionInfo> {
        self.segment_cast_filtered(segment, |_| true)
    }

    /// Closest hit of `segment` against boxes whose owner passes `filter`
    ///
    /// Every box is tested; the hit with the smallest `t` wins, so the result
    /// does not depend on registration order.
    pub fn segment_cast_filtered<F>(&self, segment: &LineSegment, filter: F) -> Option<CollisionInfo>
    where
        F: Fn(ActorId) -> bool,
    {
        let mut closest: Option<CollisionInfo> = None;

        for (box_id, entry) in &self.boxes {
            if !filter(entry.owner) {
                continue;
            }
            let Some(hit) = segment_aabb(segment, &entry.world_box) else {
                continue;
            };
            if closest.map_or(true, |best| hit.t < best.t) {
                closest = Some(CollisionInfo {
                    point: segment.point_on_segment(hit.t),
                    normal: hit.normal,
                    t: hit.t,
                    actor: entry.owner,
                    box_id,
                });
            }
        }

        closest
    }

    /// Report every overlapping pair of world boxes by brute force
    pub fn test_pairwise<F>(&self, mut on_overlap: F)
    where
        F: FnMut(ActorId, ActorId),
    {
        let entries: Vec<&CollidableBox> = self.boxes.values().collect();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if aabb_aabb(&a.world_box, &b.world_box) {
                    on_overlap(a.owner, b.owner);
                }
            }
        }
    }

    /// Report every overlapping pair of world boxes using sweep and prune on x
    pub fn test_sweep_and_prune<F>(&self, mut on_overlap: F)
    where
        F: FnMut(ActorId, ActorId),
    {
        let mut entries: Vec<&CollidableBox> = self.boxes.values().collect();
        entries.sort_by(|a, b| a.world_box.min.x.total_cmp(&b.world_box.min.x));

        for (i, a) in entries.iter().enumerate() {
            let max_x = a.world_box.max.x;
            for b in entries[i + 1..].iter().take_while(|b| b.world_box.min.x <= max_x) {
                if aabb_aabb(&a.world_box, &b.world_box) {
                    on_overlap(a.owner, b.owner);
                }
            }
        }
    }
}
