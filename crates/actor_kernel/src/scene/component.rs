//! Component trait
//!
//! A component is a unit of behavior attached to one actor. Every hook is a
//! no-op by default; concrete components override only what they need. Hooks
//! receive an [`ActorContext`], which is the component's view of its owner
//! and of the world.

use std::any::Any;

use super::context::ActorContext;
use crate::input::InputState;

/// Update order used when a component does not choose one
pub const DEFAULT_UPDATE_ORDER: i32 = 100;

/// Identifier of an attached component, unique within a [`super::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

/// Upcast to [`Any`] for typed component access
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-actor behavior
///
/// Within one actor, components run in ascending [`Component::update_order`];
/// equal orders run in attachment order.
pub trait Component: AsAny + 'static {
    /// Lower runs earlier
    fn update_order(&self) -> i32 {
        DEFAULT_UPDATE_ORDER
    }

    /// Called once when attached, before the first input or update call
    fn on_attach(&mut self, _ctx: &mut ActorContext<'_>) {}

    /// Called once when detached or when the owner is destroyed
    fn on_detach(&mut self, _ctx: &mut ActorContext<'_>) {}

    /// Read the frame's input snapshot
    fn process_input(&mut self, _ctx: &mut ActorContext<'_>, _input: &InputState) {}

    /// Advance by `delta_time` seconds
    fn update(&mut self, _ctx: &mut ActorContext<'_>, _delta_time: f32) {}

    /// The owner's world matrix was recomputed
    fn on_world_transform_changed(&mut self, _ctx: &mut ActorContext<'_>) {}
}

impl dyn Component {
    /// Downcast to a concrete component type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcast to a concrete component type
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

/// A component stored in its owner's ordered list
pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) order: i32,
    pub(crate) component: Box<dyn Component>,
}

/// Insert keeping ascending order; equal orders keep attachment order
pub(crate) fn insert_sorted(slots: &mut Vec<ComponentSlot>, slot: ComponentSlot) {
    let index = slots.partition_point(|existing| existing.order <= slot.order);
    slots.insert(index, slot);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(i32);

    impl Component for Probe {
        fn update_order(&self) -> i32 {
            self.0
        }
    }

    struct Other;

    impl Component for Other {}

    fn slot(id: u64, order: i32) -> ComponentSlot {
        ComponentSlot {
            id: ComponentId(id),
            order,
            component: Box::new(Probe(order)),
        }
    }

    #[test]
    fn test_insert_sorted_ties_keep_attachment_order() {
        let mut slots = Vec::new();
        for (id, order) in [(0, 100), (1, 10), (2, 100), (3, 200), (4, 10)] {
            insert_sorted(&mut slots, slot(id, order));
        }
        let ids: Vec<u64> = slots.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn test_downcast() {
        let boxed: Box<dyn Component> = Box::new(Probe(7));
        assert_eq!(boxed.downcast_ref::<Probe>().map(|p| p.0), Some(7));
        assert!(boxed.downcast_ref::<Other>().is_none());
        assert_eq!(boxed.update_order(), 7);
        assert_eq!(Other.update_order(), DEFAULT_UPDATE_ORDER);
    }
}
