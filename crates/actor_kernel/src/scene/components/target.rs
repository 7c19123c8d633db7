//! Target tag component

use crate::scene::{ActorContext, Capabilities, Component};

/// Grants the owner [`Capabilities::TARGET`] while attached
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetComponent;

impl Component for TargetComponent {
    fn on_attach(&mut self, ctx: &mut ActorContext<'_>) {
        ctx.add_capabilities(Capabilities::TARGET);
    }

    fn on_detach(&mut self, ctx: &mut ActorContext<'_>) {
        ctx.remove_capabilities(Capabilities::TARGET);
    }
}
