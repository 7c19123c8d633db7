//! Mesh component
//!
//! Keeps a render proxy in the world's [`crate::render::RenderCollector`]
//! current with the owner's world matrix.

use crate::render::{ProxyId, RenderProxy};
use crate::scene::{ActorContext, Component};

/// Visual representation drawn by a named shader
#[derive(Debug, Clone)]
pub struct MeshComponent {
    shader: String,
    radius: f32,
    visible: bool,
    proxy: Option<ProxyId>,
}

impl MeshComponent {
    /// `radius` is the object-space bounding radius
    pub fn new(shader: impl Into<String>, radius: f32) -> Self {
        Self {
            shader: shader.into(),
            radius,
            visible: true,
            proxy: None,
        }
    }

    /// Render proxy, once attached
    pub fn proxy(&self) -> Option<ProxyId> {
        self.proxy
    }

    /// Current visibility
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the proxy
    pub fn set_visible(&mut self, ctx: &mut ActorContext<'_>, visible: bool) {
        self.visible = visible;
        if let Some(id) = self.proxy {
            ctx.render_mut().set_visible(id, visible);
        }
    }
}

impl Component for MeshComponent {
    fn on_attach(&mut self, ctx: &mut ActorContext<'_>) {
        let proxy = RenderProxy {
            owner: ctx.owner(),
            shader: self.shader.clone(),
            world_transform: *ctx.transform().world_transform(),
            radius: self.radius * ctx.scale(),
            visible: self.visible,
        };
        self.proxy = Some(ctx.render_mut().add_mesh(proxy));
    }

    fn on_detach(&mut self, ctx: &mut ActorContext<'_>) {
        if let Some(id) = self.proxy.take() {
            ctx.render_mut().remove_mesh(id);
        }
    }

    fn on_world_transform_changed(&mut self, ctx: &mut ActorContext<'_>) {
        if let Some(id) = self.proxy {
            let world_transform = *ctx.transform().world_transform();
            let radius = self.radius * ctx.scale();
            ctx.render_mut().update(id, world_transform, radius);
        }
    }
}
