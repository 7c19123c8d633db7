//! Render collaborator
//!
//! The kernel performs no drawing. Components with a visual representation
//! register a [`RenderProxy`] with the [`RenderCollector`], grouped by the
//! name of the shader that will draw them, and keep its world matrix current.
//! A renderer walks the groups each frame.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Mat4;
use crate::scene::ActorId;

new_key_type! {
    /// Handle to a registered render proxy
    pub struct ProxyId;
}

/// What a renderer needs to know about one visible object
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProxy {
    /// Actor the proxy belongs to
    pub owner: ActorId,
    /// Shader group the proxy is drawn with
    pub shader: String,
    /// World matrix of the owner
    pub world_transform: Mat4,
    /// Bounding radius in world units
    pub radius: f32,
    /// Whether the proxy should be drawn
    pub visible: bool,
}

/// Registry of render proxies grouped by shader
pub struct RenderCollector {
    proxies: SlotMap<ProxyId, RenderProxy>,
    groups: HashMap<String, Vec<ProxyId>>,
    view: Mat4,
}

impl Default for RenderCollector {
    fn default() -> Self {
        Self {
            proxies: SlotMap::with_key(),
            groups: HashMap::new(),
            view: Mat4::identity(),
        }
    }
}

impl RenderCollector {
    /// Create an empty collector with an identity view
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a proxy under its shader group
    pub fn add_mesh(&mut self, proxy: RenderProxy) -> ProxyId {
        let shader = proxy.shader.clone();
        let id = self.proxies.insert(proxy);
        self.groups.entry(shader).or_default().push(id);
        log::debug!("Added render proxy {:?}", id);
        id
    }

    /// Deregister a proxy
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn remove_mesh(&mut self, id: ProxyId) -> RenderProxy {
        let Some(proxy) = self.proxies.remove(id) else {
            panic!("remove_mesh: render proxy {id:?} is not registered");
        };
        if let Some(group) = self.groups.get_mut(&proxy.shader) {
            if let Some(index) = group.iter().position(|&p| p == id) {
                group.swap_remove(index);
            }
            if group.is_empty() {
                self.groups.remove(&proxy.shader);
            }
        }
        log::debug!("Removed render proxy {:?}", id);
        proxy
    }

    /// Refresh a proxy's world matrix and bounding radius
    pub fn update(&mut self, id: ProxyId, world_transform: Mat4, radius: f32) {
        if let Some(proxy) = self.proxies.get_mut(id) {
            proxy.world_transform = world_transform;
            proxy.radius = radius;
        }
    }

    /// Show or hide a proxy
    pub fn set_visible(&mut self, id: ProxyId, visible: bool) {
        if let Some(proxy) = self.proxies.get_mut(id) {
            proxy.visible = visible;
        }
    }

    /// Look up a proxy
    pub fn get(&self, id: ProxyId) -> Option<&RenderProxy> {
        self.proxies.get(id)
    }

    /// Every proxy drawn with `shader`
    pub fn group<'a>(&'a self, shader: &str) -> impl Iterator<Item = &'a RenderProxy> + 'a {
        self.groups
            .get(shader)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.proxies.get(id))
    }

    /// Visible proxies drawn with `shader`
    pub fn visible<'a>(&'a self, shader: &str) -> impl Iterator<Item = &'a RenderProxy> + 'a {
        self.group(shader).filter(|proxy| proxy.visible)
    }

    /// Names of all shader groups with at least one proxy
    pub fn shaders(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of registered proxies
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Whether no proxies are registered
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Replace the camera view
    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    /// The last view matrix published by a camera
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }
}
