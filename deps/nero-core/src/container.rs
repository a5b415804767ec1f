use std::sync::Arc;
use serenity::builder::CreateApplicationCommands;
use tokio::sync::RwLock;

use crate::{Components, event::Router, Component};

/// # The component container
///
/// The component container stores components to route events to them.
#[derive(Clone, Default)]
pub struct ComponentContainer(Components);
pub type RefContainer = Arc<RwLock<ComponentContainer>>;

impl ComponentContainer {
    pub fn new() -> ComponentContainer {
        ComponentContainer(Vec::new())
    }
    /// Build the [`Router`] from the components in the container.
    /// Note that if new components are added to the container afterward, the router will not include them.
    pub fn get_router(&self) -> Router {
        Router::new(&self.0)
    }
    /// Add a component to the container.
    /// The component is embedded to an Arc pointer to be async compatible.
    pub fn add_component<T: 'static + Component>(&mut self, comp: T) -> Arc<T> {
        let arc = Arc::new(comp);
        let v = Arc::clone(&arc);
        self.0.push(v);
        arc
    }
    /// Collect the application commands declared by every component.
    pub fn declare_commands(&self, commands: &mut CreateApplicationCommands) {
        for comp in &self.0 {
            comp.declare(commands);
        }
    }
}
impl AsRef<Components> for ComponentContainer {
    fn as_ref(&self) -> &Components {
        &self.0
    }
}
