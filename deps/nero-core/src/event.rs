use std::collections::HashMap;

use serenity::{model::event::Event, client::Context, async_trait};
pub use serenity::prelude::RawEventHandler;
use crate::Components;

/// Kinds of gateway events a component can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    GuildCreate,
    ReactionAdd,
    InteractionCreate,
}

impl EventKind {
    /// Kind of a gateway event, `None` if no component can subscribe to it.
    pub fn of(event: &Event) -> Option<EventKind> {
        match event {
            Event::Ready(_) => Some(EventKind::Ready),
            Event::GuildCreate(_) => Some(EventKind::GuildCreate),
            Event::ReactionAdd(_) => Some(EventKind::ReactionAdd),
            Event::InteractionCreate(_) => Some(EventKind::InteractionCreate),
            _ => None,
        }
    }
}

/// # The component event trait.
///
/// Every component must implement this trait to receive gateway events from the [`Router`].
#[async_trait]
pub trait ComponentEvent: Sync + Send {
    /// Events the component wants to receive.
    fn subscriptions(&self) -> &'static [EventKind];
    async fn event(&self, ctx: &Context, event: &Event);
}

/// # The event router.
///
/// Table from event kind to the components subscribed to it, built once at startup.
/// Add it to the client to receive events.
///
/// See [`serenity::client::ClientBuilder::raw_event_handler()`] for more information.
pub struct Router {
    routes: HashMap<EventKind, Components>
}

impl Router {
    pub(crate) fn new(components: &Components) -> Self {
        let mut routes: HashMap<EventKind, Components> = HashMap::new();
        for comp in components {
            for kind in comp.subscriptions() {
                routes.entry(*kind).or_default().push(comp.clone());
            }
        }
        Self { routes }
    }
    /// Number of components subscribed to `kind`.
    pub fn subscribers(&self, kind: EventKind) -> usize {
        self.routes.get(&kind).map_or(0, |list| list.len())
    }
}

#[async_trait]
impl RawEventHandler for Router {
    async fn raw_event(&self, ctx: Context, ev: Event) {
        let Some(kind) = EventKind::of(&ev) else {
            return;
        };
        let Some(components) = self.routes.get(&kind) else {
            return;
        };
        for comp in components {
            comp.event(&ctx, &ev).await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use serenity::{async_trait, client::Context, model::event::Event};
    use crate::{ComponentContainer, ComponentDeclarative, ComponentEvent, EventKind};

    struct Listener(&'static [EventKind]);
    impl ComponentDeclarative for Listener {}
    #[async_trait]
    impl ComponentEvent for Listener {
        fn subscriptions(&self) -> &'static [EventKind] {
            self.0
        }
        async fn event(&self, _: &Context, _: &Event) {}
    }

    #[test]
    fn routes_by_subscription() {
        let mut container = ComponentContainer::new();
        container.add_component(Listener(&[EventKind::Ready, EventKind::ReactionAdd]));
        let shared: Arc<Listener> = container.add_component(Listener(&[EventKind::Ready]));
        assert_eq!(shared.0.len(), 1);

        let router = container.get_router();
        assert_eq!(router.subscribers(EventKind::Ready), 2);
        assert_eq!(router.subscribers(EventKind::ReactionAdd), 1);
        assert_eq!(router.subscribers(EventKind::InteractionCreate), 0);
    }
}
