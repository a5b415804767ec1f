//! # Core library of Nero
//!
//! This library provides the plumbing shared by the bot components.
//!
//! ## Components system
//!
//! The bot is split into components. Each component manages its own data
//! and reacts to the Discord events it subscribes to.
//!
//! Each component must implement the [`Component`] trait, which is composed of two traits:
//! - [`ComponentEvent`] which declares the events the component listens to and handles them.
//! - [`ComponentDeclarative`] which declares the application commands of the component.
//!
//! Components are stored in a [`ComponentContainer`]. Once every component is added,
//! the container builds a [`Router`]: a table from event kind to subscribed components,
//! given to the serenity client as its raw event handler.
//!
//! [`Router`]: event::Router

pub mod command;
pub mod container;
pub mod declarative;
pub mod event;
pub mod message;
use std::sync::Arc;

pub use command::{ApplicationCommandEmbed, AutocompleteEmbed};
pub use container::ComponentContainer;
pub use declarative::ComponentDeclarative;
pub use event::{ComponentEvent, EventKind};

pub trait Component: ComponentDeclarative + ComponentEvent {}
impl<T: ComponentDeclarative + ComponentEvent> Component for T {}

pub type Components = Vec<Arc<dyn Component>>;
