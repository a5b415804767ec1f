//! Module comportant les composants

mod misc;
pub use misc::*;
mod slash;
pub use slash::*;
pub mod starboard;
pub use starboard::Starboard;

// Fonctions utiles pour les composants
mod utils;
