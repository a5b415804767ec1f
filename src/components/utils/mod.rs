//! Fonctions utiles aux composants.

pub mod fuzzy;
