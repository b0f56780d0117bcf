//! Captions API data models.

pub mod probe;
pub mod transcript;
