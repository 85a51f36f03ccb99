//! Small geometric and naming helpers shared by the models and the engine.

pub mod geometry;
pub mod identifiers;
