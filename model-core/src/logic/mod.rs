//! Core logic: feature schema and the flood model

pub mod features;
pub mod model;
