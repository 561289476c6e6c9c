//! HTTP handlers

pub mod health;
pub mod locations;
pub mod model_info;
pub mod predict;
pub mod regions;
