//! Assign tutees to tutors with a capacity-aware stable matching driven by
//! weekly availability.

pub mod algos;
pub mod assignments;
pub mod checks;
pub mod config;
pub mod display;
pub mod export;
pub mod loaders;
pub mod model;
pub mod stats;
