//! Safe Meal: allergy-aware meal checks and restaurant finding for pilgrims
//! in Makkah.
//!
//! The restaurant [`registry`] and its name resolver are the local core;
//! [`advisor`] talks to the external generative model; [`mapping`] turns
//! resolver output into map camera targets or external search links.

pub mod advisor;
pub mod config;
pub mod mapping;
pub mod registry;
pub mod server;
