//! artcfg-lib: build-configuration composer for the ART runtime
//!
//! This crate turns knobs and platform facts into per-module property sets:
//! - `knob`: named configuration values with tri-state booleans
//! - `flags`: global, debug, device and host compiler flags
//! - `codegen`: codegen architecture selection and fragment merging
//! - `module`: module kinds, their composition steps and final properties
//! - `driver`: the load and install phases over a whole module set
//! - `registry`: installed test artifacts, shared across modules

pub mod codegen;
pub mod config;
pub mod context;
pub mod driver;
pub mod flags;
pub mod knob;
pub mod module;
pub mod platform;
pub mod registry;
