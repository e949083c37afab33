//! Pre- and post-processing tools for Abaqus planetary basin models, and a
//! self-compression calculator for radially layered elastic spheres.

pub mod common;
pub mod domain;
pub mod inp;
pub mod modules;
pub mod numerics;
