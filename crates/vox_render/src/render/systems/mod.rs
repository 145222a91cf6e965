//! Rendering systems owned by the renderer itself

pub mod lighting;
