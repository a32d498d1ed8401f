//! Blood splatter decal
//!
//! Data flows one way: `shape` generates the bumps, `growth` eases them out
//! from the base circle, `outline` turns each frame's bumps into a closed
//! path, and `decor` adds droplets and speckles once growth completes.

pub mod decor;
pub mod effect;
pub mod growth;
pub mod outline;
pub mod shape;

pub use effect::BloodEffect;
pub use growth::{Growth, GrowthFrame, GrowthPhase};
pub use outline::{BumpArc, build_outline, bump_arcs};
pub use shape::{Bump, SplatShape};
