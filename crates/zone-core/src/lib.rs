//! **zone-core**: grid geometry for the zone simulation.
//!
//! Provides the [`Location`] cell coordinate and the fixed-size [`Bounds`]
//! of a map. Everything else in the workspace is expressed in these types.

pub mod geom;

pub use geom::{Bounds, BoundsIter, Location};
