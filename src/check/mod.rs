//! Morphological quality checks on a single neurite.
//!
//! Each predicate is a pure function of the tree. The `find_*` variants
//! report where the first problem was seen; the `is_*` wrappers only
//! answer yes or no.

mod back_tracking;
mod flatness;
mod monotonic;

pub use back_tracking::{find_back_tracking, is_back_tracking, BackTrack, OVERLAP_LENGTH_FACTOR};
pub use flatness::{flatness_from_extents, is_flat, FlatnessMethod};
pub use monotonic::{find_non_monotonic, is_monotonic, RadiusIncrease};
