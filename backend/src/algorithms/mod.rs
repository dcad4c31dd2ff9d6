//! Pure data transformations used by the statistics providers.

pub mod normalize;

pub use normalize::{normalize, normalize_rows};
