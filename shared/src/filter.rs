//! Client-side environment filtering.
//!
//! The filtered view is stored as indices into the full plant list, so the
//! "all" category shares every element instead of copying it.

use crate::model::{EnvironmentKey, Plant};

#[must_use]
pub fn filter_indices(plants: &[Plant], key: &EnvironmentKey) -> Vec<usize> {
    if key.is_all() {
        return (0..plants.len()).collect();
    }

    plants
        .iter()
        .enumerate()
        .filter(|(_, p)| p.grows_in(key))
        .map(|(i, _)| i)
        .collect()
}
