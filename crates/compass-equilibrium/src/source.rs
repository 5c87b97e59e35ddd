//! Data-source seam.
//!
//! Anything that can produce a validated [`EquilibriumDataset`] (a CDB
//! query, an EFIT file, a FIESTA export) implements [`EquilibriumSource`].
//! Connection handles belong to the implementing type and are passed in
//! at construction; nothing is installed globally.

use compass_types::dataset::EquilibriumDataset;
use compass_types::error::CompassResult;

pub trait EquilibriumSource {
    /// Short label for logs, e.g. "EFIT" or "FIESTA".
    fn name(&self) -> &str;

    fn load(&self) -> CompassResult<EquilibriumDataset>;
}

/// Source backed by a dataset that is already in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    dataset: EquilibriumDataset,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, dataset: EquilibriumDataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }
}

impl EquilibriumSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> CompassResult<EquilibriumDataset> {
        Ok(self.dataset.clone())
    }
}
