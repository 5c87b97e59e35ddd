// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Equilibrium Handle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::extract::{extract, snapshot_at};
use crate::source::EquilibriumSource;
use compass_types::dataset::EquilibriumDataset;
use compass_types::error::CompassResult;
use compass_types::snapshot::EquilibriumSnapshot;
use ndarray::Array1;

/// A loaded equilibrium time series, ready to be sliced.
#[derive(Debug, Clone)]
pub struct Equilibrium {
    source_name: String,
    dataset: EquilibriumDataset,
}

impl Equilibrium {
    pub fn new(source_name: impl Into<String>, dataset: EquilibriumDataset) -> Self {
        Equilibrium {
            source_name: source_name.into(),
            dataset,
        }
    }

    pub fn from_source<S: EquilibriumSource + ?Sized>(source: &S) -> CompassResult<Self> {
        let dataset = source.load()?;
        tracing::debug!(
            source = source.name(),
            n_times = dataset.n_times(),
            "equilibrium loaded"
        );
        Ok(Self::new(source.name(), dataset))
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn dataset(&self) -> &EquilibriumDataset {
        &self.dataset
    }

    pub fn times(&self) -> &Array1<f64> {
        self.dataset.time()
    }

    pub fn time_range(&self) -> (f64, f64) {
        self.dataset.time_range()
    }

    /// Snapshot at the stored time nearest to `time`.
    pub fn time_slice(&self, time: f64) -> CompassResult<EquilibriumSnapshot> {
        extract(&self.dataset, time)
    }

    /// One snapshot per stored time, in time order.
    pub fn snapshots(&self) -> impl Iterator<Item = CompassResult<EquilibriumSnapshot>> + '_ {
        (0..self.dataset.n_times()).map(move |index| snapshot_at(&self.dataset, index))
    }
}
