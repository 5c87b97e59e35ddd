// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Equilibrium
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Equilibrium time-slice extraction for COMPASS / COMPASS-Upgrade.
//!
//! EFIT and FIESTA reconstructions are reshaped into one canonical
//! dataset; snapshots are cut from it at the nearest stored time.

pub mod equilibrium;
pub mod extract;
pub mod npz;
pub mod points;
pub mod polygon;
pub mod profile;
pub mod source;
pub mod time_index;
