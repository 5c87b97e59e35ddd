// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Reference radius (m) at which EFIT reports the vacuum toroidal field
/// for COMPASS (geometric major radius).
pub const COMPASS_B_VACUUM_RADIUS: f64 = 0.56;

/// Minimum number of vertices accepted for a closed contour.
pub const MIN_POLYGON_POINTS: usize = 2;

/// Minimum number of radial samples needed to normalize a flux profile.
pub const MIN_FLUX_SAMPLES: usize = 2;
