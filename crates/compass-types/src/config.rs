// ─────────────────────────────────────────────────────────────────────
// COMPASS Equilibrium — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::COMPASS_B_VACUUM_RADIUS;
use crate::dataset::Field;
use crate::error::{CompassError, CompassResult};
use serde::{Deserialize, Serialize};

/// Where a canonical field is stored in a source.
///
/// A list of names means several 1-D time series stacked along a point
/// axis, e.g. FIESTA's separate lower and upper X-point signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalRef {
    Single(String),
    Stacked(Vec<String>),
}

impl SignalRef {
    pub fn names(&self) -> Vec<&str> {
        match self {
            SignalRef::Single(name) => vec![name.as_str()],
            SignalRef::Stacked(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for SignalRef {
    fn from(name: &str) -> Self {
        SignalRef::Single(name.to_string())
    }
}

fn stacked(names: &[&str]) -> SignalRef {
    SignalRef::Stacked(names.iter().map(|n| n.to_string()).collect())
}

/// Vacuum-field reference radius: a fixed value [m] or a stored signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RadiusSpec {
    Constant(f64),
    Signal(String),
}

/// Stored signal name for every canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMap {
    pub time: SignalRef,
    #[serde(rename = "R")]
    pub r: SignalRef,
    #[serde(rename = "Z")]
    pub z: SignalRef,
    pub psi_grid: SignalRef,
    pub psi_axis: SignalRef,
    pub psi_lcfs: SignalRef,
    #[serde(rename = "R_magnetic_axis")]
    pub r_magnetic_axis: SignalRef,
    #[serde(rename = "Z_magnetic_axis")]
    pub z_magnetic_axis: SignalRef,
    #[serde(rename = "R_xpoint")]
    pub r_xpoint: SignalRef,
    #[serde(rename = "Z_xpoint")]
    pub z_xpoint: SignalRef,
    #[serde(rename = "R_strike_point")]
    pub r_strike_point: SignalRef,
    #[serde(rename = "Z_strike_point")]
    pub z_strike_point: SignalRef,
    pub psi_n: SignalRef,
    pub f_profile: SignalRef,
    pub q_profile: SignalRef,
    #[serde(rename = "Btor_vacuum_magnitude")]
    pub b_vacuum_magnitude: SignalRef,
    #[serde(rename = "R_lcfs")]
    pub r_lcfs: SignalRef,
    #[serde(rename = "Z_lcfs")]
    pub z_lcfs: SignalRef,
    #[serde(rename = "R_limiter", default, skip_serializing_if = "Option::is_none")]
    pub r_limiter: Option<SignalRef>,
    #[serde(rename = "Z_limiter", default, skip_serializing_if = "Option::is_none")]
    pub z_limiter: Option<SignalRef>,
}

impl SignalMap {
    /// Signal reference per canonical field. `Btor_vacuum_radius` is not
    /// listed here; it is resolved through [`SourceConfig::b_vacuum_radius`].
    pub fn entries(&self) -> Vec<(Field, Option<&SignalRef>)> {
        vec![
            (Field::Time, Some(&self.time)),
            (Field::R, Some(&self.r)),
            (Field::Z, Some(&self.z)),
            (Field::PsiGrid, Some(&self.psi_grid)),
            (Field::PsiAxis, Some(&self.psi_axis)),
            (Field::PsiLcfs, Some(&self.psi_lcfs)),
            (Field::RMagneticAxis, Some(&self.r_magnetic_axis)),
            (Field::ZMagneticAxis, Some(&self.z_magnetic_axis)),
            (Field::RXpoint, Some(&self.r_xpoint)),
            (Field::ZXpoint, Some(&self.z_xpoint)),
            (Field::RStrikePoint, Some(&self.r_strike_point)),
            (Field::ZStrikePoint, Some(&self.z_strike_point)),
            (Field::PsiN, Some(&self.psi_n)),
            (Field::FProfile, Some(&self.f_profile)),
            (Field::QProfile, Some(&self.q_profile)),
            (Field::BtorVacuumMagnitude, Some(&self.b_vacuum_magnitude)),
            (Field::RLcfs, Some(&self.r_lcfs)),
            (Field::ZLcfs, Some(&self.z_lcfs)),
            (Field::RLimiter, self.r_limiter.as_ref()),
            (Field::ZLimiter, self.z_limiter.as_ref()),
        ]
    }
}

/// Description of one equilibrium data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub source_name: String,
    pub signals: SignalMap,
    #[serde(rename = "Btor_vacuum_radius")]
    pub b_vacuum_radius: RadiusSpec,
}

impl SourceConfig {
    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> CompassResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CompassResult<()> {
        if self.source_name.trim().is_empty() {
            return Err(CompassError::ConfigError(
                "source_name must not be empty".to_string(),
            ));
        }
        for (field, signal) in self.signals.entries() {
            let Some(signal) = signal else { continue };
            let names = signal.names();
            if names.is_empty() {
                return Err(CompassError::ConfigError(format!(
                    "{field} maps to an empty signal list"
                )));
            }
            if names.iter().any(|n| n.trim().is_empty()) {
                return Err(CompassError::ConfigError(format!(
                    "{field} maps to an empty signal name"
                )));
            }
        }
        if self.signals.r_limiter.is_some() != self.signals.z_limiter.is_some() {
            return Err(CompassError::ConfigError(
                "R_limiter and Z_limiter must be mapped together".to_string(),
            ));
        }
        match &self.b_vacuum_radius {
            RadiusSpec::Constant(value) if !value.is_finite() || *value <= 0.0 => {
                Err(CompassError::ConfigError(format!(
                    "Btor_vacuum_radius must be finite and positive, got {value}"
                )))
            }
            RadiusSpec::Signal(name) if name.trim().is_empty() => Err(CompassError::ConfigError(
                "Btor_vacuum_radius maps to an empty signal name".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Source already stored under the canonical field names.
    pub fn canonical() -> Self {
        let name = |field: Field| SignalRef::from(field.as_str());
        SourceConfig {
            source_name: "canonical".to_string(),
            signals: SignalMap {
                time: name(Field::Time),
                r: name(Field::R),
                z: name(Field::Z),
                psi_grid: name(Field::PsiGrid),
                psi_axis: name(Field::PsiAxis),
                psi_lcfs: name(Field::PsiLcfs),
                r_magnetic_axis: name(Field::RMagneticAxis),
                z_magnetic_axis: name(Field::ZMagneticAxis),
                r_xpoint: name(Field::RXpoint),
                z_xpoint: name(Field::ZXpoint),
                r_strike_point: name(Field::RStrikePoint),
                z_strike_point: name(Field::ZStrikePoint),
                psi_n: name(Field::PsiN),
                f_profile: name(Field::FProfile),
                q_profile: name(Field::QProfile),
                b_vacuum_magnitude: name(Field::BtorVacuumMagnitude),
                r_lcfs: name(Field::RLcfs),
                z_lcfs: name(Field::ZLcfs),
                r_limiter: Some(name(Field::RLimiter)),
                z_limiter: Some(name(Field::ZLimiter)),
            },
            b_vacuum_radius: RadiusSpec::Signal(Field::BtorVacuumRadius.as_str().to_string()),
        }
    }

    /// COMPASS EFIT reconstruction as exported from CDB.
    pub fn efit() -> Self {
        SourceConfig {
            source_name: "EFIT".to_string(),
            signals: SignalMap {
                time: "time".into(),
                r: "R".into(),
                z: "Z".into(),
                psi_grid: "psi_RZ".into(),
                psi_axis: "psi_mag_axis".into(),
                psi_lcfs: "psi_lcfs".into(),
                r_magnetic_axis: "R_mag_axis".into(),
                z_magnetic_axis: "Z_mag_axis".into(),
                r_xpoint: "R_xpoint".into(),
                z_xpoint: "Z_xpoint".into(),
                r_strike_point: "R_strike_points".into(),
                z_strike_point: "Z_strike_points".into(),
                psi_n: "psi_n".into(),
                f_profile: "RBphi".into(),
                q_profile: "q".into(),
                b_vacuum_magnitude: "B_vac_R_geom".into(),
                r_lcfs: "R_bound".into(),
                z_lcfs: "Z_bound".into(),
                r_limiter: Some("R_limiter_input".into()),
                z_limiter: Some("Z_limiter_input".into()),
            },
            b_vacuum_radius: RadiusSpec::Constant(COMPASS_B_VACUUM_RADIUS),
        }
    }

    /// COMPASS-Upgrade FIESTA output.
    pub fn fiesta() -> Self {
        SourceConfig {
            source_name: "FIESTA".to_string(),
            signals: SignalMap {
                time: "time".into(),
                r: "fiesta_r".into(),
                z: "fiesta_z".into(),
                psi_grid: "psi".into(),
                psi_axis: "psi_0".into(),
                psi_lcfs: "psi_boundary".into(),
                r_magnetic_axis: "r_mag".into(),
                z_magnetic_axis: "z_mag".into(),
                r_xpoint: stacked(&["xp_lower_r", "xp_upper_r"]),
                z_xpoint: stacked(&["xp_lower_z", "xp_upper_z"]),
                r_strike_point: stacked(&["sp_hfs_r", "sp_lfs_r"]),
                z_strike_point: stacked(&["sp_hfs_z", "sp_lfs_z"]),
                psi_n: "fiesta_psi_norm".into(),
                f_profile: "f".into(),
                q_profile: "q".into(),
                b_vacuum_magnitude: "Bt_vac_mag_axis".into(),
                r_lcfs: "boundary_closed_r".into(),
                z_lcfs: "boundary_closed_z".into(),
                r_limiter: Some("R_limiter".into()),
                z_limiter: Some("Z_limiter".into()),
            },
            b_vacuum_radius: RadiusSpec::Signal("r_mag".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// CARGO_MANIFEST_DIR points to crates/compass-types/, the shipped
    /// configs live two levels up.
    fn config_path(file: &str) -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("configs")
            .join(file)
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_load_efit_config() {
        let cfg = SourceConfig::from_file(&config_path("efit.json")).unwrap();
        assert_eq!(cfg, SourceConfig::efit());
        assert_eq!(cfg.signals.psi_grid, SignalRef::from("psi_RZ"));
        assert_eq!(cfg.b_vacuum_radius, RadiusSpec::Constant(0.56));
    }

    #[test]
    fn test_load_fiesta_config() {
        let cfg = SourceConfig::from_file(&config_path("fiesta.json")).unwrap();
        assert_eq!(cfg, SourceConfig::fiesta());
        assert_eq!(cfg.signals.r_xpoint.names(), vec!["xp_lower_r", "xp_upper_r"]);
        assert_eq!(cfg.b_vacuum_radius, RadiusSpec::Signal("r_mag".to_string()));
    }

    #[test]
    fn test_presets_are_valid() {
        for cfg in [
            SourceConfig::canonical(),
            SourceConfig::efit(),
            SourceConfig::fiesta(),
        ] {
            assert!(cfg.validate().is_ok(), "{} preset invalid", cfg.source_name);
        }
    }

    #[test]
    fn test_canonical_uses_field_names() {
        let cfg = SourceConfig::canonical();
        for (field, signal) in cfg.signals.entries() {
            assert_eq!(signal.unwrap().names(), vec![field.as_str()]);
        }
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = SourceConfig::fiesta();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: SourceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn test_limiter_is_optional_in_json() {
        let mut cfg = SourceConfig::efit();
        cfg.signals.r_limiter = None;
        cfg.signals.z_limiter = None;
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("R_limiter"));
        let back: SourceConfig = serde_json::from_str(&json).unwrap();
        assert!(back.signals.r_limiter.is_none());
        assert!(back.validate().is_ok());
    }

    #[test]
    fn test_rejects_half_limiter() {
        let mut cfg = SourceConfig::efit();
        cfg.signals.z_limiter = None;
        assert!(matches!(cfg.validate(), Err(CompassError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_bad_radius() {
        let mut cfg = SourceConfig::efit();
        cfg.b_vacuum_radius = RadiusSpec::Constant(-1.0);
        assert!(cfg.validate().is_err());
        cfg.b_vacuum_radius = RadiusSpec::Constant(f64::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_stack() {
        let mut cfg = SourceConfig::fiesta();
        cfg.signals.r_xpoint = SignalRef::Stacked(vec![]);
        assert!(matches!(cfg.validate(), Err(CompassError::ConfigError(_))));
    }
}
