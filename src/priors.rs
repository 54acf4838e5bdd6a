//! Base risk priors for debris labels
//!
//! Every label maps to a prior in [0, 5] reflecting its intrinsic
//! hazard before any corpus context is applied. Lookup never fails:
//! unknown labels get a neutral default, because upstream detector
//! models grow new classes faster than this table does.

use std::collections::HashMap;

/// Neutral prior applied to labels with no explicit entry.
pub const DEFAULT_BASE_RISK: f64 = 3.0;

/// Built-in priors, label -> base risk. Entanglement hazards (nets,
/// traps) and persistent plastics sit at the top of the range.
const BUILTIN_PRIORS: &[(&str, f64)] = &[
    ("Fish_net", 4.5),
    ("Fish_trap", 3.0),
    ("Glass", 3.8),
    ("Metal", 3.5),
    ("Plastic", 4.0),
    ("Rope", 3.2),
    ("Rubber_etc", 3.3),
    ("Rubber_tire", 3.4),
    ("Wood", 2.8),
    ("PET_Bottle", 3.1),
    ("Bottle", 3.1),
    ("Can", 3.2),
    ("Bag", 3.8),
    ("Container", 3.0),
];

/// Label -> base-risk lookup with optional config overrides layered on
/// top of the built-in table.
///
/// Matching is case-sensitive: detector class names are exact strings,
/// not free text, so `plastic` and `Plastic` are different labels.
#[derive(Debug, Clone)]
pub struct RiskPriorTable {
    overrides: HashMap<String, f64>,
    default_risk: f64,
}

impl Default for RiskPriorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskPriorTable {
    /// Table with built-in priors only.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            default_risk: DEFAULT_BASE_RISK,
        }
    }

    /// Table with config-supplied overrides. `default_risk` replaces
    /// the fallback for labels neither the overrides nor the built-ins
    /// know; `None` keeps the standard default.
    pub fn with_overrides(overrides: HashMap<String, f64>, default_risk: Option<f64>) -> Self {
        Self {
            overrides,
            default_risk: default_risk.unwrap_or(DEFAULT_BASE_RISK),
        }
    }

    /// Look up the base risk for a label.
    ///
    /// Precedence: config override, then built-in table, then the
    /// default fallback.
    pub fn base_risk(&self, label: &str) -> f64 {
        if let Some(&risk) = self.overrides.get(label) {
            return risk;
        }
        BUILTIN_PRIORS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, risk)| *risk)
            .unwrap_or(self.default_risk)
    }

    /// Whether the label has an explicit prior (override or built-in),
    /// as opposed to falling back to the default.
    pub fn is_known(&self, label: &str) -> bool {
        self.overrides.contains_key(label)
            || BUILTIN_PRIORS.iter().any(|(known, _)| *known == label)
    }
}
