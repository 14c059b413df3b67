//! Tunable allocation limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default minimum distance between footprint centers of two buildings.
pub const DEFAULT_MIN_SPACING: f64 = 2.0;

/// Default per-district density cap, in tier-weight units.
pub const DEFAULT_DENSITY_CAP: Decimal = Decimal::from_parts(35, 0, 0, false, 0);

/// Spacing and density limits applied by the allocator and the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRules {
    /// Minimum Euclidean distance between footprint centers.
    #[serde(default = "default_min_spacing")]
    pub min_spacing: f64,

    /// Maximum summed tier weight of the buildings in one district.
    #[serde(default = "default_density_cap")]
    pub density_cap: Decimal,
}

impl Default for AllocationRules {
    fn default() -> Self {
        Self {
            min_spacing: DEFAULT_MIN_SPACING,
            density_cap: DEFAULT_DENSITY_CAP,
        }
    }
}

const fn default_min_spacing() -> f64 {
    DEFAULT_MIN_SPACING
}

const fn default_density_cap() -> Decimal {
    DEFAULT_DENSITY_CAP
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn defaults() {
        let rules = AllocationRules::default();
        assert_eq!(rules.min_spacing, 2.0);
        assert_eq!(rules.density_cap, Decimal::from(35));
    }
}
