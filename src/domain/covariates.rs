//! Patient covariates for post-stroke discharge modelling.
//!
//! Qualitative inputs are tagged enums so that inconsistent encodings
//! (an "unknown" NIHSS that still carries a value, a free-text side) cannot be built.

use serde::{Deserialize, Serialize};

/// Side of hemiparesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HemiparesisSide {
    #[default]
    Unknown,
    Left,
    Right,
}

impl std::fmt::Display for HemiparesisSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// NIHSS severity band used by the discharge model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NihssBand {
    /// NIHSS 0-5
    Low,
    /// NIHSS 6-13
    Mid,
    /// NIHSS 14+
    High,
}

impl NihssBand {
    /// All bands in severity order.
    pub const ALL: [NihssBand; 3] = [NihssBand::Low, NihssBand::Mid, NihssBand::High];

    /// Band for a NIHSS total.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=5 => Self::Low,
            6..=13 => Self::Mid,
            _ => Self::High,
        }
    }
}

/// Admission NIHSS total, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Nihss {
    Unknown,
    Score(u8),
}

impl Nihss {
    /// Maximum NIHSS total.
    pub const MAX: u8 = 42;

    /// Severity band, `None` when unknown.
    #[must_use]
    pub fn band(&self) -> Option<NihssBand> {
        match self {
            Self::Unknown => None,
            Self::Score(s) => Some(NihssBand::from_score(*s)),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl Default for Nihss {
    fn default() -> Self {
        Self::Score(10)
    }
}

/// Pre-morbid modified Rankin Scale band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MrsBand {
    /// mRS 0-2
    UpToTwo,
    /// mRS 3
    Three,
    /// mRS 4
    Four,
    /// mRS 5-6
    FiveOrMore,
}

impl MrsBand {
    #[must_use]
    pub fn from_mrs(mrs: u8) -> Self {
        match mrs {
            0..=2 => Self::UpToTwo,
            3 => Self::Three,
            4 => Self::Four,
            _ => Self::FiveOrMore,
        }
    }
}

/// Presence of higher cortical deficits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeficitFlags {
    /// Unilateral spatial neglect
    pub neglect: bool,
    pub aphasia: bool,
    /// Ideational / ideomotor apraxia
    pub apraxia: bool,
}

/// Deficit magnitudes after accounting for the hemiparesis side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeficitMagnitudes {
    pub neglect: f64,
    pub aphasia: f64,
    pub apraxia: f64,
}

/// Clinical and demographic covariates of one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Covariates {
    /// Age in years (18-120)
    pub age: f64,

    /// Number of people in the household, including the patient (>= 1)
    pub household_size: u32,

    pub lives_alone: bool,

    /// Stairs or steps at home
    pub stairs_at_home: bool,

    pub hemiparesis: HemiparesisSide,

    pub deficits: DeficitFlags,

    pub nihss: Nihss,

    /// Pre-morbid modified Rankin Scale (0-6)
    pub premorbid_mrs: u8,
}

impl Default for Covariates {
    fn default() -> Self {
        Self {
            age: 70.0,
            household_size: 2,
            lives_alone: false,
            stairs_at_home: true,
            hemiparesis: HemiparesisSide::Unknown,
            deficits: DeficitFlags::default(),
            nihss: Nihss::default(),
            premorbid_mrs: 0,
        }
    }
}

impl Covariates {
    /// Deficit magnitudes for the threshold shift of the item model.
    ///
    /// Neglect weighs more with right-sided hemiparesis; aphasia and apraxia
    /// weigh more with left-sided hemiparesis. An unknown side takes the lower
    /// magnitude of each deficit; an absent deficit contributes zero.
    #[must_use]
    pub fn deficit_magnitudes(&self) -> DeficitMagnitudes {
        let left = self.hemiparesis == HemiparesisSide::Left;
        let right = self.hemiparesis == HemiparesisSide::Right;

        let magnitude = |present: bool, favoured: bool, high: f64, low: f64| {
            match (present, favoured) {
                (false, _) => 0.0,
                (true, true) => high,
                (true, false) => low,
            }
        };

        DeficitMagnitudes {
            neglect: magnitude(self.deficits.neglect, right, 0.8, 0.3),
            aphasia: magnitude(self.deficits.aphasia, left, 0.6, 0.2),
            apraxia: magnitude(self.deficits.apraxia, left, 0.7, 0.2),
        }
    }

    /// Whether the lives-alone flag agrees with the household size.
    #[must_use]
    pub fn is_household_consistent(&self) -> bool {
        (self.household_size <= 1) == self.lives_alone
    }

    #[must_use]
    pub fn mrs_band(&self) -> MrsBand {
        MrsBand::from_mrs(self.premorbid_mrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nihss_bands() {
        assert_eq!(NihssBand::from_score(0), NihssBand::Low);
        assert_eq!(NihssBand::from_score(5), NihssBand::Low);
        assert_eq!(NihssBand::from_score(6), NihssBand::Mid);
        assert_eq!(NihssBand::from_score(13), NihssBand::Mid);
        assert_eq!(NihssBand::from_score(14), NihssBand::High);
        assert_eq!(Nihss::Unknown.band(), None);
        assert_eq!(Nihss::Score(10).band(), Some(NihssBand::Mid));
    }

    #[test]
    fn test_mrs_bands() {
        assert_eq!(MrsBand::from_mrs(0), MrsBand::UpToTwo);
        assert_eq!(MrsBand::from_mrs(2), MrsBand::UpToTwo);
        assert_eq!(MrsBand::from_mrs(3), MrsBand::Three);
        assert_eq!(MrsBand::from_mrs(4), MrsBand::Four);
        assert_eq!(MrsBand::from_mrs(6), MrsBand::FiveOrMore);
    }

    #[test]
    fn test_deficit_magnitudes_by_side() {
        let all = DeficitFlags {
            neglect: true,
            aphasia: true,
            apraxia: true,
        };
        let mut cov = Covariates {
            deficits: all,
            hemiparesis: HemiparesisSide::Right,
            ..Default::default()
        };
        let m = cov.deficit_magnitudes();
        assert_eq!((m.neglect, m.aphasia, m.apraxia), (0.8, 0.2, 0.2));

        cov.hemiparesis = HemiparesisSide::Left;
        let m = cov.deficit_magnitudes();
        assert_eq!((m.neglect, m.aphasia, m.apraxia), (0.3, 0.6, 0.7));

        cov.hemiparesis = HemiparesisSide::Unknown;
        let m = cov.deficit_magnitudes();
        assert_eq!((m.neglect, m.aphasia, m.apraxia), (0.3, 0.2, 0.2));

        cov.deficits = DeficitFlags::default();
        let m = cov.deficit_magnitudes();
        assert_eq!((m.neglect, m.aphasia, m.apraxia), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_household_consistency() {
        let cov = Covariates::default();
        assert!(cov.is_household_consistent());

        let inconsistent = Covariates {
            lives_alone: true,
            household_size: 3,
            ..Default::default()
        };
        assert!(!inconsistent.is_household_consistent());
    }

    #[test]
    fn test_nihss_serde_shape() {
        let json = serde_json::to_string(&Nihss::Score(7)).expect("serialize");
        assert_eq!(json, r#"{"kind":"score","value":7}"#);
        let back: Nihss = serde_json::from_str(r#"{"kind":"unknown"}"#).expect("deserialize");
        assert!(back.is_unknown());
    }
}
