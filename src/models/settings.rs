//! Session-wide rotation settings: pairing, skill, uniqueness and rotation focus.
//!
//! Every enum deserializes leniently: legacy spellings map onto the canonical
//! value and unknown values fall back to the default, so an old save never
//! fails to load because of a renamed option.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Most courts a round can fill.
pub const MAX_COURTS: usize = 5;

/// Gender-composition preference when forming courts and sit-out pools.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingMode {
    /// Courts of one gender.
    SameGender,
    /// Courts of two men and two women.
    Mixed,
    #[default]
    Random,
}

impl PairingMode {
    pub fn from_alias(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "samegender" | "same" | "gender" | "single" | "singlegender" | "level" => {
                Some(PairingMode::SameGender)
            }
            "mixed" | "mix" | "mixeddoubles" => Some(PairingMode::Mixed),
            "random" | "any" | "none" | "off" => Some(PairingMode::Random),
            _ => None,
        }
    }
}

/// Whether courts should cluster similar skill levels.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillMode {
    SameSkill,
    #[default]
    Balanced,
}

impl SkillMode {
    pub fn from_alias(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "sameskill" | "same" | "similar" | "matched" | "level" => Some(SkillMode::SameSkill),
            "balanced" | "balance" | "mixed" | "mixedskill" | "random" | "any" | "off" => {
                Some(SkillMode::Balanced)
            }
            _ => None,
        }
    }
}

/// How strongly variety of combinations weighs against pairing and skill goals.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum UniquenessImportance {
    Low,
    #[default]
    Medium,
    High,
}

impl UniquenessImportance {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(UniquenessImportance::Low),
            2 => Some(UniquenessImportance::Medium),
            3 => Some(UniquenessImportance::High),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            UniquenessImportance::Low => 1,
            UniquenessImportance::Medium => 2,
            UniquenessImportance::High => 3,
        }
    }

    fn from_alias(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "low" => Some(UniquenessImportance::Low),
            "medium" | "med" | "normal" => Some(UniquenessImportance::Medium),
            "high" => Some(UniquenessImportance::High),
            other => other.parse().ok().and_then(Self::from_level),
        }
    }
}

impl Serialize for UniquenessImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for UniquenessImportance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let parsed = match &raw {
            serde_json::Value::Number(n) => n.as_i64().and_then(Self::from_level),
            serde_json::Value::String(s) => Self::from_alias(s),
            _ => None,
        };
        if parsed.is_none() && !raw.is_null() {
            log::warn!("Unknown uniqueness importance {}, using medium", raw);
        }
        Ok(parsed.unwrap_or_default())
    }
}

/// Pair-selection weighting. Without one, pairs are chosen on skill gap alone.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationFocus {
    /// Favour new partnerships over an even skill split.
    Variety,
    Balanced,
    /// Favour an even skill split over new partnerships.
    SkillFirst,
}

impl RotationFocus {
    pub fn from_alias(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "variety" | "rotation" | "varietyweighted" => Some(RotationFocus::Variety),
            "balanced" | "balance" => Some(RotationFocus::Balanced),
            "skillfirst" | "skill" => Some(RotationFocus::SkillFirst),
            _ => None,
        }
    }

    /// (skill gap, repeat partnerships, gender mismatch) weights.
    pub fn weights(&self) -> (u32, u32, u32) {
        match self {
            RotationFocus::Variety => (1, 4, 2),
            RotationFocus::Balanced => (2, 2, 2),
            RotationFocus::SkillFirst => (4, 1, 1),
        }
    }
}

/// Implements lenient `Deserialize` through `from_alias`, falling back to the default.
macro_rules! lenient_enum {
    ($ty:ty, $label:literal) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = serde_json::Value::deserialize(deserializer)?;
                Ok(match raw.as_str() {
                    None => <$ty>::default(),
                    Some(s) => <$ty>::from_alias(s).unwrap_or_else(|| {
                        log::warn!("Unknown {} {:?}, using default", $label, s);
                        <$ty>::default()
                    }),
                })
            }
        }
    };
}

lenient_enum!(PairingMode, "pairing mode");
lenient_enum!(SkillMode, "skill mode");

fn lenient_rotation_focus<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RotationFocus>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(RotationFocus::from_alias))
}

fn lenient_courts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw
        .as_u64()
        .map(|n| (n as usize).clamp(1, MAX_COURTS))
        .unwrap_or(MAX_COURTS))
}

fn default_courts() -> usize {
    MAX_COURTS
}

/// Lowercase and drop separators so "Same-Gender", "same_gender" and "sameGender" agree.
fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Configuration that persists across rounds and survives a new-day reset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub pairing_mode: PairingMode,
    #[serde(default)]
    pub skill_mode: SkillMode,
    #[serde(default)]
    pub uniqueness_importance: UniquenessImportance,
    #[serde(default, deserialize_with = "lenient_rotation_focus")]
    pub rotation_focus: Option<RotationFocus>,
    #[serde(default = "default_courts", deserialize_with = "lenient_courts")]
    pub courts_available: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pairing_mode: PairingMode::default(),
            skill_mode: SkillMode::default(),
            uniqueness_importance: UniquenessImportance::default(),
            rotation_focus: None,
            courts_available: MAX_COURTS,
        }
    }
}
