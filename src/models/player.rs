//! Player and Gender data structures.

use crate::models::lenient;
use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for a player (assigned at creation, never reused).
pub type PlayerId = u32;

/// Lowest and highest accepted skill rating.
pub const MIN_SKILL: u8 = 1;
pub const MAX_SKILL: u8 = 10;
/// Skill assumed for players saved without one.
pub const DEFAULT_SKILL: u8 = 5;

/// Gender used by the pairing preference.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    /// Parse a stored or user-supplied gender, accepting the short and lowercase
    /// spellings older saves used. Anything unrecognized is `Other`.
    pub fn from_alias(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "man" => Gender::Male,
            "female" | "f" | "woman" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map(Gender::from_alias).unwrap_or_default())
    }
}

fn default_skill() -> u8 {
    DEFAULT_SKILL
}

/// Accept numbers, numeric strings or junk; junk falls back to the default skill.
fn lenient_skill<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    let skill = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(skill
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(MIN_SKILL as f64, MAX_SKILL as f64) as u8)
        .unwrap_or(DEFAULT_SKILL))
}

/// A member of the group. Archived players stay in the roster so old rounds
/// can still show their names, but never take part in selection.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Zero only in a damaged save; `Session::normalize` reassigns it.
    #[serde(default, deserialize_with = "lenient::count")]
    pub id: PlayerId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default = "default_skill", deserialize_with = "lenient_skill")]
    pub skill: u8,
    /// Available for the next round.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_present: bool,
    /// Volunteers to sit out; lowers their fairness cost.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub happy_to_sit: bool,
    #[serde(default, deserialize_with = "lenient::count")]
    pub games_played: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub sits: u32,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_archived: bool,
}

impl Player {
    /// Create a new player. Counters start at zero, not present.
    pub fn new(id: PlayerId, name: impl Into<String>, gender: Gender, skill: u8) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            skill,
            is_present: false,
            happy_to_sit: false,
            games_played: 0,
            sits: 0,
            is_archived: false,
        }
    }

    /// Present and not archived: eligible for the next round.
    pub fn is_available(&self) -> bool {
        self.is_present && !self.is_archived
    }

    pub fn record_game(&mut self) {
        self.games_played += 1;
    }

    pub fn record_sit(&mut self) {
        self.sits += 1;
    }

    /// Soft-delete. An archived player can never be present.
    pub fn archive(&mut self) {
        self.is_archived = true;
        self.is_present = false;
    }

    /// Repair values a hand-edited or older save may carry.
    pub fn normalize(&mut self) {
        self.skill = self.skill.clamp(MIN_SKILL, MAX_SKILL);
        if self.is_archived {
            self.is_present = false;
        }
    }
}
