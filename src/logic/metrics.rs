//! Badness metrics shared by sit-out selection and court grouping, and the
//! priority order in which they are compared.

use crate::logic::history::PairCounts;
use crate::models::{Gender, PairingMode, Player, PlayerId, Settings, SkillMode, UniquenessImportance};

/// One of the three goals a grouping is scored on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Criterion {
    Pairing,
    Skill,
    Uniqueness,
}

/// Order in which the criteria break ties, most significant first.
pub fn priority_order(importance: UniquenessImportance) -> [Criterion; 3] {
    use Criterion::*;
    match importance {
        UniquenessImportance::Low => [Pairing, Skill, Uniqueness],
        UniquenessImportance::Medium => [Pairing, Uniqueness, Skill],
        UniquenessImportance::High => [Uniqueness, Pairing, Skill],
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

impl GenderCounts {
    pub fn of<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        let mut counts = Self::default();
        for p in players {
            match p.gender {
                Gender::Male => counts.male += 1,
                Gender::Female => counts.female += 1,
                Gender::Other => counts.other += 1,
            }
        }
        counts
    }
}

/// Scores for a whole play pool (the players who would be on court).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoolMetrics {
    /// Courts that cannot be filled the way the pairing mode wants.
    pub pairing: f64,
    /// Skill variance, same-skill mode only.
    pub skill: f64,
    /// Sum of co-court counts over every pair in the pool.
    pub uniqueness: f64,
}

impl PoolMetrics {
    pub fn ordered(&self, order: [Criterion; 3]) -> [f64; 3] {
        order.map(|c| match c {
            Criterion::Pairing => self.pairing,
            Criterion::Skill => self.skill,
            Criterion::Uniqueness => self.uniqueness,
        })
    }
}

pub fn pool_metrics(pool: &[&Player], settings: &Settings, co_court: &PairCounts) -> PoolMetrics {
    let courts = pool.len() / 4;
    let genders = GenderCounts::of(pool.iter().copied());
    let pairing = match settings.pairing_mode {
        PairingMode::SameGender => courts.saturating_sub(genders.male / 4 + genders.female / 4),
        PairingMode::Mixed => courts.saturating_sub((genders.male / 2).min(genders.female / 2)),
        PairingMode::Random => 0,
    };
    let skill = match settings.skill_mode {
        SkillMode::SameSkill => skill_variance(pool),
        SkillMode::Balanced => 0.0,
    };
    let ids: Vec<PlayerId> = pool.iter().map(|p| p.id).collect();
    PoolMetrics {
        pairing: pairing as f64,
        skill,
        uniqueness: co_court.sum_within(&ids) as f64,
    }
}

/// Population variance of skill; 0 for an empty pool.
pub fn skill_variance(pool: &[&Player]) -> f64 {
    if pool.is_empty() {
        return 0.0;
    }
    let n = pool.len() as f64;
    let mean = pool.iter().map(|p| p.skill as f64).sum::<f64>() / n;
    pool.iter()
        .map(|p| {
            let d = p.skill as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Scores for a single candidate court.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QuartetMetrics {
    pub pairing: u32,
    pub skill: u32,
    pub uniqueness: u32,
}

impl QuartetMetrics {
    pub fn ordered(&self, order: [Criterion; 3]) -> [u32; 3] {
        order.map(|c| match c {
            Criterion::Pairing => self.pairing,
            Criterion::Skill => self.skill,
            Criterion::Uniqueness => self.uniqueness,
        })
    }
}

pub fn quartet_metrics(
    quartet: &[&Player; 4],
    settings: &Settings,
    co_court: &PairCounts,
) -> QuartetMetrics {
    let genders = GenderCounts::of(quartet.iter().copied());
    let pairing = match settings.pairing_mode {
        PairingMode::SameGender => u32::from(
            genders.male != 4 && genders.female != 4 && genders.other != 4,
        ),
        // 2+2 scores 0, a 3-1 split 1, a single-gender court 2.
        PairingMode::Mixed => genders.male.abs_diff(2).max(genders.female.abs_diff(2)) as u32,
        PairingMode::Random => 0,
    };
    let skill = match settings.skill_mode {
        SkillMode::SameSkill => {
            let max = quartet.iter().map(|p| p.skill).max().unwrap_or(0);
            let min = quartet.iter().map(|p| p.skill).min().unwrap_or(0);
            u32::from(max - min)
        }
        SkillMode::Balanced => 0,
    };
    let ids = quartet.map(|p| p.id);
    QuartetMetrics {
        pairing,
        skill,
        uniqueness: co_court.sum_within(&ids),
    }
}
