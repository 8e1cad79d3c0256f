//! Pair selection: split a court's four players into two sides.

use crate::logic::history::PairCounts;
use crate::models::{Gender, PairingMode, Pair, Player, RotationFocus, Settings};

/// The three ways to split four players into two pairs, by index into the
/// id-sorted quartet: AB|CD, AC|BD, AD|BC.
const SPLITS: [[[usize; 2]; 2]; 3] = [[[0, 1], [2, 3]], [[0, 2], [1, 3]], [[0, 3], [1, 2]]];

/// The chosen split with the numbers behind it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PairSplit {
    pub pairs: [Pair; 2],
    /// Summed skill of each side.
    pub side_skill: [u32; 2],
    pub cost: u32,
}

impl PairSplit {
    pub fn skill_gap(&self) -> u32 {
        self.side_skill[0].abs_diff(self.side_skill[1])
    }
}

/// Choose the split of `quartet` with the lowest cost.
///
/// Without a rotation focus the cost is the skill gap between the sides. With
/// one it blends skill gap, how often each pair has partnered before, and how
/// many pairs go against the pairing mode. Ties go to the earlier split.
pub fn choose_pairs(quartet: &[&Player; 4], settings: &Settings, partners: &PairCounts) -> PairSplit {
    let mut sorted = *quartet;
    sorted.sort_by_key(|p| p.id);

    let candidates = SPLITS.map(|split| {
        let sides = split.map(|side| [sorted[side[0]], sorted[side[1]]]);
        let side_skill = sides.map(|side| u32::from(side[0].skill) + u32::from(side[1].skill));
        let skill_gap = side_skill[0].abs_diff(side_skill[1]);
        let cost = match settings.rotation_focus {
            None => skill_gap,
            Some(focus) => weighted_cost(focus, skill_gap, &sides, settings.pairing_mode, partners),
        };
        PairSplit {
            pairs: sides.map(|side| [side[0].id, side[1].id]),
            side_skill,
            cost,
        }
    });
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.cost < best.cost {
            best = *candidate;
        }
    }
    best
}

fn weighted_cost(
    focus: RotationFocus,
    skill_gap: u32,
    sides: &[[&Player; 2]; 2],
    mode: PairingMode,
    partners: &PairCounts,
) -> u32 {
    let (skill_w, partner_w, gender_w) = focus.weights();
    let repeats: u32 = sides.iter().map(|s| partners.get(s[0].id, s[1].id)).sum();
    let mismatches = sides.iter().filter(|s| !pair_suits_mode(s, mode)).count() as u32;
    skill_w * skill_gap + partner_w * repeats + gender_w * mismatches
}

/// Whether a pair has the gender make-up the pairing mode asks for.
fn pair_suits_mode(side: &[&Player; 2], mode: PairingMode) -> bool {
    let (a, b) = (side[0].gender, side[1].gender);
    match mode {
        PairingMode::Mixed => matches!(
            (a, b),
            (Gender::Male, Gender::Female) | (Gender::Female, Gender::Male)
        ),
        PairingMode::SameGender => a == b,
        PairingMode::Random => true,
    }
}
