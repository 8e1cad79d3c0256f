//! Round, Court and Pair: one generated set of court assignments.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sequential round number, starting at 1.
pub type RoundNumber = u32;

/// Two partners on the same side of the net.
pub type Pair = [PlayerId; 2];

/// One court: four players split into two pairs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    /// 1-based, unique within a round.
    pub number: usize,
    pub players: [PlayerId; 4],
    pub pairs: [Pair; 2],
    /// Display-only explanation of why these four were grouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl Court {
    /// Build a court from its two pairs; the player list is the pairs flattened.
    pub fn new(number: usize, pairs: [Pair; 2]) -> Self {
        Self {
            number,
            players: [pairs[0][0], pairs[0][1], pairs[1][0], pairs[1][1]],
            pairs,
            rationale: None,
        }
    }
}

/// A committed round. Immutable once created apart from its rationale text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub number: RoundNumber,
    #[serde(default)]
    pub courts: Vec<Court>,
    #[serde(default)]
    pub sit_outs: Vec<PlayerId>,
    /// Display-only explanation per sitting player.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sit_out_rationale: BTreeMap<PlayerId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Round {
    pub fn new(number: RoundNumber, courts: Vec<Court>, sit_outs: Vec<PlayerId>) -> Self {
        Self {
            number,
            courts,
            sit_outs,
            sit_out_rationale: BTreeMap::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Ids of everyone on a court this round, in court order.
    pub fn playing_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.courts.iter().flat_map(|c| c.players.iter().copied())
    }

    pub fn is_sitting_out(&self, id: PlayerId) -> bool {
        self.sit_outs.contains(&id)
    }
}
