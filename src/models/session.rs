//! Session: the single persisted document (roster, rounds, settings).

use crate::models::lenient;
use crate::models::player::{Gender, Player, PlayerId, MAX_SKILL, MIN_SKILL};
use crate::models::round::{Round, RoundNumber};
use crate::models::settings::{Settings, MAX_COURTS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Errors that can occur during session operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// Player name is empty after trimming.
    EmptyName,
    /// A non-archived player with this name already exists (case-insensitive).
    DuplicatePlayerName,
    /// Skill must be within 1..=10.
    InvalidSkill(i64),
    PlayerNotFound(PlayerId),
    /// Archived players cannot be marked present or edited.
    PlayerArchived(PlayerId),
    /// Fewer than 4 present players, or not enough to fill one court.
    NotEnoughPlayers { present: usize },
    /// Court grouping produced nothing to play on.
    NoCourtsFormed,
    /// The play pool did not match the court capacity. Indicates a selector bug.
    InconsistentPlayPool { expected: usize, actual: usize },
    /// Courts available must be within 1..=5.
    InvalidCourtCount(usize),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::EmptyName => write!(f, "Player name cannot be empty"),
            SessionError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            SessionError::InvalidSkill(skill) => {
                write!(f, "Skill must be between {} and {} (got {})", MIN_SKILL, MAX_SKILL, skill)
            }
            SessionError::PlayerNotFound(_) => write!(f, "Player not found"),
            SessionError::PlayerArchived(_) => write!(f, "Player is archived"),
            SessionError::NotEnoughPlayers { present } => {
                write!(f, "Need at least 4 present players to generate a round (have {})", present)
            }
            SessionError::NoCourtsFormed => write!(f, "Could not form any courts"),
            SessionError::InconsistentPlayPool { expected, actual } => write!(
                f,
                "Internal error: expected {} players on court, selected {}",
                expected, actual
            ),
            SessionError::InvalidCourtCount(n) => {
                write!(f, "Courts available must be between 1 and {} (got {})", MAX_COURTS, n)
            }
        }
    }
}

impl std::error::Error for SessionError {}

fn first_round() -> RoundNumber {
    1
}

fn first_player_id() -> PlayerId {
    1
}

/// Partial edit of a player's profile. `None` keeps the current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub skill: Option<i64>,
}

/// Full session state: roster, round log, settings and counters.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub players: Vec<Player>,
    /// Oldest first.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub rounds: Vec<Round>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub settings: Settings,
    /// Zero when unreadable; `normalize` moves it past the last round.
    #[serde(default = "first_round", deserialize_with = "lenient::count")]
    pub next_round_number: RoundNumber,
    #[serde(default = "first_player_id", deserialize_with = "lenient::count")]
    pub next_player_id: PlayerId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty roster, no rounds, default settings.
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            rounds: Vec::new(),
            settings: Settings::default(),
            next_round_number: first_round(),
            next_player_id: first_player_id(),
        }
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::new()
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Present, non-archived players in roster order.
    pub fn available_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| p.is_available())
    }

    /// Player name for display; archived players keep theirs.
    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.get_player(id).map(|p| p.name.as_str())
    }

    /// Add a player and return the new id. Names are unique among non-archived
    /// players (case-insensitive).
    pub fn add_player(
        &mut self,
        name: &str,
        gender: Gender,
        skill: i64,
    ) -> Result<PlayerId, SessionError> {
        let name = self.validate_name(name, None)?;
        let skill = validate_skill(skill)?;
        let id = self.next_player_id;
        self.next_player_id += 1;
        log::debug!("Adding player {} ({})", id, name);
        self.players.push(Player::new(id, name, gender, skill));
        Ok(id)
    }

    /// Edit name, gender or skill of an existing, non-archived player.
    pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> Result<(), SessionError> {
        let name = match update.name.as_deref() {
            Some(name) => Some(self.validate_name(name, Some(id))?),
            None => None,
        };
        let skill = update.skill.map(validate_skill).transpose()?;
        let player = self.active_player_mut(id)?;
        if let Some(name) = name {
            player.name = name;
        }
        if let Some(gender) = update.gender {
            player.gender = gender;
        }
        if let Some(skill) = skill {
            player.skill = skill;
        }
        Ok(())
    }

    pub fn set_present(&mut self, id: PlayerId, present: bool) -> Result<(), SessionError> {
        let player = self
            .get_player_mut(id)
            .ok_or(SessionError::PlayerNotFound(id))?;
        if player.is_archived && present {
            return Err(SessionError::PlayerArchived(id));
        }
        player.is_present = present;
        Ok(())
    }

    pub fn set_happy_to_sit(&mut self, id: PlayerId, happy: bool) -> Result<(), SessionError> {
        self.active_player_mut(id)?.happy_to_sit = happy;
        Ok(())
    }

    /// Soft-delete: the player leaves selection but keeps appearing in old rounds.
    pub fn archive_player(&mut self, id: PlayerId) -> Result<(), SessionError> {
        self.get_player_mut(id)
            .ok_or(SessionError::PlayerNotFound(id))?
            .archive();
        Ok(())
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<(), SessionError> {
        if settings.courts_available == 0 || settings.courts_available > MAX_COURTS {
            return Err(SessionError::InvalidCourtCount(settings.courts_available));
        }
        self.settings = settings;
        Ok(())
    }

    /// Start a new day: clear rounds, restart numbering at 1, zero games and
    /// sits, mark everyone absent. Roster and settings are kept.
    pub fn new_day(&mut self) {
        self.rounds.clear();
        self.next_round_number = first_round();
        for p in &mut self.players {
            p.games_played = 0;
            p.sits = 0;
            p.is_present = false;
        }
        log::info!("New day: cleared rounds, reset {} players", self.players.len());
    }

    /// Repair a loaded document: clamp player fields, give id-less or clashing
    /// players fresh ids, and move counters past anything already used.
    ///
    /// Rounds are never rewritten. When two players share an id, the round log
    /// stays with the first of them and the renumbered one starts with no
    /// co-court or partner history.
    pub fn normalize(&mut self) {
        let max_id = self.players.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_player_id = self.next_player_id.max(max_id + 1);
        let in_history: HashSet<PlayerId> = self
            .rounds
            .iter()
            .flat_map(|r| r.playing_ids().chain(r.sit_outs.iter().copied()))
            .collect();
        let mut seen = HashSet::new();
        for p in &mut self.players {
            p.normalize();
            if p.id == 0 || !seen.insert(p.id) {
                log::warn!("Player {:?} had a missing or duplicate id, assigning {}", p.name, self.next_player_id);
                if in_history.contains(&p.id) {
                    log::warn!(
                        "Rounds that mention id {} stay with the first player holding it; {:?} keeps no round history",
                        p.id,
                        p.name
                    );
                }
                p.id = self.next_player_id;
                self.next_player_id += 1;
                seen.insert(p.id);
            }
        }
        let max_round = self.rounds.iter().map(|r| r.number).max().unwrap_or(0);
        self.next_round_number = self.next_round_number.max(max_round + 1);
        if self.settings.courts_available == 0 || self.settings.courts_available > MAX_COURTS {
            self.settings.courts_available = MAX_COURTS;
        }
    }

    fn active_player_mut(&mut self, id: PlayerId) -> Result<&mut Player, SessionError> {
        let player = self
            .get_player_mut(id)
            .ok_or(SessionError::PlayerNotFound(id))?;
        if player.is_archived {
            return Err(SessionError::PlayerArchived(id));
        }
        Ok(player)
    }

    /// Trimmed name, unique among non-archived players other than `except`.
    fn validate_name(&self, name: &str, except: Option<PlayerId>) -> Result<String, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let is_duplicate = self
            .players
            .iter()
            .filter(|p| !p.is_archived && Some(p.id) != except)
            .any(|p| p.name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(SessionError::DuplicatePlayerName);
        }
        Ok(name.to_string())
    }
}

fn validate_skill(skill: i64) -> Result<u8, SessionError> {
    if skill < MIN_SKILL as i64 || skill > MAX_SKILL as i64 {
        return Err(SessionError::InvalidSkill(skill));
    }
    Ok(skill as u8)
}
