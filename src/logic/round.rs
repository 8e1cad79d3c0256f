//! Round generation: sit-outs, courts, pairs, then counters and history.
//!
//! Stages run in order: validate, select sit-outs, group courts, pair courts,
//! update counters, commit. Any failure before the counter update leaves the
//! session exactly as it was.

use crate::logic::courts::{group_courts, Quartet};
use crate::logic::history::{co_court_counts, last_sit_outs, partner_counts, PairCounts};
use crate::logic::metrics::GenderCounts;
use crate::logic::pairs::{choose_pairs, PairSplit};
use crate::logic::sit_out::select_sit_outs;
use crate::models::{Court, Player, PlayerId, Round, Session, SessionError};
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

/// Extra players beyond court capacity kept in the sit-out search.
pub const SIT_SEARCH_LIMIT: usize = 4;

/// How many present players the round can actually use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoundCapacity {
    pub present: usize,
    /// Players who will be on court: a multiple of 4, at most 4 per available court.
    pub max_players: usize,
}

impl RoundCapacity {
    pub fn of(session: &Session) -> Result<Self, SessionError> {
        let present = session.available_players().count();
        if present < 4 {
            return Err(SessionError::NotEnoughPlayers { present });
        }
        let max_players = (present / 4 * 4).min(session.settings.courts_available * 4);
        if max_players < 4 {
            return Err(SessionError::NotEnoughPlayers { present });
        }
        Ok(Self {
            present,
            max_players,
        })
    }

    pub fn courts(&self) -> usize {
        self.max_players / 4
    }
}

/// Everything decided for a round before any state changes.
struct Plan {
    courts: Vec<Court>,
    playing: HashSet<PlayerId>,
    sitting: Vec<PlayerId>,
    sit_out_rationale: BTreeMap<PlayerId, String>,
}

/// Generate the next round, update counters and append it to the session.
///
/// `rng` only decides who is left out when more players are present than the
/// sit-out search takes; with the same seed and state the result is identical.
pub fn generate_round<'s, R: Rng + ?Sized>(
    session: &'s mut Session,
    rng: &mut R,
) -> Result<&'s Round, SessionError> {
    log::debug!("Validating round {}", session.next_round_number);
    let capacity = RoundCapacity::of(session)?;
    let plan = plan_round(session, capacity, rng)?;

    log::debug!("Updating counters");
    for player in session.players.iter_mut().filter(|p| p.is_available()) {
        if plan.playing.contains(&player.id) {
            player.record_game();
        } else if plan.sitting.contains(&player.id) {
            player.record_sit();
        }
    }

    let number = session.next_round_number;
    session.next_round_number += 1;
    let mut round = Round::new(number, plan.courts, plan.sitting);
    round.sit_out_rationale = plan.sit_out_rationale;
    log::info!(
        "Round {}: {} court(s), {} sitting out",
        number,
        round.courts.len(),
        round.sit_outs.len()
    );
    session.rounds.push(round);
    Ok(&session.rounds[session.rounds.len() - 1])
}

fn plan_round<R: Rng + ?Sized>(
    session: &Session,
    capacity: RoundCapacity,
    rng: &mut R,
) -> Result<Plan, SessionError> {
    let settings = &session.settings;
    let pool = candidate_pool(session, capacity, rng);
    let num_sit = pool.len() - capacity.max_players;

    let co_court = co_court_counts(&session.rounds);
    let partners = partner_counts(&session.rounds);
    let sat_last_round = last_sit_outs(&session.rounds);

    log::debug!("Selecting {} sit-out(s) from {} candidates", num_sit, pool.len());
    let selection = select_sit_outs(&pool, num_sit, settings, &co_court, &sat_last_round);
    let sitting: HashSet<PlayerId> = selection.sitters.iter().copied().collect();
    let play_pool: Vec<&Player> = pool
        .iter()
        .copied()
        .filter(|p| !sitting.contains(&p.id))
        .collect();
    if play_pool.len() != capacity.max_players {
        log::error!(
            "Play pool has {} players, expected {}",
            play_pool.len(),
            capacity.max_players
        );
        return Err(SessionError::InconsistentPlayPool {
            expected: capacity.max_players,
            actual: play_pool.len(),
        });
    }

    log::debug!("Grouping {} players into {} court(s)", play_pool.len(), capacity.courts());
    let quartets = group_courts(&play_pool, settings, &co_court);
    if quartets.is_empty() {
        return Err(SessionError::NoCourtsFormed);
    }
    let grouped = quartets.len() * 4;
    if grouped != play_pool.len() {
        log::error!("Grouped {} of {} players", grouped, play_pool.len());
        return Err(SessionError::InconsistentPlayPool {
            expected: play_pool.len(),
            actual: grouped,
        });
    }

    log::debug!("Pairing {} court(s)", quartets.len());
    let courts: Vec<Court> = quartets
        .iter()
        .enumerate()
        .map(|(i, quartet)| {
            let split = choose_pairs(&quartet.players, settings, &partners);
            let mut court = Court::new(i + 1, split.pairs);
            court.rationale = Some(describe_court(quartet, &split, &co_court));
            court
        })
        .collect();

    Ok(Plan {
        courts,
        playing: play_pool.iter().map(|p| p.id).collect(),
        sitting: selection.sitters,
        sit_out_rationale: selection.rationale,
    })
}

/// Present players considered this round. When more are present than courts
/// plus `SIT_SEARCH_LIMIT` can absorb, those with the fewest games are kept
/// (random tie-break) and the rest are left out without touching counters.
fn candidate_pool<'a, R: Rng + ?Sized>(
    session: &'a Session,
    capacity: RoundCapacity,
    rng: &mut R,
) -> Vec<&'a Player> {
    let available: Vec<&Player> = session.available_players().collect();
    let cap = capacity.max_players + SIT_SEARCH_LIMIT;
    if available.len() <= cap {
        return available;
    }
    let mut with_tiebreak: Vec<(&Player, u32)> =
        available.into_iter().map(|p| (p, rng.gen::<u32>())).collect();
    with_tiebreak.sort_by_key(|(p, t)| (p.games_played, *t));
    with_tiebreak.truncate(cap);
    log::debug!("Pool capped at {} of {} present players", cap, capacity.present);
    // Keep roster order so results do not depend on the tie-break beyond membership.
    let kept: HashSet<PlayerId> = with_tiebreak.iter().map(|(p, _)| p.id).collect();
    session
        .available_players()
        .filter(|p| kept.contains(&p.id))
        .collect()
}

fn describe_court(quartet: &Quartet<'_>, split: &PairSplit, co_court: &PairCounts) -> String {
    let genders = GenderCounts::of(quartet.players.iter().copied());
    let mut gender_parts = Vec::new();
    for (count, label) in [(genders.male, "M"), (genders.female, "F"), (genders.other, "O")] {
        if count > 0 {
            gender_parts.push(format!("{}{}", count, label));
        }
    }
    let min = quartet.players.iter().map(|p| p.skill).min().unwrap_or(0);
    let max = quartet.players.iter().map(|p| p.skill).max().unwrap_or(0);
    let repeats = co_court.sum_within(&quartet.ids());
    format!(
        "{}, skill {}-{}, {} repeat pairing(s) on court; sides {} v {}",
        gender_parts.join("/"),
        min,
        max,
        repeats,
        split.side_skill[0],
        split.side_skill[1]
    )
}
