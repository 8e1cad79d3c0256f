//! Shared fixtures for integration tests.
#![allow(dead_code)]

use court_rotation_web::{Gender, Player, PlayerId, Session, Settings};

/// Session with the given (name, gender, skill) players, all present.
pub fn present_session(players: &[(&str, Gender, i64)], settings: Settings) -> Session {
    let mut session = Session::with_settings(settings);
    for &(name, gender, skill) in players {
        let id = session.add_player(name, gender, skill).unwrap();
        session.set_present(id, true).unwrap();
    }
    session
}

/// `n` present players named P01.., gender Other, skill 5.
pub fn uniform_session(n: usize, settings: Settings) -> Session {
    let names: Vec<String> = (1..=n).map(|i| format!("P{i:02}")).collect();
    let specs: Vec<(&str, Gender, i64)> = names.iter().map(|n| (n.as_str(), Gender::Other, 5)).collect();
    present_session(&specs, settings)
}

pub fn player(id: PlayerId, name: &str, gender: Gender, skill: u8) -> Player {
    let mut p = Player::new(id, name, gender, skill);
    p.is_present = true;
    p
}

pub fn refs(players: &[Player]) -> Vec<&Player> {
    players.iter().collect()
}

pub fn sorted(mut ids: Vec<PlayerId>) -> Vec<PlayerId> {
    ids.sort_unstable();
    ids
}
