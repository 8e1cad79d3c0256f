//! Integration tests for roster management on the session.

use court_rotation_web::{Gender, PlayerUpdate, Session, SessionError, Settings};
use court_rotation_web::models::MAX_COURTS;

#[test]
fn add_player_assigns_increasing_ids() {
    let mut s = Session::new();
    let a = s.add_player("  Ann ", Gender::Female, 7).unwrap();
    let b = s.add_player("Bob", Gender::Male, 3).unwrap();
    assert_eq!((a, b), (1, 2));
    let ann = s.get_player(a).unwrap();
    assert_eq!(ann.name, "Ann");
    assert_eq!(ann.skill, 7);
    assert!(!ann.is_present);
    assert_eq!((ann.games_played, ann.sits), (0, 0));
}

#[test]
fn add_player_validates_name_and_skill() {
    let mut s = Session::new();
    assert_eq!(s.add_player("   ", Gender::Other, 5), Err(SessionError::EmptyName));
    assert_eq!(s.add_player("Zed", Gender::Other, 0), Err(SessionError::InvalidSkill(0)));
    assert_eq!(s.add_player("Zed", Gender::Other, 11), Err(SessionError::InvalidSkill(11)));
    s.add_player("Zed", Gender::Other, 10).unwrap();
    assert_eq!(
        s.add_player("zed", Gender::Other, 4),
        Err(SessionError::DuplicatePlayerName)
    );
    assert!(s.players.len() == 1);
}

#[test]
fn archived_ids_are_never_reused_and_name_frees_up() {
    let mut s = Session::new();
    let old = s.add_player("Kim", Gender::Female, 5).unwrap();
    s.set_present(old, true).unwrap();
    s.archive_player(old).unwrap();
    let archived = s.get_player(old).unwrap();
    assert!(archived.is_archived);
    assert!(!archived.is_present);

    let new = s.add_player("Kim", Gender::Female, 6).unwrap();
    assert!(new > old);
    assert_eq!(s.player_name(old), Some("Kim"));
}

#[test]
fn archived_players_cannot_be_made_present_or_edited() {
    let mut s = Session::new();
    let id = s.add_player("Lee", Gender::Male, 5).unwrap();
    s.archive_player(id).unwrap();
    assert_eq!(s.set_present(id, true), Err(SessionError::PlayerArchived(id)));
    assert_eq!(s.set_happy_to_sit(id, true), Err(SessionError::PlayerArchived(id)));
    assert!(s.set_present(id, false).is_ok());
    assert_eq!(s.set_present(99, true), Err(SessionError::PlayerNotFound(99)));
}

#[test]
fn update_player_changes_only_given_fields() {
    let mut s = Session::new();
    let id = s.add_player("Max", Gender::Male, 5).unwrap();
    s.add_player("Nia", Gender::Female, 5).unwrap();
    s.update_player(
        id,
        PlayerUpdate {
            skill: Some(8),
            ..PlayerUpdate::default()
        },
    )
    .unwrap();
    let max = s.get_player(id).unwrap();
    assert_eq!((max.name.as_str(), max.gender, max.skill), ("Max", Gender::Male, 8));

    let clash = PlayerUpdate {
        name: Some("NIA".to_string()),
        ..PlayerUpdate::default()
    };
    assert_eq!(s.update_player(id, clash), Err(SessionError::DuplicatePlayerName));
    let same = PlayerUpdate {
        name: Some("max".to_string()),
        ..PlayerUpdate::default()
    };
    s.update_player(id, same).unwrap();
    assert_eq!(s.get_player(id).unwrap().name, "max");
}

#[test]
fn settings_reject_bad_court_counts() {
    let mut s = Session::new();
    let bad = Settings {
        courts_available: MAX_COURTS + 1,
        ..Settings::default()
    };
    assert_eq!(s.set_settings(bad), Err(SessionError::InvalidCourtCount(MAX_COURTS + 1)));
    let ok = Settings {
        courts_available: 2,
        ..Settings::default()
    };
    s.set_settings(ok.clone()).unwrap();
    assert_eq!(s.settings, ok);
}

#[test]
fn new_day_keeps_roster_and_settings() {
    let settings = Settings {
        courts_available: 3,
        ..Settings::default()
    };
    let mut s = Session::with_settings(settings.clone());
    let id = s.add_player("Ora", Gender::Female, 5).unwrap();
    s.set_present(id, true).unwrap();
    s.set_happy_to_sit(id, true).unwrap();
    s.players[0].games_played = 4;
    s.players[0].sits = 2;
    s.next_round_number = 9;

    s.new_day();
    let ora = s.get_player(id).unwrap();
    assert_eq!((ora.games_played, ora.sits, ora.is_present), (0, 0, false));
    assert!(ora.happy_to_sit);
    assert_eq!(s.settings, settings);
    assert_eq!(s.next_round_number, 1);
    assert_eq!(s.next_player_id, 2);
}
