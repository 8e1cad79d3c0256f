//! Doubles court rotation web app: library with models, round engine and storage.

pub mod logic;
pub mod models;
pub mod roster;
pub mod storage;

pub use logic::{
    choose_pairs, co_court_counts, generate_round, group_courts, partner_counts, select_sit_outs,
    PairCounts, SitOutSelection,
};
pub use models::{
    Court, Gender, PairingMode, Player, PlayerId, PlayerUpdate, RotationFocus, Round,
    Session, SessionError, Settings, SkillMode, UniquenessImportance,
};
pub use roster::{import_roster_csv, ImportReport, RosterError};
pub use storage::{CommitError, Storage, StorageError};
