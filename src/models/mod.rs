//! Data structures for court rotation: players, rounds, settings, session state.

mod lenient;
mod player;
mod round;
mod session;
mod settings;

pub use player::{Gender, Player, PlayerId, DEFAULT_SKILL, MAX_SKILL, MIN_SKILL};
pub use round::{Court, Pair, Round, RoundNumber};
pub use session::{PlayerUpdate, Session, SessionError};
pub use settings::{
    PairingMode, RotationFocus, Settings, SkillMode, UniquenessImportance, MAX_COURTS,
};
