//! Play sessions captured from engine save states.

mod fingerprint;
pub(crate) mod save;
mod skill;
mod store;
pub(crate) mod types;

pub use fingerprint::SessionFingerprint;
pub use save::{META_ENTRY, STATS_ENTRY, SaveStateParser, SessionDraft, parse_status_line};
pub use skill::SkillTier;
pub use store::SessionStore;
pub use types::{LevelPlayStats, PlaySession, SCHEMA_VERSION, TICS_PER_SECOND};
