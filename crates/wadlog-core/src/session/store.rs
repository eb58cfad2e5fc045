use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ledger::SaveSource;
use crate::lock::lock_unpoisoned;
use crate::names::{LevelNameMap, LevelNameResolver};
use crate::session::{PlaySession, SaveStateParser, SessionDraft};
use crate::storage::{StatsLayout, write_atomic};

/// Captures save states into deduplicated session files and reads them back.
///
/// Shares the resolver's per-slug locks, so a capture never interleaves with
/// name resolution for the same slug.
pub struct SessionStore {
    resolver: Arc<LevelNameResolver>,
    saves: Arc<dyn SaveSource>,
    parser: SaveStateParser,
}

impl SessionStore {
    pub fn new(resolver: Arc<LevelNameResolver>, saves: Arc<dyn SaveSource>) -> Self {
        let parser = SaveStateParser::new(*resolver.limits());
        Self {
            resolver,
            saves,
            parser,
        }
    }

    pub fn layout(&self) -> &StatsLayout {
        self.resolver.layout()
    }

    /// Capture every save file for a slug. Returns the number of new sessions.
    ///
    /// Unreadable saves are skipped. Failing to write a session or the
    /// level-name map is an error.
    pub fn capture(&self, slug: &str) -> Result<usize> {
        let lock = self.resolver.locks().for_slug(slug);
        let _guard = lock_unpoisoned(&lock);

        let files = self.saves.save_files(slug)?;
        debug!("Capturing {} with {} save files", slug, files.len());

        let mut names = self.resolver.resolve_locked(slug)?.unwrap_or_default();
        let mut names_changed = false;
        let mut captured = 0;

        for path in &files {
            let draft = match self.parser.parse_file(path, slug) {
                Ok(Some(draft)) => draft,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping save {}: {}", path.display(), e);
                    continue;
                }
            };

            if merge_discovered(&mut names, &draft) > 0 {
                names_changed = true;
            }

            let mut session = draft.into_session(modified_time(path));
            session.backfill_names(&names);

            let fingerprint = session.fingerprint().to_string();
            let session_path = self.layout().session_path(slug, &fingerprint);
            if session_path.exists() {
                debug!("Session {} already captured", fingerprint);
                continue;
            }

            let content = serde_json::to_vec_pretty(&session)?;
            write_atomic(&session_path, &content)?;
            info!(
                "Captured session {} from {} ({} levels)",
                fingerprint,
                session.source_file,
                session.levels.len()
            );
            captured += 1;
        }

        if names_changed {
            self.resolver.store_locked(slug, &names)?;
        }

        Ok(captured)
    }

    /// Every valid persisted session for a slug, with display names filled
    /// from the current level-name map. Invalid files are skipped.
    pub fn load_all(&self, slug: &str) -> Result<Vec<PlaySession>> {
        let lock = self.resolver.locks().for_slug(slug);
        let _guard = lock_unpoisoned(&lock);

        let names = match self.resolver.resolve_locked(slug) {
            Ok(names) => names.unwrap_or_default(),
            Err(e) => {
                warn!("Level names for {} unavailable: {}", slug, e);
                LevelNameMap::new()
            }
        };

        let mut sessions = Vec::new();
        for path in self.layout().session_files(slug)? {
            match load_session(&path, slug) {
                Ok(mut session) => {
                    session.backfill_names(&names);
                    sessions.push(session);
                }
                Err(e) => warn!("Skipping session file {}: {}", path.display(), e),
            }
        }

        debug!("Loaded {} sessions for {}", sessions.len(), slug);
        Ok(sessions)
    }
}

/// Add names the save knows and the map does not. Returns the number added.
fn merge_discovered(names: &mut LevelNameMap, draft: &SessionDraft) -> usize {
    draft
        .discovered_names()
        .filter(|(id, name)| id != name)
        .map(|(id, name)| names.insert(id, name))
        .filter(|&added| added)
        .count()
}

fn load_session(path: &Path, slug: &str) -> Result<PlaySession> {
    let content = fs::read(path)?;
    let session: PlaySession = serde_json::from_slice(&content).map_err(|e| Error::Validation {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    session.validate(slug).map_err(|message| Error::Validation {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(session)
}

fn modified_time(path: &Path) -> DateTime<Utc> {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => DateTime::<Utc>::from(time),
        Err(e) => {
            debug!("No modification time for {}: {}", path.display(), e);
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::ledger::{JsonLedger, SaveDir};
    use crate::session::SkillTier;
    use crate::session::save::test_support::{build_save, globals_json};
    use crate::session::types::test_support::{level, session};
    use crate::wad::test_support::build_wad;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("downloads")).unwrap();
            fs::create_dir_all(dir.path().join("saves").join("sunlust")).unwrap();
            Self { dir }
        }

        fn add_save(&self, file_name: &str, content: &[u8]) -> std::path::PathBuf {
            let path = self.dir.path().join("saves").join("sunlust").join(file_name);
            fs::write(&path, content).unwrap();
            path
        }

        fn store(&self, ledger: &[(&str, &str)]) -> SessionStore {
            let ledger = JsonLedger::from_entries(
                self.dir.path().join("downloads"),
                ledger
                    .iter()
                    .map(|(slug, file)| (slug.to_string(), file.to_string())),
            );
            let resolver = LevelNameResolver::with_layout(
                StatsLayout::new(self.dir.path().join("stats")),
                Arc::new(ledger),
                Limits::default(),
            );
            SessionStore::new(
                Arc::new(resolver),
                Arc::new(SaveDir::new(self.dir.path().join("saves"))),
            )
        }
    }

    #[test]
    fn test_capture_is_idempotent() {
        let fx = Fixture::new();
        fx.add_save("save01.zds", &build_save(&globals_json(3, &[("MAP01", 10, 5000)]), None));
        fx.add_save(
            "save02.zds",
            &build_save(&globals_json(3, &[("MAP01", 10, 5000), ("MAP02", 7, 900)]), None),
        );
        let store = fx.store(&[]);

        assert_eq!(store.capture("sunlust").unwrap(), 2);
        assert_eq!(store.capture("sunlust").unwrap(), 0);
        assert_eq!(store.load_all("sunlust").unwrap().len(), 2);
    }

    #[test]
    fn test_identical_saves_yield_one_session() {
        let fx = Fixture::new();
        let globals = globals_json(3, &[("MAP01", 10, 5000)]);
        fx.add_save("auto01.zds", &build_save(&globals, None));
        fx.add_save("save07.zds", &build_save(&globals, Some("MAP01 - Entryway")));
        let store = fx.store(&[]);

        assert_eq!(store.capture("sunlust").unwrap(), 1);
        let sessions = store.load_all("sunlust").unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].source_file, "auto01.zds");
    }

    #[test]
    fn test_corrupt_save_skipped() {
        let fx = Fixture::new();
        fx.add_save("broken.zds", b"not a zip");
        fx.add_save("save01.zds", &build_save(&globals_json(2, &[("E1M1", 4, 350)]), None));
        let store = fx.store(&[]);

        assert_eq!(store.capture("sunlust").unwrap(), 1);
    }

    #[test]
    fn test_missing_save_dir_captures_nothing() {
        let fx = Fixture::new();
        let store = fx.store(&[]);
        assert_eq!(store.capture("eviternity").unwrap(), 0);
        assert!(store.load_all("eviternity").unwrap().is_empty());
    }

    #[test]
    fn test_names_from_installed_content() {
        let fx = Fixture::new();
        fs::write(
            fx.dir.path().join("downloads").join("sunlust.wad"),
            build_wad(b"PWAD", &[("MAPINFO", b"map MAP01 \"Entryway\"")]),
        )
        .unwrap();
        fx.add_save("save01.zds", &build_save(&globals_json(3, &[("MAP01", 10, 5000)]), None));
        let store = fx.store(&[("sunlust", "sunlust.wad")]);

        store.capture("sunlust").unwrap();
        let sessions = store.load_all("sunlust").unwrap();
        assert_eq!(sessions[0].levels[0].name, "Entryway");
    }

    #[test]
    fn test_status_line_name_shared_across_saves() {
        let fx = Fixture::new();
        fx.add_save(
            "save01.zds",
            &build_save(&globals_json(3, &[("MAP02", 10, 5000)]), Some("MAP02 - Underhalls")),
        );
        fx.add_save("save02.zds", &build_save(&globals_json(4, &[("MAP02", 12, 4000)]), None));
        let store = fx.store(&[]);

        assert_eq!(store.capture("sunlust").unwrap(), 2);

        let names =
            LevelNameMap::load_from_path(store.layout().level_names_path("sunlust")).unwrap();
        assert_eq!(names.get("MAP02"), Some("Underhalls"));

        for session in store.load_all("sunlust").unwrap() {
            assert_eq!(session.levels[0].name, "Underhalls");
        }
    }

    #[test]
    fn test_captured_at_is_file_mtime() {
        let fx = Fixture::new();
        let path = fx.add_save("save01.zds", &build_save(&globals_json(3, &[("MAP01", 1, 1)]), None));
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
            .unwrap();
        drop(file);

        let store = fx.store(&[]);
        store.capture("sunlust").unwrap();
        let sessions = store.load_all("sunlust").unwrap();
        assert_eq!(sessions[0].captured_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_session_write_failure_is_returned() {
        let fx = Fixture::new();
        fx.add_save("save01.zds", &build_save(&globals_json(3, &[("MAP01", 10, 5000)]), None));
        // A plain file where the stats directory should be
        fs::write(fx.dir.path().join("stats"), b"").unwrap();
        let store = fx.store(&[]);

        assert!(store.capture("sunlust").is_err());
    }

    #[test]
    fn test_load_all_skips_invalid_and_backfills_in_memory() {
        let fx = Fixture::new();
        let store = fx.store(&[]);
        let layout = store.layout();

        let good = session("sunlust", SkillTier::UltraViolence, vec![level("MAP01", 10, 5000)]);
        let good_path = layout.session_path("sunlust", &good.fingerprint().to_string());
        write_atomic(&good_path, &serde_json::to_vec(&good).unwrap()).unwrap();

        let foreign = session("eviternity", SkillTier::UltraViolence, vec![level("MAP01", 1, 1)]);
        write_atomic(
            &layout.session_path("sunlust", "00000000000000aa"),
            &serde_json::to_vec(&foreign).unwrap(),
        )
        .unwrap();
        write_atomic(&layout.session_path("sunlust", "00000000000000bb"), b"{oops").unwrap();

        let mut names = LevelNameMap::new();
        names.insert("MAP01", "Entryway");
        names
            .save_to_path(layout.level_names_path("sunlust"))
            .unwrap();

        let sessions = store.load_all("sunlust").unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].levels[0].name, "Entryway");

        let on_disk: PlaySession =
            serde_json::from_slice(&fs::read(&good_path).unwrap()).unwrap();
        assert_eq!(on_disk.levels[0].name, "MAP01");
    }
}
