//! Section grammar (EMAPINFO).
//!
//! ```text
//! [MAP01]
//! levelname = MAP01: Entryway
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::names::{LevelNameMap, canonical_id};

static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*([^\]\s]+)\s*\]$").expect("valid section pattern"));

static LEVEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^levelname\s*=\s*(.*)$").expect("valid levelname pattern"));

pub(super) fn parse(text: &str, names: &mut LevelNameMap) {
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();

        if let Some(caps) = SECTION.captures(line) {
            current = Some(canonical_id(&caps[1]));
            continue;
        }

        let Some(id) = current.as_deref() else {
            continue;
        };

        if let Some(caps) = LEVEL_NAME.captures(line) {
            let value = unquote(caps[1].trim());
            names.insert(id, strip_id_prefix(value, id));
        }
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Drop a leading `"<ID>:"` from a title such as `MAP01: Entryway`
fn strip_id_prefix<'a>(value: &'a str, id: &str) -> &'a str {
    let Some(head) = value.get(..id.len()) else {
        return value;
    };
    if !head.eq_ignore_ascii_case(id) {
        return value;
    }
    match value[id.len()..].trim_start().strip_prefix(':') {
        Some(rest) => rest.trim_start(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str) -> LevelNameMap {
        let mut names = LevelNameMap::new();
        parse(text, &mut names);
        names
    }

    #[test]
    fn test_prefix_stripped() {
        let names = parse_text("[MAP01]\nlevelname = MAP01: Entryway\n");
        assert_eq!(names.get("MAP01"), Some("Entryway"));
    }

    #[test]
    fn test_prefix_case_insensitive() {
        let names = parse_text("[map02]\nlevelname = Map02:Underhalls\n");
        assert_eq!(names.get("MAP02"), Some("Underhalls"));
    }

    #[test]
    fn test_other_prefix_kept() {
        let names = parse_text("[MAP03]\nlevelname = MAP30: Icon of Sin\n");
        assert_eq!(names.get("MAP03"), Some("MAP30: Icon of Sin"));
    }

    #[test]
    fn test_multiple_sections_and_other_keys() {
        let names = parse_text(
            "[E1M1]\nmusic = D_E1M1\nlevelname = Hangar\n\n[E1M2]\nLEVELNAME = \"Nuclear Plant\"\n",
        );
        assert_eq!(names.get("E1M1"), Some("Hangar"));
        assert_eq!(names.get("E1M2"), Some("Nuclear Plant"));
    }

    #[test]
    fn test_levelname_outside_section_ignored() {
        let names = parse_text("levelname = Orphan\n[MAP01]\n");
        assert!(names.is_empty());
    }

    #[test]
    fn test_first_assignment_wins() {
        let names = parse_text("[MAP01]\nlevelname = One\n[MAP01]\nlevelname = Two\n");
        assert_eq!(names.get("MAP01"), Some("One"));
    }
}
