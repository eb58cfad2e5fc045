//! Level names from the `[STRINGS]` section of a DEHACKED patch.
//!
//! `HUSTR_<n>` (1..=32) names `MAP<nn>`; `HUSTR_E<x>M<y>` names `E<x>M<y>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::names::LevelNameMap;

/// Highest map number with an `HUSTR_<n>` string
const MAX_NUMBERED_MAP: u32 = 32;

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^HUSTR_(\d+)\s*=\s*(.+)$").expect("valid HUSTR pattern"));

static EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^HUSTR_(E\d+M\d+)\s*=\s*(.+)$").expect("valid HUSTR episode pattern")
});

pub(super) fn parse(text: &str, names: &mut LevelNameMap) {
    let mut in_strings = false;

    for line in text.lines() {
        let line = line.trim();

        if line.starts_with('[') {
            in_strings = line.eq_ignore_ascii_case("[STRINGS]");
            continue;
        }
        if !in_strings {
            continue;
        }

        if let Some(caps) = NUMBERED.captures(line) {
            let num = caps[1].parse::<u32>().unwrap_or(0);
            if (1..=MAX_NUMBERED_MAP).contains(&num) {
                names.insert(&format!("MAP{:02}", num), &caps[2]);
            }
        } else if let Some(caps) = EPISODE.captures(line) {
            names.insert(&caps[1], &caps[2]);
        }
    }
}
