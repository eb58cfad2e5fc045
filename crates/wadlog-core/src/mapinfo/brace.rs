//! Brace grammar (UMAPINFO).
//!
//! A line starting with `MAP <ID>` makes `<ID>` current; any later
//! `levelname = "..."` line names it. Closing braces are not tracked, so a
//! stray `levelname` after a block still lands on the previous id.

use std::sync::LazyLock;

use regex::Regex;

use crate::names::LevelNameMap;

static MAP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*map\s+([A-Za-z0-9_]+)").expect("valid map line pattern"));

/// Quoted or bare value; a bare value runs to `}` or end of line
static LEVEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\blevelname\s*=\s*(?:"([^"]*)"|([^\s"}][^}]*))"#)
        .expect("valid levelname pattern")
});

pub(super) fn parse(text: &str, names: &mut LevelNameMap) {
    let mut current: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = MAP_LINE.captures(line) {
            current = Some(caps[1].to_string());
        }

        let Some(id) = current.as_deref() else {
            continue;
        };

        if let Some(caps) = LEVEL_NAME.captures(line) {
            let value = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().trim());
            if let Some(value) = value {
                names.insert(id, value);
            }
        }
    }
}
