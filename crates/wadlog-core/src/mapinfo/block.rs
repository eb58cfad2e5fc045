//! Block grammar shared by MAPINFO and ZMAPINFO.

use std::sync::LazyLock;

use regex::Regex;

use super::is_string_reference;
use crate::names::LevelNameMap;

/// `map <ID> "<name>"` anywhere in the text
static QUOTED_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bmap\s+([^\s"{}]+)\s+"([^"\r\n]*)""#).expect("valid quoted map pattern")
});

/// `map <ID> ... { ... }` block body, for the newer brace syntax
static MAP_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bmap\s+([^\s"{}]+)[^{}\n]*?\s*\{([^}]*)\}"#).expect("valid map block pattern")
});

static LEVEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\blevelname\s*=\s*"([^"]*)""#).expect("valid levelname pattern")
});

pub(super) fn parse(text: &str, names: &mut LevelNameMap) {
    for caps in QUOTED_MAP.captures_iter(text) {
        let name = &caps[2];
        if !is_string_reference(name) {
            names.insert(&caps[1], name);
        }
    }

    // Ids without a quoted title may still carry one inside their block
    for caps in MAP_BLOCK.captures_iter(text) {
        if let Some(name_caps) = LEVEL_NAME.captures(&caps[2]) {
            let name = &name_caps[1];
            if !is_string_reference(name) {
                names.insert(&caps[1], name);
            }
        }
    }
}
