use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// Engine difficulty tier, easiest first
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum SkillTier {
    #[strum(serialize = "itytd")]
    #[serde(rename = "itytd")]
    TooYoungToDie = 0,
    #[strum(serialize = "hntr")]
    #[serde(rename = "hntr")]
    NotTooRough = 1,
    #[default]
    #[strum(serialize = "hmp")]
    #[serde(rename = "hmp")]
    HurtMePlenty = 2,
    #[strum(serialize = "uv")]
    #[serde(rename = "uv")]
    UltraViolence = 3,
    #[strum(serialize = "nm")]
    #[serde(rename = "nm")]
    Nightmare = 4,
}

impl SkillTier {
    /// Map an engine difficulty code (0-4); anything else is `None`
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Persisted identifier (e.g., "uv")
    pub fn id(&self) -> &'static str {
        self.into()
    }

    /// Full in-game name
    pub fn label(&self) -> &'static str {
        match self {
            Self::TooYoungToDie => "I'm Too Young To Die",
            Self::NotTooRough => "Hey, Not Too Rough",
            Self::HurtMePlenty => "Hurt Me Plenty",
            Self::UltraViolence => "Ultra-Violence",
            Self::Nightmare => "Nightmare!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(SkillTier::from_code(0), Some(SkillTier::TooYoungToDie));
        assert_eq!(SkillTier::from_code(3), Some(SkillTier::UltraViolence));
        assert_eq!(SkillTier::from_code(4), Some(SkillTier::Nightmare));
        assert_eq!(SkillTier::from_code(5), None);
        assert_eq!(SkillTier::from_code(-1), None);
        assert_eq!(SkillTier::default().code(), 2);
    }

    #[test]
    fn test_ids_round_trip() {
        assert_eq!(SkillTier::UltraViolence.id(), "uv");
        assert_eq!(SkillTier::UltraViolence.label(), "Ultra-Violence");
        assert_eq!("hmp".parse::<SkillTier>().unwrap(), SkillTier::HurtMePlenty);
        assert_eq!(
            serde_json::to_string(&SkillTier::Nightmare).unwrap(),
            "\"nm\""
        );
        assert_eq!(
            serde_json::from_str::<SkillTier>("\"itytd\"").unwrap(),
            SkillTier::TooYoungToDie
        );
    }

    #[test]
    fn test_ordering_follows_difficulty() {
        assert!(SkillTier::TooYoungToDie < SkillTier::Nightmare);
        assert!(SkillTier::HurtMePlenty < SkillTier::UltraViolence);
    }
}
