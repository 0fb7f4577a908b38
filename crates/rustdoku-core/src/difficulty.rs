use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty tier. Drives only the number of cells revealed at puzzle
/// start; the generation algorithm is identical across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Hard,
    Expert,
}

impl Difficulty {
    /// Base number of revealed (prefilled) cells for this tier. The deriver
    /// adds a random offset of up to [`crate::REVEAL_OFFSET_MAX`] on top.
    pub const fn reveal_count(self) -> usize {
        match self {
            Difficulty::Beginner => 36,
            Difficulty::Intermediate => 32,
            Difficulty::Hard => 28,
            Difficulty::Expert => 24,
        }
    }

    /// All tiers, easiest first.
    pub const fn all() -> [Difficulty; 4] {
        [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!(
                "unknown difficulty '{other}' (expected beginner, intermediate, hard, or expert)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_counts() {
        assert_eq!(Difficulty::Beginner.reveal_count(), 36);
        assert_eq!(Difficulty::Intermediate.reveal_count(), 32);
        assert_eq!(Difficulty::Hard.reveal_count(), 28);
        assert_eq!(Difficulty::Expert.reveal_count(), 24);
    }

    #[test]
    fn parse_round_trip() {
        for tier in Difficulty::all() {
            assert_eq!(tier.to_string().parse::<Difficulty>(), Ok(tier));
        }
        assert_eq!("EXPERT".parse::<Difficulty>(), Ok(Difficulty::Expert));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
    }
}
