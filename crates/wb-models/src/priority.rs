//! Priority shared by projects and work items

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wb_core::config::PriorityWeights;

use crate::literal::ParseLiteralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub enum Priority {
    Critical,
    Major,
    #[default]
    Medium,
    Minor,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Critical,
        Priority::Major,
        Priority::Medium,
        Priority::Minor,
        Priority::Low,
    ];

    const LITERALS: &'static [&'static str] = &["Critical", "Major", "Medium", "Minor", "Low"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Major => "Major",
            Self::Medium => "Medium",
            Self::Minor => "Minor",
            Self::Low => "Low",
        }
    }

    /// Load weight of an open item with this priority
    pub fn weight(&self, weights: &PriorityWeights) -> f64 {
        match self {
            Self::Critical => weights.critical,
            Self::Major => weights.major,
            Self::Medium => weights.medium,
            Self::Minor => weights.minor,
            Self::Low => weights.low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseLiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Self::Critical),
            "Major" => Ok(Self::Major),
            "Medium" => Ok(Self::Medium),
            "Minor" => Ok(Self::Minor),
            "Low" => Ok(Self::Low),
            other => Err(ParseLiteralError::new("priority", other, Self::LITERALS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("Major".parse::<Priority>(), Ok(Priority::Major));
        assert!("major".parse::<Priority>().is_err());
        assert!("Urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_literals_match_display() {
        for priority in Priority::ALL {
            assert_eq!(priority.to_string().parse::<Priority>(), Ok(priority));
        }
    }

    #[test]
    fn test_default_weights() {
        let weights = PriorityWeights::default();
        assert_eq!(Priority::Critical.weight(&weights), 2.0);
        assert_eq!(Priority::Minor.weight(&weights), 0.75);
        assert_eq!(Priority::Low.weight(&weights), 0.5);
    }
}
