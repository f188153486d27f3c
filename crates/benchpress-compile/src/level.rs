//! Optimization levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compiler effort, from `O0` (translate only) to `O3` (most effort).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OptimizationLevel {
    O0,
    #[default]
    O1,
    O2,
    O3,
}

impl OptimizationLevel {
    /// All levels in increasing order.
    pub const ALL: [OptimizationLevel; 4] = [Self::O0, Self::O1, Self::O2, Self::O3];

    /// Numeric value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for OptimizationLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::O0),
            1 => Ok(Self::O1),
            2 => Ok(Self::O2),
            3 => Ok(Self::O3),
            _ => Err(format!("optimization level must be 0..=3, got {level}")),
        }
    }
}

impl From<OptimizationLevel> for u8 {
    fn from(level: OptimizationLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from() {
        assert_eq!(OptimizationLevel::try_from(2), Ok(OptimizationLevel::O2));
        assert!(OptimizationLevel::try_from(4).is_err());
        assert_eq!(OptimizationLevel::default(), OptimizationLevel::O1);
    }

    #[test]
    fn test_serde_as_integer() {
        assert_eq!(serde_json::to_string(&OptimizationLevel::O3).unwrap(), "3");
        let level: OptimizationLevel = serde_json::from_str("0").unwrap();
        assert_eq!(level, OptimizationLevel::O0);
        assert!(serde_json::from_str::<OptimizationLevel>("7").is_err());
    }
}
