use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Street-network travel mode requested by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetNetworkMode {
    Walking,
    Bike,
    Car,
    /// Bike sharing system.
    Bss,
}

impl StreetNetworkMode {
    pub const ALL: [Self; 4] = [Self::Walking, Self::Bike, Self::Car, Self::Bss];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Bike => "bike",
            Self::Car => "car",
            Self::Bss => "bss",
        }
    }
}

impl Display for StreetNetworkMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreetNetworkMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(Self::Walking),
            "bike" => Ok(Self::Bike),
            "car" => Ok(Self::Car),
            "bss" => Ok(Self::Bss),
            other => Err(ValidationError::InvalidMode {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_mode_from_its_name() {
        for mode in StreetNetworkMode::ALL {
            assert_eq!(mode.as_str().parse::<StreetNetworkMode>(), Ok(mode));
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "ferry".parse::<StreetNetworkMode>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidMode { .. }));
    }
}
