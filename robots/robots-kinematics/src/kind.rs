//! Mechanism identity: manufacturer and mechanism type.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hardware manufacturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum Manufacturer {
    /// ABB.
    ABB,
    /// KUKA.
    KUKA,
    /// Universal Robots.
    UR,
    /// Stäubli.
    Staubli,
    /// Any other vendor.
    Other,
}

impl Manufacturer {
    /// All known manufacturers.
    pub const ALL: [Self; 5] = [Self::ABB, Self::KUKA, Self::UR, Self::Staubli, Self::Other];
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ABB => "ABB",
            Self::KUKA => "KUKA",
            Self::UR => "UR",
            Self::Staubli => "Staubli",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

impl FromStr for Manufacturer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.to_string() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Mechanism type, as named by the description element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MechanismKind {
    /// Multi-axis robot arm.
    RobotArm,
    /// Rotary positioner holding the workpiece.
    Positioner,
    /// Linear track, usually carrying a robot.
    Track,
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RobotArm => "RobotArm",
            Self::Positioner => "Positioner",
            Self::Track => "Track",
        };
        f.write_str(name)
    }
}

impl FromStr for MechanismKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RobotArm" => Ok(Self::RobotArm),
            "Positioner" => Ok(Self::Positioner),
            "Track" => Ok(Self::Track),
            other => Err(other.to_string()),
        }
    }
}
