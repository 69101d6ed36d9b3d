// src/noyau/angle.rs
//
// Mode d’angle : deg | rad (jetons littéraux du contrat).

use std::fmt;
use std::str::FromStr;

use super::erreur::CalcError;

/// Interprétation des arguments de sin/cos/tan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Deg,
    Rad,
}

impl AngleMode {
    /// Jeton littéral (`deg` / `rad`).
    pub fn as_str(self) -> &'static str {
        match self {
            AngleMode::Deg => "deg",
            AngleMode::Rad => "rad",
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seuls `deg` et `rad` sont acceptés (exactement, sans casse ni espaces).
impl FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deg" => Ok(AngleMode::Deg),
            "rad" => Ok(AngleMode::Rad),
            autre => Err(CalcError::InvalidAngleMode(autre.to_string())),
        }
    }
}
