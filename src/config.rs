// src/config.rs
//
// Fichier de configuration TOML optionnel.
//
//   precision = 64        # chiffres significatifs, bornés à [64, 200]
//   angle_mode = "deg"    # "deg" | "rad"
//
//   [logging]
//   level = "info"
//
// Clés inconnues ignorées, clés absentes = valeurs par défaut.
// Les options de la ligne de commande l’emportent sur le fichier.

use std::path::{Path, PathBuf};

use crate::constants::{PRECISION_DEFAUT, PRECISION_MAX, PRECISION_MIN};
use crate::noyau::AngleMode;

/// Échec de chargement (fichier illisible ou TOML invalide).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Section `[logging]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// "error", "warn", "info", "debug", "trace" (ou une directive EnvFilter).
    pub level: Option<String>,
}

/// Configuration validée.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub precision: usize,
    pub angle_mode: AngleMode,
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
            angle_mode: AngleMode::Deg,
            logging: LoggingSection::default(),
        }
    }
}

impl Config {
    /// Charge et valide un fichier.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contenu = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contenu).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Configuration chargée");
        Ok(config)
    }

    /// Lit une configuration depuis un texte TOML, puis borne la précision.
    pub fn from_toml_str(contenu: &str) -> Result<Config, toml::de::Error> {
        let mut config: Config = toml::from_str(contenu)?;
        config.precision = borne_precision(config.precision);
        Ok(config)
    }
}

/// Précision hors bornes : ramenée dans [PRECISION_MIN, PRECISION_MAX], avec avertissement.
pub fn borne_precision(precision: usize) -> usize {
    let bornee = precision.clamp(PRECISION_MIN, PRECISION_MAX);
    if bornee != precision {
        tracing::warn!(
            demandee = precision,
            retenue = bornee,
            "Précision hors de [{PRECISION_MIN}, {PRECISION_MAX}], ramenée dans les bornes"
        );
    }
    bornee
}
