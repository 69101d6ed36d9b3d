// src/logging.rs
//
// Journalisation structurée (tracing), sur stderr.
//
// Activation, par priorité décroissante :
//   - variable d’environnement RUST_LOG
//   - option --debug
//   - fichier de configuration : [logging] level = "debug"
//   - défaut : DEFAULT_LOG_LEVEL ("warn")
//
// Les résultats vont sur stdout : le journal ne s’y mélange jamais.

use tracing_subscriber::EnvFilter;

use crate::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};

/// Filtre retenu selon la priorité ci-dessus.
pub fn filtre(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    }
}

/// Installe l’abonné global. À appeler une seule fois, au démarrage du binaire.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(filtre(debug_flag, config_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();

    tracing::debug!(app = APP_NAME, version = APP_VERSION, "Logging initialised");
}
