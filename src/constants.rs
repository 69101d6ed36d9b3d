// src/constants.rs
//
// Constantes partagées (noyau + ligne de commande).

/// Nom affiché (journal, aide CLI).
pub const APP_NAME: &str = "calculatrice-sci";

/// Version du paquet, injectée par Cargo.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Niveau de journal quand rien n’est demandé (ni RUST_LOG, ni --debug, ni config).
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/* ------------------------ Précision du moteur ------------------------ */

/// Précision par défaut du moteur (chiffres significatifs).
pub const PRECISION_DEFAUT: usize = 64;

/// Plancher : en dessous, les enchaînements perdent des chiffres avant l’affichage.
pub const PRECISION_MIN: usize = 64;

/// Garde-fou : on borne la précision (anti-gel).
pub const PRECISION_MAX: usize = 200;

/* ------------------------ Affichage ------------------------ */

/// Longueur maximale d’une saisie (bornée par le frontal, pas par le noyau).
pub const MAX_EXPRESSION_LENGTH: usize = 500;

/// Nombre maximal de décimales affichées.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Au-delà (en valeur absolue) : notation scientifique.
pub const SCIENTIFIC_THRESHOLD_HIGH: f64 = 1e10;

/// En deçà (en valeur absolue, hors zéro) : notation scientifique.
pub const SCIENTIFIC_THRESHOLD_LOW: f64 = 1e-10;
