// src/noyau/format.rs
//
// Affichage des résultats numériques (côté bord, après le noyau).
// - notation scientifique hors [1e-10, 1e10)
// - décimales bornées (15) pour masquer le bruit binaire (0.1+0.2)

use crate::constants::{MAX_DECIMAL_PLACES, SCIENTIFIC_THRESHOLD_HIGH, SCIENTIFIC_THRESHOLD_LOW};

/// Texte d’affichage d’un résultat.
pub fn format_number(num: f64) -> String {
    if num.is_nan() {
        return "NaN".to_string();
    }
    if num.is_infinite() {
        return if num > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if num == 0.0 {
        // couvre aussi -0
        return "0".to_string();
    }

    let abs = num.abs();
    if abs >= SCIENTIFIC_THRESHOLD_HIGH || abs < SCIENTIFIC_THRESHOLD_LOW {
        return format_scientific(num);
    }

    let t = truncate_decimals(num, MAX_DECIMAL_PLACES);
    if t == 0.0 {
        return "0".to_string();
    }
    format!("{t}")
}

/// Notation scientifique, mantisse la plus courte : 1.23456789e+8, 1e-6.
pub fn format_scientific(num: f64) -> String {
    let brut = format!("{num:e}");
    match brut.split_once('e') {
        Some((mantisse, exp)) if !exp.starts_with('-') => format!("{mantisse}e+{exp}"),
        _ => brut,
    }
}

/// Arrondi à `places` décimales.
/// SAFE : si la mise à l’échelle sort de la plage entière exacte d’un f64
/// (2^53), il n’y a rien à arrondir : on rend le nombre tel quel.
pub fn truncate_decimals(num: f64, places: u32) -> f64 {
    const ENTIER_EXACT_MAX: f64 = 9_007_199_254_740_992.0;

    let multiplier = 10f64.powi(places as i32);
    let scaled = num * multiplier;
    if !scaled.is_finite() || scaled.abs() >= ENTIER_EXACT_MAX {
        return num;
    }
    scaled.round() / multiplier
}
