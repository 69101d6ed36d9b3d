//! Tests scientifiques (campagne) : précision + invariants + limites contrôlées.
//!
//! But : vérifier ce que le moteur promet (≥ 60 chiffres justes) sans faire
//! chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//! - comparaisons en virgule fixe (entiers) : pas de flottants pour la précision
//!
//! Notes :
//! - π et les fonctions transcendantes sont approchés à `precision + GARDE`
//!   chiffres : sin(pi) n’est pas exactement 0, mais |sin(pi)| < 10^-60.
//! - Les rationnels restent exacts : (1/2 + 1/3) - 5/6 vaut exactement 0.

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::lecture::{pow10, vers_fixe};
use super::moteur::PrecisionEngine;
use super::{AngleMode, Calculator, Evaluator, ExpressionParser};

/// Chiffres vérifiés après la virgule.
const CHIFFRES: usize = 60;

fn eval_ok(expr: &str) -> BigRational {
    PrecisionEngine::default()
        .evaluate_rational(expr)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

/// Référence décimale -> entier scalé (×10^CHIFFRES), tronqué.
fn reference(txt: &str) -> BigInt {
    let (signe, txt) = match txt.strip_prefix('-') {
        Some(t) => (-1, t),
        None => (1, txt),
    };
    let (ent, frac) = txt.split_once('.').unwrap_or((txt, ""));
    let mut frac = frac.to_string();
    frac.truncate(CHIFFRES);
    while frac.len() < CHIFFRES {
        frac.push('0');
    }
    BigInt::parse_bytes(format!("{ent}{frac}").as_bytes(), 10).unwrap() * signe
}

/// |expr - attendu| ≤ 10^-CHIFFRES (à une unité près sur la troncature).
fn assert_chiffres(expr: &str, attendu: &str) {
    let v = vers_fixe(&eval_ok(expr), CHIFFRES);
    let ecart = (&v - reference(attendu)).abs();
    assert!(
        ecart <= BigInt::from(1),
        "expr={expr:?} : écart de {ecart} unités à 10^-{CHIFFRES}"
    );
}

/// |expr| < 10^-CHIFFRES
fn assert_quasi_nul(expr: &str) {
    let v = eval_ok(expr);
    let seuil = BigRational::new(BigInt::from(1), pow10(CHIFFRES));
    assert!(v.abs() < seuil, "expr={expr:?} : {v} n’est pas quasi nul");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Précision (60 chiffres) ------------------------ */

#[test]
fn sci_constantes_60_chiffres() {
    assert_chiffres(
        "pi",
        "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899",
    );
    assert_chiffres(
        "e",
        "2.71828182845904523536028747135266249775724709369995957496696762772407663035354759",
    );
    assert_chiffres(
        "sqrt(2)",
        "1.41421356237309504880168872420969807856967187537694807317667973799073247846210703",
    );
    assert_chiffres(
        "ln(2)",
        "0.69314718055994530941723212145817656807550013436025525412068000949339362196969471",
    );
}

#[test]
fn sci_fonctions_60_chiffres() {
    assert_chiffres(
        "ln(10)",
        "2.30258509299404568401799145468436420760110148862877297603332790096757260967735248",
    );
    assert_chiffres(
        "sin(1)",
        "0.84147098480789650665250232163029899962256306079837106567275170999191040439123966",
    );
    assert_chiffres(
        "cos(1)",
        "0.54030230586813971740093660744297660373231042061792222767009725538110039477447176",
    );
    assert_chiffres(
        "1/3",
        "0.33333333333333333333333333333333333333333333333333333333333333333333333333333333",
    );
}

/* ------------------------ Invariants trig ------------------------ */

#[test]
fn sci_pythagore() {
    for x in ["1", "0.5", "-2", "100", "pi/7", "1e-3"] {
        assert_quasi_nul(&format!("sin({x})^2 + cos({x})^2 - 1"));
    }
}

#[test]
fn sci_symetries() {
    // sin(-x) = -sin(x), cos(-x) = cos(x), tan(-x) = -tan(x)
    for x in ["0.3", "2", "pi/5"] {
        assert_quasi_nul(&format!("sin(-({x})) + sin({x})"));
        assert_quasi_nul(&format!("cos(-({x})) - cos({x})"));
        assert_quasi_nul(&format!("tan(-({x})) + tan({x})"));
    }
}

#[test]
fn sci_periodicite() {
    assert_quasi_nul("sin(pi/4 + 2*pi) - sin(pi/4)");
    assert_quasi_nul("cos(pi/3 + 20*pi) - cos(pi/3)");
    assert_quasi_nul("tan(pi/6 + pi) - tan(pi/6)");
    assert_quasi_nul("sin(pi)");
}

#[test]
fn sci_angles_remarquables_en_degres() {
    let ev = Evaluator::new(PrecisionEngine::default());
    let cas = [
        ("sin(30)", 0.5),
        ("cos(60)", 0.5),
        ("tan(45)", 1.0),
        ("sin(90)", 1.0),
        ("cos(180)", -1.0),
        ("sin(-30)", -0.5),
    ];
    for (expr, attendu) in cas {
        let v = ev
            .evaluate_with(expr, AngleMode::Deg)
            .number()
            .unwrap_or_else(|| panic!("expr={expr:?}"));
        assert!((v - attendu).abs() < 1e-15, "expr={expr:?} v={v}");
    }
}

/* ------------------------ Cohérence algébrique ------------------------ */

#[test]
fn sci_zero_algebrique_exact() {
    assert!(eval_ok("(1/2 + 1/3) - 5/6").is_zero());
    assert!(eval_ok("(2/3 * 3/4) - 1/2").is_zero());
    assert!(eval_ok("0.1 + 0.2 - 0.3").is_zero());
    assert!(eval_ok("sqrt(9/4) - 1.5").is_zero());
}

#[test]
fn sci_identites_transcendantes() {
    assert_quasi_nul("sqrt(2)*sqrt(2) - 2");
    assert_quasi_nul("ln(exp(3)) - 3");
    assert_quasi_nul("exp(ln(7)) - 7");
    assert_quasi_nul("log(1000) - 3");
    assert_quasi_nul("2^0.5 - sqrt(2)");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // sqrt(...)^2 alternés : reste 4 à la précision près
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    let v = eval_ok(&expr);
    budget(t0, max);
    let ecart = (v - BigRational::from_integer(BigInt::from(4))).abs();
    assert!(ecart < BigRational::new(BigInt::from(1), pow10(CHIFFRES)));
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut expr = String::new();
    for k in 0..200 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
        budget(t0, max);
    }

    // 200*(1/2)=100, exact
    assert_eq!(eval_ok(&expr), BigRational::from_integer(BigInt::from(100)));
    budget(t0, max);
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // gros numérateur contrôlé (100 chiffres)
    let big = "9".repeat(100);
    let expr = format!("{big}/7 + 1/7");

    // 10^100 / 7, exact
    let v = eval_ok(&expr);
    budget(t0, max);
    assert_eq!(v, BigRational::new(pow10(100), BigInt::from(7)));
}

#[test]
fn sci_stress_imbrication_trig_deg() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // sin(sin(sin(...(30)...))) en degrés : réécriture récursive sur 30 niveaux
    let mut expr = "30".to_string();
    for _ in 0..30 {
        expr = format!("sin({expr})");
    }

    let c: Calculator<ExpressionParser, PrecisionEngine> = Calculator::default();
    let v = c.calculate(&expr).as_number();
    budget(t0, max);

    let mut attendu = 30f64;
    for _ in 0..30 {
        attendu = attendu.to_radians().sin();
    }
    let v = v.unwrap_or_else(|| panic!("pas de nombre pour {expr}"));
    assert!((v - attendu).abs() < 1e-12, "v={v} attendu={attendu}");
}

#[test]
fn sci_profondeur_excessive_refusee() {
    // au-delà de la borne : erreur propre, pas de débordement de pile
    let expr = format!("{}1{}", "sqrt(".repeat(1500), ")".repeat(1500));
    let r = PrecisionEngine::default().evaluate_rational(&expr);
    assert!(r.is_err());
}
