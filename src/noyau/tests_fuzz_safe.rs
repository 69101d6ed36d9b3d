//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte les erreurs de domaine (division par zéro, résultat complexe)
//! - invariant clé : une saisie bien formée passe la porte, et le moteur ne la
//!   refuse jamais comme "Invalid expression" ni "Undefined symbol"

use std::time::{Duration, Instant};

use super::erreur::{CalcError, EvaluationOutcome};
use super::traduction::{format_for_display, translate};
use super::validation::validate;
use super::{AngleMode, Calculator};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

/// Liste noire : genres qui trahiraient un désaccord porte / moteur.
fn is_erreur_de_forme(o: &EvaluationOutcome) -> bool {
    matches!(
        o,
        EvaluationOutcome::Error(
            CalcError::InvalidExpression | CalcError::UndefinedSymbol | CalcError::EmptyExpression
        )
    )
}

/* ------------------------ Génération d’expressions (forme d’affichage, bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let entier = rng.pick(100);
    match rng.pick(4) {
        0 => format!("{entier}.{}", rng.pick(10)),
        _ => format!("{entier}"),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "π".to_string(),
        // produit implicite laissé au moteur
        4 => format!("{}π", 1 + rng.pick(9)),
        _ => format!("{}x²", 1 + rng.pick(9)),
    }
}

const FONCTIONS: [&str; 5] = ["sin", "cos", "tan", "log", "ln"];
const OPERATEURS: [&str; 5] = ["+", "−", "×", "÷", "-"];

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(9) {
        0 => gen_atom(rng),
        1 | 2 | 3 => {
            let op = OPERATEURS[rng.pick(OPERATEURS.len() as u32) as usize];
            format!(
                "{}{op}{}",
                gen_expr(rng, depth - 1),
                gen_expr(rng, depth - 1)
            )
        }
        4 => format!("({})", gen_expr(rng, depth - 1)),
        5 => {
            let f = FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize];
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
        // multiplications implicites
        6 => format!("{}({})", 1 + rng.pick(9), gen_expr(rng, depth - 1)),
        7 => {
            let f = FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize];
            format!("{}{f}({})", 1 + rng.pick(9), gen_expr(rng, depth - 1))
        }
        // moins unaire : toujours parenthésé (jamais collé à un opérateur)
        _ => {
            if rng.coin() {
                format!("(−{})", gen_expr(rng, depth - 1))
            } else {
                format!("({})x²", gen_expr(rng, depth - 1))
            }
        }
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_porte_et_moteur_d_accord() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut c: Calculator = Calculator::default();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for k in 0..300 {
        budget(t0, max);

        // alterne les modes : la réécriture deg doit rester bien formée
        let mode = if k % 2 == 0 { "deg" } else { "rad" };
        c.set_angle_mode(mode).unwrap();

        let expr = gen_expr(&mut rng, 4);
        assert!(validate(&expr), "porte refusée: expr={expr:?}");

        let o = c.outcome(&expr);
        assert!(
            !is_erreur_de_forme(&o),
            "désaccord porte/moteur: expr={expr:?} canon={:?} mode={mode} -> {o:?}",
            translate(&expr)
        );

        if o.is_number() {
            seen_ok += 1;
        } else {
            seen_err += 1;
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 50, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // Même seed => mêmes expressions => mêmes sorties
    let mut a = Rng::new(0xBADC0DE_u64);
    let mut b = a.clone();

    let c: Calculator = Calculator::default();

    for _ in 0..100 {
        budget(t0, max);

        let ea = gen_expr(&mut a, 3);
        let eb = gen_expr(&mut b, 3);
        assert_eq!(ea, eb);
        assert_eq!(c.calculate(&ea), c.calculate(&eb), "expr={ea:?}");
    }
}

#[test]
fn fuzz_safe_aller_retour_affichage() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let canon = translate(&expr);
        let affiche = format_for_display(&canon);

        // la forme affichée repasse la porte et retombe sur la même forme canonique
        assert!(validate(&affiche), "expr={expr:?} affiché={affiche:?}");
        assert_eq!(translate(&affiche), canon, "expr={expr:?}");
        // idempotence de l’affichage
        assert_eq!(format_for_display(&affiche), affiche);
    }
}

#[test]
fn fuzz_safe_mode_lu_une_fois() {
    // même expression, modes différents : chaque évaluation ne voit que son mode
    let mut c: Calculator = Calculator::default();
    let deg = c.calculate("sin(90)");
    c.set_angle_mode("rad").unwrap();
    let rad = c.calculate("sin(90)");
    assert_eq!(c.angle_mode(), AngleMode::Rad);
    assert_ne!(deg, rad);
    assert_eq!(c.calculate("sin(90)"), rad);
}
