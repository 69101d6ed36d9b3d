//! Noyau — évaluation sensible au mode d’angle
//!
//! forme canonique -> (deg : réécriture des arguments trig) -> moteur
//!     -> conversion f64 -> classification des erreurs par MESSAGE
//!
//! Le moteur est injecté (trait `NumericEngine`) ; l’évaluateur ne voit de lui
//! qu’une valeur convertible et un texte d’erreur.

use num_traits::ToPrimitive;

use super::angle::AngleMode;
use super::erreur::{CalcError, EvaluationOutcome};
use super::moteur::{NumericEngine, PrecisionEngine};

/// Fonctions dont l’argument est un angle.
const TRIG_FUNCTIONS: [&str; 3] = ["sin", "cos", "tan"];

/// Évaluateur : un moteur + un mode d’angle courant.
#[derive(Clone, Debug, Default)]
pub struct Evaluator<M: NumericEngine = PrecisionEngine> {
    moteur: M,
    mode: AngleMode,
}

impl<M: NumericEngine> Evaluator<M> {
    /// Mode initial : deg.
    pub fn new(moteur: M) -> Self {
        Self::with_mode(moteur, AngleMode::Deg)
    }

    pub fn with_mode(moteur: M, mode: AngleMode) -> Self {
        Self { moteur, mode }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.mode
    }

    /// Sans effet rétroactif : les évaluations passées ne sont pas touchées.
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.mode = mode;
    }

    pub fn engine(&self) -> &M {
        &self.moteur
    }

    /// Évalue une forme canonique avec le mode courant (lu une seule fois).
    pub fn evaluate(&self, canonical: &str) -> EvaluationOutcome {
        self.evaluate_with(canonical, self.mode)
    }

    /// Évalue une forme canonique avec un mode explicite.
    pub fn evaluate_with(&self, canonical: &str, mode: AngleMode) -> EvaluationOutcome {
        if canonical.trim().is_empty() {
            return CalcError::EmptyExpression.into();
        }

        let ajustee = adjust_for_angle_mode(canonical, mode);
        tracing::debug!(expression = %ajustee, mode = %mode, "Évaluation");

        match self.moteur.evaluate(&ajustee) {
            Ok(v) => match v.to_f64().filter(|x| x.is_finite()) {
                Some(x) => EvaluationOutcome::Number(x),
                // conversion non finie : traitée comme l’infini du moteur
                None => CalcError::DivisionByZero.into(),
            },
            Err(e) => {
                let msg = e.to_string();
                tracing::debug!(erreur = %msg, "Échec du moteur");
                classify_engine_error(&msg).into()
            }
        }
    }
}

/// Classe un message d’erreur du moteur (insensible à la casse).
///
/// | contient                       | genre             |
/// |--------------------------------|-------------------|
/// | "division by zero", "infinity" | DivisionByZero    |
/// | "syntax error", "unexpected"   | InvalidExpression |
/// | "undefined"                    | UndefinedSymbol   |
/// | autre                          | EvaluationError   |
pub fn classify_engine_error(message: &str) -> CalcError {
    let m = message.to_lowercase();

    if m.contains("division by zero") || m.contains("infinity") {
        CalcError::DivisionByZero
    } else if m.contains("syntax error") || m.contains("unexpected") {
        CalcError::InvalidExpression
    } else if m.contains("undefined") {
        CalcError::UndefinedSymbol
    } else {
        CalcError::EvaluationError(message.to_string())
    }
}

/// En mode deg, réécrit `f(E)` en `f((E) * pi / 180)` pour f ∈ {sin, cos, tan}.
///
/// Les noms et les nombres sont découpés comme le fait le tokenizer du moteur :
/// - nom insensible à la casse, blancs permis avant `(` (SIN(30), sin (30))
/// - un nom prolongé par une lettre, un chiffre ou `_` n’est pas un appel (asin, x1sin)
/// - un nombre collé devant reste un produit implicite (2sin(30))
/// - argument délimité par la parenthèse fermante appariée (pas le premier `)`)
/// - appels imbriqués réécrits aussi : sin(cos(60)) -> sin((cos((60) * pi / 180)) * pi / 180)
/// - parenthèse non appariée : recopiée telle quelle (le moteur tranchera)
///
/// Un seul passage, sans récursion : la profondeur d’imbrication est bornée par
/// le moteur, pas par la pile.
///
/// En mode rad : identité.
pub fn adjust_for_angle_mode(expression: &str, mode: AngleMode) -> String {
    match mode {
        AngleMode::Rad => expression.to_string(),
        AngleMode::Deg => reecrire_deg(expression),
    }
}

fn reecrire_deg(expression: &str) -> String {
    let octets = expression.as_bytes();
    let paires = paires_de_parentheses(expression);
    let mut fermetures_trig = vec![false; octets.len()];
    let mut out = String::with_capacity(expression.len() + 16);
    let mut i = 0;

    while i < octets.len() {
        let b = octets[i];

        if b.is_ascii_digit() || b == b'.' {
            let fin = fin_nombre(octets, i);
            out.push_str(&expression[i..fin]);
            i = fin;
            continue;
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            let fin = fin_identifiant(octets, i);
            let nom = &expression[i..fin];
            let ouvrante = apres_blancs(expression, fin);

            let fermante = paires.get(ouvrante).copied().flatten();
            match fermante {
                Some(f) if est_trig(nom) => {
                    fermetures_trig[f] = true;
                    out.push_str(nom);
                    out.push_str("((");
                    i = ouvrante + 1;
                }
                _ => {
                    out.push_str(nom);
                    i = fin;
                }
            }
            continue;
        }

        if b == b')' && fermetures_trig[i] {
            out.push_str(") * pi / 180)");
            i += 1;
            continue;
        }

        // caractère courant tel quel (UTF-8 : on avance d’un caractère entier)
        let c = match expression[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        out.push(c);
        i += c.len_utf8();
    }

    out
}

fn est_trig(nom: &str) -> bool {
    TRIG_FUNCTIONS.iter().any(|f| f.eq_ignore_ascii_case(nom))
}

/// Pour chaque `(` (indice d’octet), la position de la `)` appariée.
fn paires_de_parentheses(expression: &str) -> Vec<Option<usize>> {
    let mut paires = vec![None; expression.len()];
    let mut ouvertes = Vec::new();

    for (j, c) in expression.char_indices() {
        match c {
            '(' => ouvertes.push(j),
            ')' => {
                if let Some(o) = ouvertes.pop() {
                    paires[o] = Some(j);
                }
            }
            _ => {}
        }
    }

    paires
}

/// Fin d’un identifiant `[a-zA-Z_][a-zA-Z0-9_]*`.
fn fin_identifiant(octets: &[u8], debut: usize) -> usize {
    let mut i = debut + 1;
    while i < octets.len() && (octets[i].is_ascii_alphanumeric() || octets[i] == b'_') {
        i += 1;
    }
    i
}

/// Fin d’un littéral : chiffres, `.` chiffres, puis exposant seulement si
/// un chiffre suit (`2e` = 2*e).
fn fin_nombre(octets: &[u8], debut: usize) -> usize {
    let chiffres = |mut i: usize| {
        while i < octets.len() && octets[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = chiffres(debut);
    if i < octets.len() && octets[i] == b'.' {
        i = chiffres(i + 1);
    }

    if i < octets.len() && (octets[i] == b'e' || octets[i] == b'E') {
        let mut j = i + 1;
        if j < octets.len() && (octets[j] == b'+' || octets[j] == b'-') {
            j += 1;
        }
        if j < octets.len() && octets[j].is_ascii_digit() {
            i = chiffres(j);
        }
    }

    i
}

/// Premier indice d’octet non blanc à partir de `i`.
fn apres_blancs(expression: &str, i: usize) -> usize {
    expression[i..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(expression.len(), |(j, _)| i + j)
}
