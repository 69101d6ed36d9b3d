// src/noyau/validation.rs
//
// Contrôle structurel rapide (porte d’entrée), pas une grammaire complète.
//
// Règles, dans l’ordre (premier échec = refus) :
// - non vide après trim
// - parenthèses équilibrées (jamais plus de `)` que de `(` sur un préfixe)
// - pas d’opérateur doublé parmi * / +  (`--` autorisé : moins unaire)
// - pas de paire adjacente d’opérateurs distincts parmi + - * /
// - pas d’opérateur initial parmi * / +  (`-` initial autorisé, `+` non)
// - pas d’opérateur final parmi * / + -
//
// Les contrôles portent sur la saisie sans espaces, glyphes d’opérateurs
// ramenés à leur caractère canonique : "2 × ÷ 3" est refusé comme "2*/3".
//
// Ce qui passe ici et reste mal formé (ex: arité) remonte du moteur.

use std::fmt;

use crate::constants::MAX_EXPRESSION_LENGTH;

use super::traduction::OPERATOR_MAP;

/// Opérateurs contrôlés pour doublement / début.
const OPERATEURS_STRICTS: [char; 3] = ['*', '/', '+'];

/// Tous les opérateurs binaires.
const OPERATEURS: [char; 4] = ['+', '-', '*', '/'];

/// Règle ayant refusé la saisie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    UnbalancedParentheses,
    DoubledOperator(char),
    AdjacentOperators(char, char),
    LeadingOperator(char),
    TrailingOperator(char),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty input"),
            Rejection::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            Rejection::DoubledOperator(op) => write!(f, "doubled operator '{op}{op}'"),
            Rejection::AdjacentOperators(a, b) => write!(f, "adjacent operators '{a}{b}'"),
            Rejection::LeadingOperator(op) => write!(f, "leading operator '{op}'"),
            Rejection::TrailingOperator(op) => write!(f, "trailing operator '{op}'"),
        }
    }
}

/// `true` si la saisie franchit la porte.
pub fn validate(raw: &str) -> bool {
    check(raw).is_ok()
}

/// Variante détaillée : indique la première règle en échec.
pub fn check(raw: &str) -> Result<(), Rejection> {
    let s = normaliser(raw);

    if s.is_empty() {
        return Err(Rejection::Empty);
    }

    if !validate_parentheses(&s) {
        return Err(Rejection::UnbalancedParentheses);
    }

    validate_operators(&s)
}

/// Balayage gauche -> droite : un `)` sans `(` ouvert échoue tout de suite,
/// le compte final doit être nul.
pub fn validate_parentheses(expression: &str) -> bool {
    let mut ouvertes: usize = 0;

    for c in expression.chars() {
        match c {
            '(' => ouvertes += 1,
            ')' => {
                if ouvertes == 0 {
                    return false;
                }
                ouvertes -= 1;
            }
            _ => {}
        }
    }

    ouvertes == 0
}

/// Règles d’opérateurs (doublement, adjacence, début, fin).
pub fn validate_operators(expression: &str) -> Result<(), Rejection> {
    let chars: Vec<char> = expression.chars().collect();

    for paire in chars.windows(2) {
        let (a, b) = (paire[0], paire[1]);
        if !OPERATEURS.contains(&a) || !OPERATEURS.contains(&b) {
            continue;
        }
        if a == b {
            if OPERATEURS_STRICTS.contains(&a) {
                return Err(Rejection::DoubledOperator(a));
            }
        } else {
            return Err(Rejection::AdjacentOperators(a, b));
        }
    }

    if let Some(&premier) = chars.first() {
        if OPERATEURS_STRICTS.contains(&premier) {
            return Err(Rejection::LeadingOperator(premier));
        }
    }

    if let Some(&dernier) = chars.last() {
        if OPERATEURS.contains(&dernier) {
            return Err(Rejection::TrailingOperator(dernier));
        }
    }

    Ok(())
}

/// La saisie tient-elle dans la borne du frontal ? (en caractères)
pub fn has_max_length(expression: &str) -> bool {
    expression.chars().count() <= MAX_EXPRESSION_LENGTH
}

/// Sans espaces, glyphes d’opérateurs -> caractères canoniques.
fn normaliser(raw: &str) -> String {
    let mut s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    for (glyphe, canon) in OPERATOR_MAP {
        s = s.replace(glyphe, canon);
    }
    s
}
