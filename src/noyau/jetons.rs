// src/noyau/jetons.rs
//
// Tokenisation de la forme canonique (entrée du moteur).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::expr::{Constante, Fonction};
use super::moteur::EngineError;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Constantes, fonctions, symboles inconnus : le parse (RPN) décide.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    // Produits par to_rpn seulement (jamais par tokenize)
    Neg,

    LPar,
    RPar,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux exacts : 12, 2.5, .5, 1e10, 1.5e-3
/// - opérateurs + - * / ^
/// - parenthèses ( )
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
/// - √ (équivaut à ident("sqrt"))
/// Puis insère les produits implicites (2pi, pi(2), (1)2).
pub fn tokenize(s: &str) -> Result<Vec<Tok>, EngineError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombres
        if c.is_ascii_digit() || c == '.' {
            let (r, fin) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(r));
            i = fin;
            continue;
        }

        return Err(EngineError::Syntax(format!(
            "Unexpected character '{c}' (char {})",
            i + 1
        )));
    }

    Ok(produits_implicites(out))
}

/// Lit un nombre décimal à partir de `start` ; renvoie (valeur exacte, position de fin).
fn lire_nombre(chars: &[char], start: usize) -> Result<(BigRational, usize), EngineError> {
    let mut i = start;
    let mut chiffres = String::new();
    let mut decimales: i64 = 0;

    while i < chars.len() && chars[i].is_ascii_digit() {
        chiffres.push(chars[i]);
        i += 1;
    }

    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            chiffres.push(chars[i]);
            decimales += 1;
            i += 1;
        }
    }

    if chiffres.is_empty() {
        return Err(EngineError::Syntax(format!(
            "Unexpected character '.' (char {})",
            start + 1
        )));
    }

    // exposant : seulement si suivi d’un chiffre (sinon "2e" = 2*e)
    let mut exposant: i64 = 0;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let mut signe: i64 = 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            if chars[j] == '-' {
                signe = -1;
            }
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            let debut = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let txt: String = chars[debut..j].iter().collect();
            let e: i64 = txt
                .parse()
                .map_err(|_| EngineError::Syntax(format!("Exponent too large: {txt}")))?;
            exposant = signe * e;
            i = j;
        }
    }

    let mantisse = BigInt::parse_bytes(chiffres.as_bytes(), 10)
        .ok_or_else(|| EngineError::Syntax(format!("Invalid number (char {})", start + 1)))?;

    let puissance = exposant - decimales;
    if puissance.unsigned_abs() > MAX_EXPOSANT_LITTERAL {
        let quoi = if exposant == 0 {
            "Number literal too long"
        } else {
            "Exponent too large"
        };
        return Err(EngineError::Syntax(format!("{quoi} (char {})", start + 1)));
    }

    let dix = BigInt::from(10).pow(puissance.unsigned_abs() as u32);
    let r = if puissance >= 0 {
        BigRational::from_integer(mantisse * dix)
    } else {
        BigRational::new(mantisse, dix)
    };

    Ok((r, i))
}

/// Borne sur l’exposant décimal d’un littéral, décimales comprises
/// (1e100000 ou 10 001 décimales : refusé, pas calculé).
const MAX_EXPOSANT_LITTERAL: u64 = 10_000;

fn termine_valeur(t: &Tok) -> bool {
    match t {
        Tok::Num(_) | Tok::RPar => true,
        Tok::Ident(name) => Fonction::depuis_nom(name).is_none(),
        _ => false,
    }
}

fn commence_valeur(t: &Tok) -> bool {
    matches!(t, Tok::Num(_) | Tok::Ident(_) | Tok::LPar)
}

/// Insère `*` entre une valeur et ce qui la suit sans opérateur.
/// - `2pi`, `pi(2)`, `(1)2`, `(1)pi`
/// - pas entre deux nombres (`1.2.3` reste une erreur)
/// - pas entre un symbole inconnu et `(` : c’est un appel (fonction inconnue)
fn produits_implicites(tokens: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());

    for t in tokens {
        if let Some(prev) = out.last() {
            let deux_nombres = matches!((prev, &t), (Tok::Num(_), Tok::Num(_)));
            let appel = match (prev, &t) {
                (Tok::Ident(name), Tok::LPar) => Constante::depuis_nom(name).is_none(),
                _ => false,
            };
            if termine_valeur(prev) && commence_valeur(&t) && !deux_nombres && !appel {
                out.push(Tok::Star);
            }
        }
        out.push(t);
    }

    out
}

/// Format utilitaire (journal de débogage) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        let n = r.numer();
        let d = r.denom();
        if d.is_one() {
            format!("{n}")
        } else {
            format!("{n}/{d}")
        }
    }

    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(r) => format_rat(r),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Neg => "neg".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
