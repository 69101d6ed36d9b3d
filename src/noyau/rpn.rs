// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - fonction connue (sin, cos, ...) => opérateur unaire, DOIT être suivie de '('
//    - inconnu suivi de '('           => "Undefined function"
//    - sinon                           => atome (constante ou symbole, résolu à l’évaluation)
// - Moins unaire : Tok::Neg, plus faible que '^', plus fort que '*' et '/'
//     -2^2 = -(2^2) ; 2^-1 = 2^(-1) ; -2*3 = (-2)*3
// - Plus unaire : ignoré
//
// NOTE:
// - Les fonctions sont traitées comme des opérateurs “collés” à leur argument
//   et sont sorties après la parenthèse fermante.

use super::expr::{Constante, Expr, Fonction};
use super::jetons::Tok;
use super::moteur::EngineError;

/// Garde-fou : profondeur maximale de l’arbre (évaluation et drop récursifs).
pub const MAX_PROFONDEUR: usize = 1000;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

fn est_fonction(t: &Tok) -> bool {
    matches!(t, Tok::Ident(name) if Fonction::depuis_nom(name).is_some())
}

fn symbole_op(t: &Tok) -> &'static str {
    match t {
        Tok::Plus => "+",
        Tok::Minus => "-",
        Tok::Star => "*",
        Tok::Slash => "/",
        Tok::Caret => "^",
        _ => "?",
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Ident("pi"), Num(2), Slash, Ident("sin")]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, EngineError> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter les signes unaires et les opérateurs orphelins.
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().enumerate() {
        let suivant = tokens.get(i + 1);

        match tok {
            Tok::Num(_) => {
                out.push(tok.clone());
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                let suivi_de_parenthese = matches!(suivant, Some(Tok::LPar));

                if Fonction::depuis_nom(name).is_some() {
                    if !suivi_de_parenthese {
                        return Err(EngineError::Syntax(format!(
                            "Unexpected function {name} without parenthesis"
                        )));
                    }
                    // fonction : on la garde sur la pile (elle sortira après son argument)
                    ops.push(tok.clone());
                    prev_was_value = false;
                } else if suivi_de_parenthese && Constante::depuis_nom(name).is_none() {
                    return Err(EngineError::UndefinedFunction(name.clone()));
                } else {
                    out.push(tok.clone());
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                ops.push(Tok::LPar);
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err(EngineError::Syntax("Unexpected closing parenthesis".into()));
                }

                // dépile jusqu’à '('
                let mut ouverte = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ouverte = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouverte {
                    return Err(EngineError::Syntax("Unexpected closing parenthesis".into()));
                }

                // si une fonction est au sommet, on la sort aussi
                if ops.last().is_some_and(est_fonction) {
                    if let Some(f) = ops.pop() {
                        out.push(f);
                    }
                }

                prev_was_value = true;
            }

            Tok::Minus if !prev_was_value => {
                // préfixe : empilé sans dépiler
                ops.push(Tok::Neg);
            }

            Tok::Plus if !prev_was_value => {
                // plus unaire : neutre
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    return Err(EngineError::Syntax(format!(
                        "Unexpected operator {}",
                        symbole_op(tok)
                    )));
                }

                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et on ne traverse pas une fonction (fonction reste collée à son argument)
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) || est_fonction(top) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(tok);

                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(op);
                    }
                }

                ops.push(tok.clone());
                prev_was_value = false;
            }

            Tok::Neg => {
                return Err(EngineError::Syntax("Unexpected token neg".into()));
            }
        }
    }

    if !prev_was_value {
        return Err(EngineError::UnexpectedEnd);
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(EngineError::Syntax("Parenthesis ) expected".into()));
        }
        out.push(op);
    }

    Ok(out)
}

/// Construit une Expr à partir d’une RPN.
///
/// Itératif (pile) ; la profondeur de chaque sous-arbre est suivie en parallèle
/// pour refuser les arbres trop profonds avant de les construire.
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, EngineError> {
    let mut st: Vec<(Expr, usize)> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(r) => st.push((Expr::Rat(r), 1)),

            Tok::Ident(name) => match Fonction::depuis_nom(&name) {
                Some(f) => {
                    let (x, p) = st.pop().ok_or(EngineError::UnexpectedEnd)?;
                    st.push((Expr::Call(f, Box::new(x)), garde(p + 1)?));
                }
                None => {
                    let e = match Constante::depuis_nom(&name) {
                        Some(c) => Expr::Const(c),
                        None => Expr::Var(name),
                    };
                    st.push((e, 1));
                }
            },

            Tok::Neg => {
                let (x, p) = st.pop().ok_or(EngineError::UnexpectedEnd)?;
                st.push((Expr::Neg(Box::new(x)), garde(p + 1)?));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let (b, pb) = st.pop().ok_or(EngineError::UnexpectedEnd)?;
                let (a, pa) = st.pop().ok_or(EngineError::UnexpectedEnd)?;
                let p = garde(pa.max(pb) + 1)?;

                let (a, b) = (Box::new(a), Box::new(b));
                let e = match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                };

                st.push((e, p));
            }

            Tok::LPar | Tok::RPar => {
                return Err(EngineError::Syntax("Unexpected parenthesis in RPN".into()))
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        (None, _) => Err(EngineError::UnexpectedEnd),
        (Some(_), false) => Err(EngineError::Syntax("Unexpected value".into())),
    }
}

fn garde(profondeur: usize) -> Result<usize, EngineError> {
    if profondeur > MAX_PROFONDEUR {
        return Err(EngineError::TooDeep);
    }
    Ok(profondeur)
}
