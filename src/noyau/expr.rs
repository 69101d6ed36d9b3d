// src/noyau/expr.rs
//
// AST du moteur.
// - Rat : rationnel exact (littéraux décimaux compris)
// - Pi, E : constantes (approchées à l’échelle du moteur, jamais avant)
// - Var : symbole inconnu (l’évaluation le refuse : "Undefined symbol")
//
// IMPORTANT: pas de flottants dans l’arbre.

use num_rational::BigRational;
use num_traits::One;

use std::fmt;

/// Constantes nommées.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constante {
    Pi,
    E,
}

impl Constante {
    pub fn depuis_nom(name: &str) -> Option<Constante> {
        match name {
            "pi" => Some(Constante::Pi),
            "e" => Some(Constante::E),
            _ => None,
        }
    }
}

/// Fonctions unaires reconnues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Log, // base 10
    Ln,
    Sqrt,
    Abs,
    Exp,
}

impl Fonction {
    pub fn depuis_nom(name: &str) -> Option<Fonction> {
        let f = match name {
            "sin" => Fonction::Sin,
            "cos" => Fonction::Cos,
            "tan" => Fonction::Tan,
            "log" => Fonction::Log,
            "ln" => Fonction::Ln,
            "sqrt" => Fonction::Sqrt,
            "abs" => Fonction::Abs,
            "exp" => Fonction::Exp,
            _ => return None,
        };
        Some(f)
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Log => "log",
            Fonction::Ln => "ln",
            Fonction::Sqrt => "sqrt",
            Fonction::Abs => "abs",
            Fonction::Exp => "exp",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Rat(BigRational),
    Const(Constante),
    Var(String),

    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    Call(Fonction, Box<Expr>),
}

/* ------------------------ Affichage debug (entièrement parenthésé) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Rat(r) => {
                let n = r.numer();
                let d = r.denom();
                if d.is_one() {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Const(Constante::Pi) => write!(f, "pi"),
            Const(Constante::E) => write!(f, "e"),
            Var(s) => write!(f, "{s}"),
            Neg(x) => write!(f, "(-{x})"),
            Add(a, b) => write!(f, "({a}+{b})"),
            Sub(a, b) => write!(f, "({a}-{b})"),
            Mul(a, b) => write!(f, "({a}*{b})"),
            Div(a, b) => write!(f, "({a}/{b})"),
            Pow(a, b) => write!(f, "({a}^{b})"),
            Call(func, x) => write!(f, "{}({x})", func.nom()),
        }
    }
}
