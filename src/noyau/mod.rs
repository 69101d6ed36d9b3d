//! Noyau de calcul scientifique
//!
//! Organisation interne :
//! - traduction.rs   : glyphes d’affichage <-> forme canonique, multiplications implicites
//! - validation.rs   : contrôle structurel rapide (parenthèses, opérateurs)
//! - eval.rs         : mode d’angle (réécriture deg) + moteur injecté + classification
//! - calculatrice.rs : orchestrateur (le seul point d’entrée des frontaux)
//! - moteur.rs       : trait NumericEngine + moteur rationnel par défaut
//! - jetons.rs       : tokenisation
//! - rpn.rs          : shunting-yard + construction Expr
//! - expr.rs         : AST du moteur
//! - lecture.rs      : virgule fixe (π, e, ln, exp, sin/cos, √) + caches
//! - angle.rs, erreur.rs, format.rs : types partagés et affichage des nombres

pub mod angle;
pub mod calculatrice;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod moteur;
pub mod rpn;
pub mod traduction;
pub mod validation;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use angle::AngleMode;
pub use calculatrice::Calculator;
pub use erreur::{CalcError, Calculation, EvaluationOutcome, ERROR_PREFIX};
pub use eval::{adjust_for_angle_mode, classify_engine_error, Evaluator};
pub use format::format_number;
pub use moteur::{EngineError, NumericEngine, PrecisionEngine};
pub use traduction::{format_for_display, translate, ExpressionParser, Notation};
pub use validation::{has_max_length, validate};
