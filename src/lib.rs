//! Calculatrice scientifique : noyau d’expressions (traduction, contrôle,
//! évaluation sensible au mode d’angle) et ambiance (configuration, journal).
//!
//! ```
//! use calculatrice_sci::Calculator;
//!
//! let c: Calculator = Calculator::default();
//! assert_eq!(c.calculate("2×3+4").to_string(), "10");
//! assert_eq!(c.calculate("5÷0").to_string(), "Error: Division by zero");
//! ```

pub mod config;
pub mod constants;
pub mod logging;
pub mod noyau;

pub use noyau::{
    AngleMode, CalcError, Calculation, Calculator, EvaluationOutcome, Evaluator, ExpressionParser,
    NumericEngine, PrecisionEngine,
};
