// src/noyau/moteur.rs
//
// Moteur numérique injectable.
//
// L’évaluateur ne connaît que le trait `NumericEngine` : une chaîne canonique
// entre, une valeur convertible en f64 (ou une erreur dont le MESSAGE est
// classé) sort.
//
// Moteur par défaut : `PrecisionEngine`
//   tokenize -> RPN -> Expr -> rationnels exacts
//   (π, e, fonctions transcendantes : virgule fixe à `precision + GARDE` chiffres)
//
// Fonctions : sin cos tan (radians), log (base 10), ln, sqrt, abs, exp.
// Constantes : pi, e.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::constants::{PRECISION_DEFAUT, PRECISION_MAX, PRECISION_MIN};

use super::expr::{Constante, Expr, Fonction};
use super::jetons::{format_tokens, tokenize};
use super::lecture::{
    depuis_fixe, exp_rat, ln10_fixe, ln_fixe, pi_fixe, rational_pow_int, sin_cos_fixe, sqrt_rat,
};
use super::rpn::{from_rpn, to_rpn};

/// Chiffres de garde au-delà de la précision demandée.
pub const GARDE: usize = 16;

/// Au-delà : exp(x) est refusé (infini), en deçà de -EXP_MAX il vaut 0.
const EXP_MAX: i64 = 10_000;

/// Taille estimée (bits) au-delà de laquelle une puissance entière n’est plus exacte.
const LIMITE_BITS_PUISSANCE: u64 = 200_000;

/// Chiffres entiers maximaux d’un argument trigonométrique.
const MAX_CHIFFRES_TRIG: usize = 400;

/// Erreurs du moteur. Les messages suivent les conventions attendues
/// par la classification de l’évaluateur ("Syntax error", "Undefined", "Infinity").
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Undefined symbol {0}")]
    UndefinedSymbol(String),

    #[error("Undefined function {0}")]
    UndefinedFunction(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result is Infinity ({0})")]
    Infinity(String),

    #[error("{0}")]
    Domain(String),

    #[error("Expression too deeply nested")]
    TooDeep,
}

/// Contrat du moteur injecté.
///
/// `Value` doit se convertir en f64 ; `Error` n’est lu qu’à travers son message.
pub trait NumericEngine {
    type Value: ToPrimitive;
    type Error: std::error::Error;

    fn evaluate(&self, expression: &str) -> Result<Self::Value, Self::Error>;

    /// Chiffres significatifs de travail.
    fn precision(&self) -> usize;
}

/// Moteur rationnel exact, approché à `precision` chiffres pour le reste.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrecisionEngine {
    chiffres: usize,
}

impl Default for PrecisionEngine {
    fn default() -> Self {
        Self::new(PRECISION_DEFAUT)
    }
}

impl PrecisionEngine {
    /// Précision bornée à [PRECISION_MIN, PRECISION_MAX].
    pub fn new(precision: usize) -> Self {
        Self {
            chiffres: precision.clamp(PRECISION_MIN, PRECISION_MAX),
        }
    }

    /// Échelle de travail (chiffres décimaux après la virgule).
    fn echelle(&self) -> usize {
        self.chiffres + GARDE
    }

    /// Bits significatifs conservés par `borne`.
    fn bits_utiles(&self) -> u64 {
        (self.echelle() as u64 * 3322).div_ceil(1000) + 1
    }

    /// Évalue une chaîne canonique en rationnel.
    pub fn evaluate_rational(&self, expression: &str) -> Result<BigRational, EngineError> {
        let jetons = tokenize(expression)?;
        tracing::trace!(jetons = %format_tokens(&jetons), "Jetons");
        let rpn = to_rpn(&jetons)?;
        let expr = from_rpn(&rpn)?;
        tracing::trace!(arbre = %expr, "Expression analysée");
        self.eval(&expr)
    }

    /// Arrondit un rationnel dont le dénominateur a trop grossi,
    /// en gardant `bits_utiles` bits significatifs (relatifs, pas absolus).
    fn borne(&self, r: BigRational) -> BigRational {
        let lim = self.bits_utiles();
        if r.denom().bits() <= 2 * lim {
            return r;
        }

        let e = lim as i64 - (r.numer().bits() as i64 - r.denom().bits() as i64);
        if e <= 0 {
            return r.round();
        }

        let deux_e = BigInt::one() << e as usize;
        let m = (r * BigRational::from_integer(deux_e.clone())).round();
        BigRational::new(m.to_integer(), deux_e)
    }

    fn eval(&self, e: &Expr) -> Result<BigRational, EngineError> {
        use Expr::*;

        let w = self.echelle();

        let v = match e {
            Rat(r) => r.clone(),
            Const(Constante::Pi) => depuis_fixe(pi_fixe(w), w),
            Const(Constante::E) => exp_rat(&BigRational::one(), w),
            Var(name) => return Err(EngineError::UndefinedSymbol(name.clone())),

            Neg(x) => -self.eval(x)?,
            Add(a, b) => self.eval(a)? + self.eval(b)?,
            Sub(a, b) => self.eval(a)? - self.eval(b)?,
            Mul(a, b) => self.eval(a)? * self.eval(b)?,

            Div(a, b) => {
                let num = self.eval(a)?;
                let den = self.eval(b)?;
                if den.is_zero() {
                    return Err(EngineError::DivisionByZero);
                }
                num / den
            }

            Pow(a, b) => {
                let base = self.eval(a)?;
                let exposant = self.eval(b)?;
                self.puissance(base, exposant)?
            }

            Call(f, x) => {
                let arg = self.eval(x)?;
                self.appel(*f, arg)?
            }
        };

        Ok(self.borne(v))
    }

    /// exp(t) borné : trop grand -> infini, trop petit -> 0.
    fn exp_borne(&self, t: &BigRational) -> Result<BigRational, EngineError> {
        let max = BigRational::from_integer(BigInt::from(EXP_MAX));
        if t > &max {
            return Err(EngineError::Infinity("exponential overflow".into()));
        }
        if t < &-max {
            return Ok(BigRational::zero());
        }
        Ok(exp_rat(t, self.echelle()))
    }

    fn ln(&self, x: &BigRational) -> BigRational {
        let w = self.echelle();
        depuis_fixe(ln_fixe(x, w), w)
    }

    fn puissance(&self, base: BigRational, y: BigRational) -> Result<BigRational, EngineError> {
        if y.is_integer() {
            let n = y.to_integer();

            if base.is_zero() {
                return if n.is_negative() {
                    Err(EngineError::DivisionByZero)
                } else if n.is_zero() {
                    Ok(BigRational::one())
                } else {
                    Ok(BigRational::zero())
                };
            }

            let impair = !(&n % BigInt::from(2)).is_zero();

            if base.abs().is_one() {
                return Ok(if base.is_negative() && impair {
                    -BigRational::one()
                } else {
                    BigRational::one()
                });
            }

            // exact tant que la taille du résultat reste raisonnable
            if let Some(k) = n.to_i64() {
                let bits = (base.numer().bits() + base.denom().bits()).saturating_mul(k.unsigned_abs());
                if bits <= LIMITE_BITS_PUISSANCE {
                    return Ok(rational_pow_int(base, k));
                }
            }

            let m = self.exp_borne(&(y * self.ln(&base.abs())))?;
            return Ok(if base.is_negative() && impair { -m } else { m });
        }

        // exposant fractionnaire
        if base.is_zero() {
            return if y.is_negative() {
                Err(EngineError::DivisionByZero)
            } else {
                Ok(BigRational::zero())
            };
        }
        if base.is_negative() {
            return Err(EngineError::Domain(
                "Complex result: fractional power of a negative number".into(),
            ));
        }

        self.exp_borne(&(y * self.ln(&base)))
    }

    fn appel(&self, f: Fonction, x: BigRational) -> Result<BigRational, EngineError> {
        let w = self.echelle();

        match f {
            Fonction::Sin | Fonction::Cos | Fonction::Tan => {
                if x.abs().to_integer().to_string().len() > MAX_CHIFFRES_TRIG {
                    return Err(EngineError::Domain(format!(
                        "Argument of {} too large",
                        f.nom()
                    )));
                }
                let (s, c) = sin_cos_fixe(&x, w);
                match f {
                    Fonction::Sin => Ok(depuis_fixe(s, w)),
                    Fonction::Cos => Ok(depuis_fixe(c, w)),
                    _ => {
                        if c.is_zero() {
                            return Err(EngineError::Infinity("tangent".into()));
                        }
                        Ok(BigRational::new(s, c))
                    }
                }
            }

            Fonction::Ln | Fonction::Log => {
                if x.is_zero() {
                    return Err(EngineError::Infinity("logarithm of zero is -Infinity".into()));
                }
                if x.is_negative() {
                    return Err(EngineError::Domain(
                        "Complex result: logarithm of a negative number".into(),
                    ));
                }
                let ln = ln_fixe(&x, w);
                Ok(match f {
                    Fonction::Ln => depuis_fixe(ln, w),
                    _ => BigRational::new(ln, ln10_fixe(w)),
                })
            }

            Fonction::Sqrt => {
                if x.is_negative() {
                    return Err(EngineError::Domain(
                        "Complex result: square root of a negative number".into(),
                    ));
                }
                Ok(sqrt_rat(&x, w))
            }

            Fonction::Abs => Ok(x.abs()),
            Fonction::Exp => self.exp_borne(&x),
        }
    }
}

impl NumericEngine for PrecisionEngine {
    type Value = BigRational;
    type Error = EngineError;

    fn evaluate(&self, expression: &str) -> Result<BigRational, EngineError> {
        self.evaluate_rational(expression)
    }

    fn precision(&self) -> usize {
        self.chiffres
    }
}
