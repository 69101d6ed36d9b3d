// src/noyau/erreur.rs
//
// Taxonomie des erreurs + résultat typé de l’évaluation.
//
// Le noyau garde un résultat étiqueté (Number | Error) jusqu’au bord ;
// la conversion en chaîne "Error: ..." ne se fait que dans `Calculation`.

use std::fmt;

use crate::noyau::format::format_number;

/// Préfixe du contrat d’affichage : toute chaîne d’erreur commence par lui.
pub const ERROR_PREFIX: &str = "Error: ";

/// Erreurs du noyau (une variante = un genre).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// Échec du contrôle structurel, ou erreur de syntaxe du moteur.
    #[error("Invalid expression")]
    InvalidExpression,

    /// Forme canonique vide ou blanche, passée directement à l’évaluateur.
    #[error("Empty expression")]
    EmptyExpression,

    /// Infini signalé par le moteur, ou conversion finale non finie.
    #[error("Division by zero")]
    DivisionByZero,

    /// Identifiant ou fonction inconnus du moteur.
    #[error("Undefined symbol")]
    UndefinedSymbol,

    /// Mode d’angle hors {deg, rad}.
    #[error("Invalid angle mode \"{0}\". Use \"deg\" or \"rad\".")]
    InvalidAngleMode(String),

    /// Tout autre échec du moteur : message d’origine, tel quel.
    #[error("{0}")]
    EvaluationError(String),
}

/// Résultat typé : un nombre fini OU une erreur, jamais les deux.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationOutcome {
    Number(f64),
    Error(CalcError),
}

impl EvaluationOutcome {
    pub fn number(&self) -> Option<f64> {
        match self {
            EvaluationOutcome::Number(v) => Some(*v),
            EvaluationOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CalcError> {
        match self {
            EvaluationOutcome::Number(_) => None,
            EvaluationOutcome::Error(e) => Some(e),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, EvaluationOutcome::Number(_))
    }
}

impl From<CalcError> for EvaluationOutcome {
    fn from(e: CalcError) -> Self {
        EvaluationOutcome::Error(e)
    }
}

/// Valeur de bord renvoyée par `calculate` : nombre, ou message "Error: ...".
#[derive(Clone, Debug, PartialEq)]
pub enum Calculation {
    Number(f64),
    Error(String),
}

impl Calculation {
    /// Erreur d’après le préfixe (contrat de la couche d’affichage), pas d’après le type.
    pub fn is_error(&self) -> bool {
        match self {
            Calculation::Number(_) => false,
            Calculation::Error(msg) => msg.starts_with(ERROR_PREFIX),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Calculation::Number(v) => Some(*v),
            Calculation::Error(_) => None,
        }
    }

    /// Message d’erreur préfixé, quel que soit le texte reçu.
    pub fn error(msg: impl fmt::Display) -> Self {
        Calculation::Error(format!("{ERROR_PREFIX}{msg}"))
    }
}

impl From<EvaluationOutcome> for Calculation {
    fn from(o: EvaluationOutcome) -> Self {
        match o {
            EvaluationOutcome::Number(v) => Calculation::Number(v),
            EvaluationOutcome::Error(e) => Calculation::error(e),
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calculation::Number(v) => f.write_str(&format_number(*v)),
            Calculation::Error(msg) => f.write_str(msg),
        }
    }
}
