//! src/noyau/calculatrice.rs
//!
//! Orchestrateur : le seul point d’entrée des frontaux.
//!
//! Rôle : enchaîner contrôle -> traduction -> évaluation, et garantir au bord
//! un résultat qui est soit un nombre, soit une chaîne "Error: ...".
//!
//! Contrats :
//! - Aucune erreur ne traverse `calculate` (panique comprise).
//! - Le mode d’angle est lu une fois par évaluation (pas d’effet rétroactif).
//! - Collaborateurs fournis à la construction : leur présence est garantie par les types.

use std::panic::{self, AssertUnwindSafe};

use super::angle::AngleMode;
use super::erreur::{CalcError, Calculation, EvaluationOutcome};
use super::eval::Evaluator;
use super::moteur::{NumericEngine, PrecisionEngine};
use super::traduction::{ExpressionParser, Notation};

#[derive(Clone, Debug, Default)]
pub struct Calculator<N: Notation = ExpressionParser, M: NumericEngine = PrecisionEngine> {
    notation: N,
    evaluator: Evaluator<M>,
}

impl<N: Notation, M: NumericEngine> Calculator<N, M> {
    pub fn new(notation: N, evaluator: Evaluator<M>) -> Self {
        Self {
            notation,
            evaluator,
        }
    }

    /// Résultat typé (nombre OU erreur), sans conversion en chaîne.
    pub fn outcome(&self, expression: &str) -> EvaluationOutcome {
        if let Err(raison) = self.notation.check(expression) {
            tracing::debug!(expression, raison = %raison, "Refus du contrôle structurel");
            return CalcError::InvalidExpression.into();
        }

        let canonique = self.notation.translate(expression);
        tracing::debug!(saisie = expression, canonique = %canonique, "Traduction");

        self.evaluator.evaluate(&canonique)
    }

    /// Point d’entrée des frontaux : nombre, ou "Error: <message>".
    ///
    /// Une panique d’un collaborateur est rattrapée et rendue comme erreur.
    pub fn calculate(&self, expression: &str) -> Calculation {
        match panic::catch_unwind(AssertUnwindSafe(|| self.outcome(expression))) {
            Ok(o) => o.into(),
            Err(charge) => {
                let msg = charge
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| charge.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "Unknown error".to_string());
                tracing::error!(expression, erreur = %msg, "Panique pendant le calcul");
                Calculation::error(msg)
            }
        }
    }

    /// Change le mode d’angle ("deg" | "rad") ; tout autre jeton est refusé
    /// et le mode reste inchangé.
    pub fn set_angle_mode(&mut self, mode: &str) -> Result<(), CalcError> {
        let m: AngleMode = mode.parse()?;
        self.evaluator.set_angle_mode(m);
        tracing::info!(mode = %m, "Mode d’angle");
        Ok(())
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.evaluator.angle_mode()
    }

    /// Forme canonique -> glyphes d’affichage.
    pub fn format_for_display(&self, canonical: &str) -> String {
        self.notation.format_for_display(canonical)
    }

    pub fn notation(&self) -> &N {
        &self.notation
    }

    pub fn evaluator(&self) -> &Evaluator<M> {
        &self.evaluator
    }
}
