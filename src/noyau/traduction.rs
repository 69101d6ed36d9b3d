// src/noyau/traduction.rs
//
// Traduction de notation : forme d’affichage (glyphes) <-> forme canonique (ASCII)
// -------------------------------------------------------------------------------
// Ordre fixe (important) :
//   1) suppression des espaces
//   2) table des opérateurs   (× ÷ −  -> * / -)
//   3) table des fonctions    (π x²   -> pi ^2)
//   4) multiplications implicites (2( -> 2*(, )( -> )*(, 2sin -> 2*sin)
//
// Les opérateurs passent AVANT les multiplications implicites : on détecte
// sur les caractères canoniques, jamais sur les glyphes.
//
// Fonction pure : même entrée -> même sortie, aucun état caché.

use super::validation;

/// Glyphe d’affichage -> opérateur canonique.
pub const OPERATOR_MAP: [(&str, &str); 3] = [("×", "*"), ("÷", "/"), ("−", "-")];

/// Jeton d’affichage -> forme canonique.
pub const FUNCTION_MAP: [(&str, &str); 2] = [("π", "pi"), ("x²", "^2")];

/// Forme canonique -> affichage, dans l’ordre de restitution
/// (motifs longs d’abord : `^2` et `pi` avant les opérateurs d’un caractère).
pub const DISPLAY_MAP: [(&str, &str); 5] = [
    ("^2", "x²"),
    ("pi", "π"),
    ("*", "×"),
    ("/", "÷"),
    ("-", "−"),
];

/// Fonctions devant lesquelles un chiffre implique une multiplication.
pub const IMPLICIT_FUNCTIONS: [&str; 5] = ["sin", "cos", "tan", "log", "ln"];

/// Traduit une saisie brute en forme canonique.
/// Ne lève jamais : entrée vide -> chaîne vide.
pub fn translate(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // 1) espaces
    let mut out: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    // 2) opérateurs
    for (glyphe, canon) in OPERATOR_MAP {
        out = out.replace(glyphe, canon);
    }

    // 3) fonctions
    for (jeton, canon) in FUNCTION_MAP {
        out = out.replace(jeton, canon);
    }

    // 4) multiplications implicites
    insert_implicit_multiplication(&out)
}

/// Rend explicites les multiplications implicites.
///
/// Trois déclencheurs, sans recouvrement :
/// - chiffre suivi de `(`
/// - `)` suivi de `(`
/// - chiffre suivi d’un nom de `IMPLICIT_FUNCTIONS`
pub fn insert_implicit_multiplication(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len() + 8);

    for (i, c) in expression.char_indices() {
        out.push(c);

        let reste = &expression[i + c.len_utf8()..];
        let chiffre = c.is_ascii_digit();

        if (chiffre || c == ')') && reste.starts_with('(') {
            out.push('*');
        } else if chiffre && IMPLICIT_FUNCTIONS.iter().any(|f| reste.starts_with(f)) {
            out.push('*');
        }
    }

    out
}

/// Restitue les glyphes d’affichage d’une forme canonique.
/// Sans effet sur un texte déjà en forme d’affichage.
pub fn format_for_display(canonical: &str) -> String {
    let mut out = canonical.to_string();
    for (canon, glyphe) in DISPLAY_MAP {
        out = out.replace(canon, glyphe);
    }
    out
}

/* ------------------------ Collaborateur "notation" ------------------------ */

/// Ce que l’orchestrateur attend du collaborateur de notation :
/// contrôle structurel + traduction + restitution.
pub trait Notation {
    /// Contrôle structurel détaillé : première règle en échec.
    fn check(&self, raw: &str) -> Result<(), validation::Rejection>;

    fn validate(&self, raw: &str) -> bool {
        self.check(raw).is_ok()
    }

    fn translate(&self, raw: &str) -> String;
    fn format_for_display(&self, canonical: &str) -> String;
}

/// Implémentation standard : tables statiques (`OPERATOR_MAP`, `FUNCTION_MAP`,
/// `DISPLAY_MAP`), figées à la compilation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionParser;

impl ExpressionParser {
    pub fn new() -> Self {
        Self
    }
}

impl Notation for ExpressionParser {
    fn check(&self, raw: &str) -> Result<(), validation::Rejection> {
        validation::check(raw)
    }

    fn translate(&self, raw: &str) -> String {
        translate(raw)
    }

    fn format_for_display(&self, canonical: &str) -> String {
        format_for_display(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- opérateurs ---

    #[test]
    fn operateurs_un_par_un() {
        assert_eq!(translate("2×3"), "2*3");
        assert_eq!(translate("10÷2"), "10/2");
        assert_eq!(translate("5−3"), "5-3");
    }

    #[test]
    fn operateurs_multiples() {
        assert_eq!(translate("2×3÷4−1"), "2*3/4-1");
    }

    #[test]
    fn aller_retour_par_glyphe() {
        for (glyphe, canon) in OPERATOR_MAP {
            let brut = format!("2{glyphe}3");
            let c = translate(&brut);
            assert_eq!(c, format!("2{canon}3"), "glyphe={glyphe}");
            assert_eq!(format_for_display(&c), brut, "glyphe={glyphe}");
        }
    }

    // --- fonctions ---

    #[test]
    fn carre_et_pi() {
        assert_eq!(translate("5x²"), "5^2");
        assert_eq!(translate("2×π"), "2*pi");
    }

    #[test]
    fn fonctions_inchangees() {
        assert_eq!(translate("sin(30)"), "sin(30)");
        assert_eq!(translate("cos(0)"), "cos(0)");
        assert_eq!(translate("tan(45)"), "tan(45)");
        assert_eq!(translate("log(100)"), "log(100)");
        assert_eq!(translate("ln(10)"), "ln(10)");
    }

    // --- multiplications implicites ---

    #[test]
    fn implicite_chiffre_parenthese() {
        assert_eq!(translate("2(3+4)"), "2*(3+4)");
    }

    #[test]
    fn implicite_entre_parentheses() {
        assert_eq!(translate("(2+3)(4+5)"), "(2+3)*(4+5)");
    }

    #[test]
    fn implicite_chiffre_fonction() {
        assert_eq!(translate("2sin(30)"), "2*sin(30)");
        assert_eq!(translate("3log(10)"), "3*log(10)");
        assert_eq!(translate("4ln(2)"), "4*ln(2)");
    }

    #[test]
    fn implicite_apres_traduction_des_glyphes() {
        // `−` est traduit avant la détection : 2(−1) reste un produit
        assert_eq!(translate("2(−1)"), "2*(-1)");
        assert_eq!(translate("(1)(2)(3)"), "(1)*(2)*(3)");
    }

    // --- composés ---

    #[test]
    fn expression_composee() {
        assert_eq!(translate("(2+3)×sin(30)÷π"), "(2+3)*sin(30)/pi");
        assert_eq!(translate("sin(cos(0))"), "sin(cos(0))");
        assert_eq!(translate("2×π÷4−1"), "2*pi/4-1");
    }

    // --- bords ---

    #[test]
    fn espaces() {
        assert_eq!(translate("2 × 3"), "2*3");
        assert_eq!(translate(" 2\t×  3 "), "2*3");
        assert_eq!(translate("2 (3)"), "2*(3)");
    }

    #[test]
    fn vide() {
        assert_eq!(translate(""), "");
        assert_eq!(translate("   "), "");
        assert_eq!(format_for_display(""), "");
    }

    // --- affichage ---

    #[test]
    fn affichage() {
        assert_eq!(format_for_display("2*3/4-1"), "2×3÷4−1");
        assert_eq!(format_for_display("5^2"), "5x²");
        assert_eq!(format_for_display("2*pi"), "2×π");
    }

    #[test]
    fn affichage_idempotent_sur_glyphes() {
        let d = "2×3÷4−1+π×5x²";
        assert_eq!(format_for_display(d), d);
    }

    #[test]
    fn collaborateur_notation() {
        let p = ExpressionParser::new();
        assert!(p.validate("2×3"));
        assert_eq!(
            p.check("2 × ÷ 3"),
            Err(validation::Rejection::AdjacentOperators('*', '/'))
        );
        assert_eq!(p.check(""), Err(validation::Rejection::Empty));
        assert_eq!(p.translate("2×3"), "2*3");
        assert_eq!(p.format_for_display("2*3"), "2×3");
    }

    proptest! {
        #[test]
        fn affichage_idempotent(s in "[0-9pi^*/+()x.-]{0,24}") {
            let une = format_for_display(&s);
            prop_assert_eq!(format_for_display(&une), une);
        }

        #[test]
        fn traduction_deterministe_sans_espaces(s in "[0-9 ×÷−π()+sin]{0,24}") {
            let a = translate(&s);
            prop_assert_eq!(&a, &translate(&s));
            prop_assert!(!a.chars().any(char::is_whitespace));
        }
    }
}
