//! Noyau exact de l’entraîneur
//!
//! Organisation interne :
//! - rationnel.rs / erreurs.rs / reglages.rs / alea.rs : socle (Q exact, erreurs, constantes, LCG)
//! - saisie.rs          : normalisation de saisie (curseur conservé)
//! - formule.rs         : logique propositionnelle (lecture + affichage canonique)
//! - verite.rs          : tables de vérité, équivalence
//! - transformations.rs : élimination →/↔, De Morgan
//! - ensembles.rs       : algèbre des ensembles (Venn)
//! - angle.rs / valeur_exacte.rs / trig.rs : trigonométrie exacte
//! - jetons.rs / rpn.rs / expr.rs / echantillonnage.rs : expressions arithmétiques
//! - sophismes.rs       : banque de sophismes trigonométriques
//! - taches/ , taches_trig.rs : génération et correction des exercices

pub mod alea;
pub mod angle;
pub mod echantillonnage;
pub mod ensembles;
pub mod erreurs;
pub mod expr;
pub mod formule;
pub mod jetons;
pub mod rationnel;
pub mod reglages;
pub mod rpn;
pub mod saisie;
pub mod sophismes;
pub mod taches;
pub mod taches_trig;
pub mod transformations;
pub mod trig;
pub mod valeur_exacte;
pub mod verite;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use angle::{angles_equal, normalize_angle, parse_angle, Angle};
pub use ensembles::{
    are_set_expr_equivalent, compute_region_mask_from_expr, eval_set_expr, is_disjoint, is_subset,
    parse_set_expression, set_expr_to_string, truth_table_set, EnsembleExpr,
};
pub use erreurs::{NoyauError, Resultat};
pub use formule::{ast_to_string, parse_formula, Formule};
pub use rationnel::{parse_rational, rational_to_string, Rationnel};
pub use reglages::Difficulte;
pub use saisie::normalize_with_cursor;
pub use sophismes::{check_fallacy_answer, generate_fallacy_rule, FallacyTask, Verdict};
pub use taches::{check_answer, generate_task, CheckResult, MathTask, ModeTache};
pub use taches_trig::{check_trig_answer, generate_trig_task, TrigTask};
pub use transformations::{
    contains_iff, contains_implication, eliminate_iff_only, eliminate_implications,
    negate_with_de_morgan,
};
pub use trig::{sin_cos_tan_exact, TrigExact, TrigFn};
pub use valeur_exacte::{format_exact, parse_exact_value, tan_from_exact, ValeurExacte};
pub use verite::{are_equivalent, evaluate_formula, truth_table, truth_table_equality};
