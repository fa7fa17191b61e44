// src/noyau/transformations.rs
//
// Réécritures propositionnelles (toujours de nouveaux arbres) :
// - eliminate_implications : A ⇒ B -> ¬A ∨ B ; A ⇔ B -> (A ⇒ B) ∧ (B ⇒ A), puis récursion
// - eliminate_iff_only     : seulement ⇔ ; ⇒ reste intact
// - negate_with_de_morgan  : pousse ¬ jusqu’aux feuilles (⇒/⇔ éliminés d’abord), ¬¬ s’annule
//
// Correction vérifiée par l’oracle de verite.rs (tables complètes), pas par motif.

use super::formule::Formule;

pub fn eliminate_implications(f: &Formule) -> Formule {
    use Formule::*;
    match f {
        Var(_) => f.clone(),
        Not(x) => Formule::not(eliminate_implications(x)),
        And(a, b) => Formule::and(eliminate_implications(a), eliminate_implications(b)),
        Or(a, b) => Formule::or(eliminate_implications(a), eliminate_implications(b)),
        Imp(a, b) => Formule::or(
            Formule::not(eliminate_implications(a)),
            eliminate_implications(b),
        ),
        Iff(a, b) => {
            let aller = Formule::imp((**a).clone(), (**b).clone());
            let retour = Formule::imp((**b).clone(), (**a).clone());
            eliminate_implications(&Formule::and(aller, retour))
        }
    }
}

pub fn eliminate_iff_only(f: &Formule) -> Formule {
    use Formule::*;
    match f {
        Var(_) => f.clone(),
        Not(x) => Formule::not(eliminate_iff_only(x)),
        And(a, b) => Formule::and(eliminate_iff_only(a), eliminate_iff_only(b)),
        Or(a, b) => Formule::or(eliminate_iff_only(a), eliminate_iff_only(b)),
        Imp(a, b) => Formule::imp(eliminate_iff_only(a), eliminate_iff_only(b)),
        Iff(a, b) => {
            let a = eliminate_iff_only(a);
            let b = eliminate_iff_only(b);
            Formule::and(
                Formule::imp(a.clone(), b.clone()),
                Formule::imp(b, a),
            )
        }
    }
}

/// Négation de `f` poussée aux feuilles (résultat sans ⇒ ni ⇔).
pub fn negate_with_de_morgan(f: &Formule) -> Formule {
    use Formule::*;
    match f {
        Var(_) => Formule::not(f.clone()),
        // ¬¬x = x
        Not(x) => eliminate_implications(x),
        And(a, b) => Formule::or(negate_with_de_morgan(a), negate_with_de_morgan(b)),
        Or(a, b) => Formule::and(negate_with_de_morgan(a), negate_with_de_morgan(b)),
        Imp(_, _) | Iff(_, _) => negate_with_de_morgan(&eliminate_implications(f)),
    }
}

pub fn contains_implication(f: &Formule) -> bool {
    use Formule::*;
    match f {
        Var(_) => false,
        Imp(_, _) => true,
        Not(x) => contains_implication(x),
        And(a, b) | Or(a, b) | Iff(a, b) => contains_implication(a) || contains_implication(b),
    }
}

pub fn contains_iff(f: &Formule) -> bool {
    use Formule::*;
    match f {
        Var(_) => false,
        Iff(_, _) => true,
        Not(x) => contains_iff(x),
        And(a, b) | Or(a, b) | Imp(a, b) => contains_iff(a) || contains_iff(b),
    }
}
