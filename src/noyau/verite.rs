// src/noyau/verite.rs
//
// Évaluation + tables de vérité + oracle d’équivalence.
//
// Convention d’énumération (partagée avec ensembles.rs) :
//   k variables triées, affectation d’indice idx,
//   variable i vaut (idx >> (k-1-i)) & 1  (la première variable = bit de poids fort).
//
// Équivalence = mêmes valeurs sur TOUTES les affectations de l’union des variables.
// C’est la seule notion de “transformation correcte” du noyau.

use std::collections::{BTreeMap, BTreeSet};

use super::erreurs::Resultat;
use super::formule::{parse_formula, Formule};

/// Affectation nom -> valeur. Une variable absente vaut faux.
pub type Affectation = BTreeMap<char, bool>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigneVerite {
    pub assignment: Vec<bool>,
    pub result: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableVerite {
    pub variables: Vec<char>,
    pub rows: Vec<LigneVerite>,
}

impl TableVerite {
    pub fn nb_vraies(&self) -> usize {
        self.rows.iter().filter(|l| l.result).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigneComparee {
    pub assignment: Vec<bool>,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EgaliteTables {
    pub equal: bool,
    pub variables: Vec<char>,
    pub table: Vec<LigneComparee>,
}

pub fn evaluate_formula(f: &Formule, a: &Affectation) -> bool {
    use Formule::*;
    match f {
        Var(c) => a.get(c).copied().unwrap_or(false),
        Not(x) => !evaluate_formula(x, a),
        And(l, r) => evaluate_formula(l, a) && evaluate_formula(r, a),
        Or(l, r) => evaluate_formula(l, a) || evaluate_formula(r, a),
        Imp(l, r) => !evaluate_formula(l, a) || evaluate_formula(r, a),
        Iff(l, r) => evaluate_formula(l, a) == evaluate_formula(r, a),
    }
}

/// Bits de l’affectation d’indice `idx` sur `k` variables.
pub fn bits_affectation(idx: usize, k: usize) -> Vec<bool> {
    (0..k).map(|i| (idx >> (k - 1 - i)) & 1 == 1).collect()
}

/// Affectation nommée d’indice `idx` (même convention de bits).
pub fn affectation_indexee<K: Ord + Copy>(noms: &[K], idx: usize) -> BTreeMap<K, bool> {
    noms.iter()
        .copied()
        .zip(bits_affectation(idx, noms.len()))
        .collect()
}

pub fn truth_table(f: &Formule) -> TableVerite {
    let variables = f.variables();
    let k = variables.len();

    let rows = (0..1usize << k)
        .map(|idx| {
            let a = affectation_indexee(&variables, idx);
            LigneVerite {
                assignment: bits_affectation(idx, k),
                result: evaluate_formula(f, &a),
            }
        })
        .collect();

    TableVerite { variables, rows }
}

pub fn truth_table_equality(left: &Formule, right: &Formule) -> EgaliteTables {
    let mut acc = BTreeSet::new();
    left.collecte_variables(&mut acc);
    right.collecte_variables(&mut acc);
    let variables: Vec<char> = acc.into_iter().collect();
    let k = variables.len();

    let table: Vec<LigneComparee> = (0..1usize << k)
        .map(|idx| {
            let a = affectation_indexee(&variables, idx);
            LigneComparee {
                assignment: bits_affectation(idx, k),
                left: evaluate_formula(left, &a),
                right: evaluate_formula(right, &a),
            }
        })
        .collect();

    let equal = table.iter().all(|l| l.left == l.right);
    EgaliteTables {
        equal,
        variables,
        table,
    }
}

pub fn formules_equivalentes(left: &Formule, right: &Formule) -> bool {
    truth_table_equality(left, right).equal
}

/// Équivalence sur texte (les deux côtés sont lus).
pub fn are_equivalent(left: &str, right: &str) -> Resultat<bool> {
    let l = parse_formula(left)?;
    let r = parse_formula(right)?;
    let equal = formules_equivalentes(&l, &r);
    log::debug!("are_equivalent({left:?}, {right:?}) = {equal}");
    Ok(equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Formule {
        parse_formula(s).unwrap_or_else(|e| panic!("parse_formula({s:?}) erreur: {e}"))
    }

    #[test]
    fn table_ou_trois_vraies() {
        let t = truth_table(&p("B ∨ A"));
        assert_eq!(t.variables, vec!['A', 'B']);
        assert_eq!(t.rows.len(), 4);
        assert_eq!(t.nb_vraies(), 3);
        // première ligne : A=0,B=0 -> faux
        assert_eq!(t.rows[0].assignment, vec![false, false]);
        assert!(!t.rows[0].result);
    }

    #[test]
    fn convention_poids_fort() {
        // idx 2 sur (A,B) : A=1, B=0
        assert_eq!(bits_affectation(2, 2), vec![true, false]);
        let t = truth_table(&p("A ∧ ¬B"));
        let vraies: Vec<usize> = t
            .rows
            .iter()
            .enumerate()
            .filter(|(_, l)| l.result)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(vraies, vec![2]);
    }

    #[test]
    fn equivalences_de_base() {
        assert!(are_equivalent("A ⇒ B", "¬A ∨ B").unwrap());
        assert!(!are_equivalent("A∧B", "A∨B").unwrap());
        assert!(are_equivalent("A ⇔ B", "(A ⇒ B) ∧ (B ⇒ A)").unwrap());
        assert!(are_equivalent("¬(A ∧ B)", "¬A ∨ ¬B").unwrap());
    }

    #[test]
    fn union_des_variables() {
        // A ∨ ¬A ne mentionne pas B, mais la comparaison se fait sur {A,B}
        let eg = truth_table_equality(&p("A ∨ ¬A"), &p("B ⇒ B"));
        assert_eq!(eg.variables, vec!['A', 'B']);
        assert_eq!(eg.table.len(), 4);
        assert!(eg.equal);
    }

    #[test]
    fn erreur_propagee() {
        assert!(are_equivalent("A ∧", "A").is_err());
    }

    #[test]
    fn variable_absente_fausse() {
        let a = Affectation::new();
        assert!(!evaluate_formula(&p("A"), &a));
        assert!(evaluate_formula(&p("A ⇒ B"), &a));
    }
}
