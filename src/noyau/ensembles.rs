// src/noyau/ensembles.rs
//
// Expressions ensemblistes (algèbre de Boole sur A, B, C)
// -------------------------------------------------------
// Grammaire :
//   union  -> diff ((∪|Δ) diff)*      (∪ et Δ : même niveau, gauche à droite)
//   diff   -> inter (∖ inter)*
//   inter  -> suffix (∩ suffix)*
//   suffix -> primary ('^c')*         (complément postfixe, répétable)
//   primary -> '(' union ')' | ∅ | Ω | U | A | B | C
//
// Sémantique booléenne par région de Venn (appartenance) :
//   ∪ = OU, ∩ = ET, A∖B = A ∧ ¬B, Δ = XOR, complément = NON.
//
// Masque de régions : bit idx = 1 ssi l’expression est vraie pour l’affectation idx
// (même convention de bits que verite.rs). C’est la seule passerelle diagramme <-> terme.

use std::collections::BTreeSet;
use std::fmt;

use super::erreurs::{NoyauError, Resultat};
use super::saisie::normaliser;
use super::verite::{affectation_indexee, bits_affectation, LigneVerite, TableVerite};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnsembleExpr {
    Var(char),
    /// false = ∅, true = Ω (univers)
    Const(bool),
    Not(Box<EnsembleExpr>),
    Union(Box<EnsembleExpr>, Box<EnsembleExpr>),
    Inter(Box<EnsembleExpr>, Box<EnsembleExpr>),
    Diff(Box<EnsembleExpr>, Box<EnsembleExpr>),
    Sym(Box<EnsembleExpr>, Box<EnsembleExpr>),
}

impl EnsembleExpr {
    pub fn complement(x: EnsembleExpr) -> EnsembleExpr {
        EnsembleExpr::Not(Box::new(x))
    }

    pub fn variables(&self) -> Vec<char> {
        let mut acc = BTreeSet::new();
        self.collecte_variables(&mut acc);
        acc.into_iter().collect()
    }

    fn collecte_variables(&self, acc: &mut BTreeSet<char>) {
        use EnsembleExpr::*;
        match self {
            Var(c) => {
                acc.insert(*c);
            }
            Const(_) => {}
            Not(x) => x.collecte_variables(acc),
            Union(a, b) | Inter(a, b) | Diff(a, b) | Sym(a, b) => {
                a.collecte_variables(acc);
                b.collecte_variables(acc);
            }
        }
    }

    fn precedence(&self) -> u8 {
        use EnsembleExpr::*;
        match self {
            Union(_, _) | Sym(_, _) => 1,
            Diff(_, _) => 2,
            Inter(_, _) => 3,
            Not(_) => 4,
            Var(_) | Const(_) => 5,
        }
    }
}

/* ------------------------ Lecture ------------------------ */

pub fn parse_set_expression(text: &str) -> Resultat<EnsembleExpr> {
    let normalise = normaliser(text);
    log::debug!("parse_set_expression({text:?}) -> {normalise:?}");

    let mut p = Lecteur {
        chars: normalise.chars().collect(),
        pos: 0,
    };
    let e = p.union()?;
    p.saute_espaces();
    if p.pos < p.chars.len() {
        let reste: String = p.chars[p.pos..].iter().collect();
        return Err(NoyauError::syntaxe(format!(
            "reste non lu à la position {} : '{reste}'",
            p.pos
        )));
    }
    Ok(e)
}

struct Lecteur {
    chars: Vec<char>,
    pos: usize,
}

impl Lecteur {
    fn saute_espaces(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn courant(&mut self) -> Option<char> {
        self.saute_espaces();
        self.chars.get(self.pos).copied()
    }

    fn union(&mut self) -> Resultat<EnsembleExpr> {
        let mut gauche = self.diff()?;
        loop {
            match self.courant() {
                Some('∪') => {
                    self.pos += 1;
                    let droite = self.diff()?;
                    gauche = EnsembleExpr::Union(Box::new(gauche), Box::new(droite));
                }
                Some('Δ') | Some('△') => {
                    self.pos += 1;
                    let droite = self.diff()?;
                    gauche = EnsembleExpr::Sym(Box::new(gauche), Box::new(droite));
                }
                _ => return Ok(gauche),
            }
        }
    }

    fn diff(&mut self) -> Resultat<EnsembleExpr> {
        let mut gauche = self.inter()?;
        while matches!(self.courant(), Some('∖') | Some('\\')) {
            self.pos += 1;
            let droite = self.inter()?;
            gauche = EnsembleExpr::Diff(Box::new(gauche), Box::new(droite));
        }
        Ok(gauche)
    }

    fn inter(&mut self) -> Resultat<EnsembleExpr> {
        let mut gauche = self.suffix()?;
        while self.courant() == Some('∩') {
            self.pos += 1;
            let droite = self.suffix()?;
            gauche = EnsembleExpr::Inter(Box::new(gauche), Box::new(droite));
        }
        Ok(gauche)
    }

    fn suffix(&mut self) -> Resultat<EnsembleExpr> {
        let mut e = self.primary()?;
        while self.courant() == Some('^') {
            let pos_chapeau = self.pos;
            self.pos += 1;
            if self.chars.get(self.pos) != Some(&'c') {
                return Err(NoyauError::syntaxe(format!(
                    "'^' à la position {pos_chapeau} doit être suivi de 'c' (complément)"
                )));
            }
            self.pos += 1;
            e = EnsembleExpr::complement(e);
        }
        Ok(e)
    }

    fn primary(&mut self) -> Resultat<EnsembleExpr> {
        let courant = self.courant();
        let debut = self.pos;
        match courant {
            None => Err(NoyauError::syntaxe(format!(
                "fin d’entrée prématurée à la position {debut} : ensemble attendu"
            ))),
            Some('(') => {
                let ouvrante = self.pos;
                self.pos += 1;
                let e = self.union()?;
                if self.courant() != Some(')') {
                    return Err(NoyauError::syntaxe(format!(
                        "parenthèse fermante manquante (ouverte à la position {ouvrante})"
                    )));
                }
                self.pos += 1;
                Ok(e)
            }
            Some('∅') => {
                self.pos += 1;
                Ok(EnsembleExpr::Const(false))
            }
            Some('Ω') | Some('U') => {
                self.pos += 1;
                Ok(EnsembleExpr::Const(true))
            }
            Some(c @ ('A' | 'B' | 'C')) => {
                self.pos += 1;
                Ok(EnsembleExpr::Var(c))
            }
            Some(c) => Err(NoyauError::syntaxe(format!(
                "symbole inconnu '{c}' à la position {debut}"
            ))),
        }
    }
}

/* ------------------------ Évaluation + oracles ------------------------ */

/// Évalue l’appartenance pour une affectation (nom -> dedans ?). Absent = dehors.
pub fn eval_set_expr(e: &EnsembleExpr, a: &std::collections::BTreeMap<char, bool>) -> bool {
    use EnsembleExpr::*;
    match e {
        Var(c) => a.get(c).copied().unwrap_or(false),
        Const(b) => *b,
        Not(x) => !eval_set_expr(x, a),
        Union(l, r) => eval_set_expr(l, a) || eval_set_expr(r, a),
        Inter(l, r) => eval_set_expr(l, a) && eval_set_expr(r, a),
        Diff(l, r) => eval_set_expr(l, a) && !eval_set_expr(r, a),
        Sym(l, r) => eval_set_expr(l, a) != eval_set_expr(r, a),
    }
}

fn variables_communes(l: &EnsembleExpr, r: &EnsembleExpr) -> Vec<char> {
    let mut acc = BTreeSet::new();
    l.collecte_variables(&mut acc);
    r.collecte_variables(&mut acc);
    acc.into_iter().collect()
}

/// Vrai ssi `relation(eval(l), eval(r))` pour toutes les affectations.
fn pour_toute_affectation(
    l: &EnsembleExpr,
    r: &EnsembleExpr,
    relation: impl Fn(bool, bool) -> bool,
) -> bool {
    let noms = variables_communes(l, r);
    (0..1usize << noms.len()).all(|idx| {
        let a = affectation_indexee(&noms, idx);
        relation(eval_set_expr(l, &a), eval_set_expr(r, &a))
    })
}

pub fn are_set_expr_equivalent(l: &EnsembleExpr, r: &EnsembleExpr) -> bool {
    pour_toute_affectation(l, r, |x, y| x == y)
}

pub fn is_subset(l: &EnsembleExpr, r: &EnsembleExpr) -> bool {
    pour_toute_affectation(l, r, |x, y| !x || y)
}

pub fn is_disjoint(l: &EnsembleExpr, r: &EnsembleExpr) -> bool {
    pour_toute_affectation(l, r, |x, y| !(x && y))
}

pub const NOMS_MAX: usize = 3;

/// Masque de régions sur un ordre de noms explicite (2 ou 3 noms -> 4 ou 8 bits).
pub fn compute_region_mask_from_expr(e: &EnsembleExpr, noms: &[char]) -> Resultat<u32> {
    if noms.len() > NOMS_MAX {
        return Err(NoyauError::domaine(format!(
            "{} ensembles : un diagramme en compte au plus {NOMS_MAX}",
            noms.len()
        )));
    }
    Ok((0..1usize << noms.len())
        .filter(|&idx| eval_set_expr(e, &affectation_indexee(noms, idx)))
        .fold(0u32, |masque, idx| masque | (1 << idx)))
}

/// Table de vérité sur un ordre de noms explicite.
pub fn truth_table_set(e: &EnsembleExpr, noms: &[char]) -> TableVerite {
    let k = noms.len();
    let rows = (0..1usize << k)
        .map(|idx| LigneVerite {
            assignment: bits_affectation(idx, k),
            result: eval_set_expr(e, &affectation_indexee(noms, idx)),
        })
        .collect();
    TableVerite {
        variables: noms.to_vec(),
        rows,
    }
}

/// Terme saisi vs diagramme : comparaison par masques uniquement.
pub fn terme_correspond_au_masque(saisie: &str, masque: u32, noms: &[char]) -> Resultat<bool> {
    let e = parse_set_expression(saisie)?;
    let obtenu = compute_region_mask_from_expr(&e, noms)?;
    log::debug!("terme {saisie:?} : masque {obtenu:#b}, attendu {masque:#b}");
    Ok(obtenu == masque)
}

/* ------------------------ Affichage ------------------------ */

pub fn set_expr_to_string(e: &EnsembleExpr) -> String {
    use EnsembleExpr::*;
    match e {
        Var(c) => c.to_string(),
        Const(false) => "∅".to_string(),
        Const(true) => "Ω".to_string(),
        Not(x) => {
            let sx = set_expr_to_string(x);
            if x.precedence() < e.precedence() {
                format!("({sx})^c")
            } else {
                format!("{sx}^c")
            }
        }
        Union(a, b) => binaire(e, a, b, "∪"),
        Sym(a, b) => binaire(e, a, b, "Δ"),
        Diff(a, b) => binaire(e, a, b, "∖"),
        Inter(a, b) => binaire(e, a, b, "∩"),
    }
}

fn binaire(parent: &EnsembleExpr, a: &EnsembleExpr, b: &EnsembleExpr, op: &str) -> String {
    let p = parent.precedence();
    let sa = set_expr_to_string(a);
    let sb = set_expr_to_string(b);
    let sa = if a.precedence() < p { format!("({sa})") } else { sa };
    let sb = if b.precedence() <= p { format!("({sb})") } else { sb };
    format!("{sa} {op} {sb}")
}

impl fmt::Display for EnsembleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", set_expr_to_string(self))
    }
}
