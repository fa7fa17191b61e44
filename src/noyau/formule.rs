// src/noyau/formule.rs
//
// Logique propositionnelle : AST + lecture + affichage canonique.
//
// Grammaire (précédence croissante) :
//   iff  -> imp (⇔ imp)*
//   imp  -> or  (⇒ or)*
//   or   -> and (∨ and)*
//   and  -> not (∧ not)*
//   not  -> ¬ not | primary
//   primary -> '(' iff ')' | [A-Z]
// Tous les binaires sont associatifs à gauche ; ¬ est préfixe.
//
// La saisie passe d’abord par saisie::normaliser (ASCII -> symboles).

use std::collections::BTreeSet;
use std::fmt;

use super::erreurs::{NoyauError, Resultat};
use super::saisie::normaliser;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formule {
    Var(char),
    Not(Box<Formule>),
    And(Box<Formule>, Box<Formule>),
    Or(Box<Formule>, Box<Formule>),
    Imp(Box<Formule>, Box<Formule>),
    Iff(Box<Formule>, Box<Formule>),
}

impl Formule {
    pub fn var(c: char) -> Formule {
        Formule::Var(c)
    }

    pub fn not(x: Formule) -> Formule {
        Formule::Not(Box::new(x))
    }

    pub fn and(a: Formule, b: Formule) -> Formule {
        Formule::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Formule, b: Formule) -> Formule {
        Formule::Or(Box::new(a), Box::new(b))
    }

    pub fn imp(a: Formule, b: Formule) -> Formule {
        Formule::Imp(Box::new(a), Box::new(b))
    }

    pub fn iff(a: Formule, b: Formule) -> Formule {
        Formule::Iff(Box::new(a), Box::new(b))
    }

    /// Variables présentes, triées et dédoublonnées.
    pub fn variables(&self) -> Vec<char> {
        let mut acc = BTreeSet::new();
        self.collecte_variables(&mut acc);
        acc.into_iter().collect()
    }

    pub(crate) fn collecte_variables(&self, acc: &mut BTreeSet<char>) {
        use Formule::*;
        match self {
            Var(c) => {
                acc.insert(*c);
            }
            Not(x) => x.collecte_variables(acc),
            And(a, b) | Or(a, b) | Imp(a, b) | Iff(a, b) => {
                a.collecte_variables(acc);
                b.collecte_variables(acc);
            }
        }
    }

    fn precedence(&self) -> u8 {
        use Formule::*;
        match self {
            Iff(_, _) => 1,
            Imp(_, _) => 2,
            Or(_, _) => 3,
            And(_, _) => 4,
            Not(_) => 5,
            Var(_) => 6,
        }
    }
}

/* ------------------------ Lecture ------------------------ */

/// Lit une formule (après normalisation ASCII -> symboles).
pub fn parse_formula(text: &str) -> Resultat<Formule> {
    let normalise = normaliser(text);
    log::debug!("parse_formula({text:?}) -> {normalise:?}");

    let mut p = Lecteur::new(&normalise);
    let f = p.iff()?;
    p.saute_espaces();
    if let Some(c) = p.courant() {
        let mut msg = format!("reste non lu à la position {} : '{}'", p.pos, p.reste());
        if c == ')' {
            msg.push_str(" (parenthèse fermante sans ouvrante)");
        }
        return Err(NoyauError::syntaxe(msg));
    }
    Ok(f)
}

struct Lecteur {
    chars: Vec<char>,
    pos: usize,
}

impl Lecteur {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            pos: 0,
        }
    }

    fn saute_espaces(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn courant(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn reste(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    /// Consomme `c` (après espaces) si présent.
    fn accepte(&mut self, c: char) -> bool {
        self.saute_espaces();
        if self.courant() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn iff(&mut self) -> Resultat<Formule> {
        let mut gauche = self.imp()?;
        while self.accepte('⇔') || self.accepte('↔') {
            let droite = self.imp()?;
            gauche = Formule::iff(gauche, droite);
        }
        Ok(gauche)
    }

    fn imp(&mut self) -> Resultat<Formule> {
        let mut gauche = self.or()?;
        while self.accepte('⇒') || self.accepte('→') {
            let droite = self.or()?;
            gauche = Formule::imp(gauche, droite);
        }
        Ok(gauche)
    }

    fn or(&mut self) -> Resultat<Formule> {
        let mut gauche = self.and()?;
        while self.accepte('∨') {
            let droite = self.and()?;
            gauche = Formule::or(gauche, droite);
        }
        Ok(gauche)
    }

    fn and(&mut self) -> Resultat<Formule> {
        let mut gauche = self.not()?;
        while self.accepte('∧') {
            let droite = self.not()?;
            gauche = Formule::and(gauche, droite);
        }
        Ok(gauche)
    }

    fn not(&mut self) -> Resultat<Formule> {
        if self.accepte('¬') {
            let x = self.not()?;
            return Ok(Formule::not(x));
        }
        self.primary()
    }

    fn primary(&mut self) -> Resultat<Formule> {
        self.saute_espaces();
        let debut = self.pos;
        match self.courant() {
            None => Err(NoyauError::syntaxe(format!(
                "fin d’entrée prématurée à la position {debut} : opérande attendu"
            ))),
            Some('(') => {
                self.pos += 1;
                let f = self.iff()?;
                if !self.accepte(')') {
                    return Err(NoyauError::syntaxe(format!(
                        "parenthèse fermante manquante (ouverte à la position {debut})"
                    )));
                }
                Ok(f)
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.pos += 1;
                Ok(Formule::Var(c))
            }
            Some(c) => Err(NoyauError::syntaxe(format!(
                "symbole inconnu '{c}' à la position {debut}"
            ))),
        }
    }
}

/* ------------------------ Affichage canonique ------------------------ */

/// Forme canonique : parenthèses seulement là où le parent immédiat l’exige.
pub fn ast_to_string(f: &Formule) -> String {
    use Formule::*;

    match f {
        Var(c) => c.to_string(),
        Not(x) => {
            let sx = ast_to_string(x);
            if x.precedence() < f.precedence() {
                format!("¬({sx})")
            } else {
                format!("¬{sx}")
            }
        }
        And(a, b) => binaire(f, a, b, "∧"),
        Or(a, b) => binaire(f, a, b, "∨"),
        Imp(a, b) => binaire(f, a, b, "⇒"),
        Iff(a, b) => binaire(f, a, b, "⇔"),
    }
}

fn binaire(parent: &Formule, a: &Formule, b: &Formule, op: &str) -> String {
    let p = parent.precedence();

    // associativité gauche : même niveau à droite => parenthèses
    let sa = entoure_si(ast_to_string(a), a.precedence() < p);
    let sb = entoure_si(ast_to_string(b), b.precedence() <= p);
    format!("{sa} {op} {sb}")
}

fn entoure_si(s: String, cond: bool) -> String {
    if cond {
        format!("({s})")
    } else {
        s
    }
}

impl fmt::Display for Formule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ast_to_string(self))
    }
}
