// src/noyau/expr.rs
//
// AST des expressions arithmétiques (réponses des tâches, identités trig).
// - Rat : rationnel exact
// - Pi, E : constantes
// - Var : variable (une lettre)
// - fonctions unaires sin cos tan sqrt abs ln exp
//
// Deux évaluations :
// - eval_exact() : rationnel exact si l’arbre ne contient ni variable, ni constante,
//   ni fonction irrationnelle (√ de carré parfait accepté) ; division par zéro => Domaine
// - eval() : f64, NaN/inf propagés (le garde is_finite est fait à la frontière)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Signed, ToPrimitive, Zero};

use super::erreurs::{NoyauError, Resultat};
use super::jetons::tokenize;
use super::rationnel::{borne, puissance, rational_to_string, vers_flottant, Rationnel};
use super::rpn::{from_rpn, to_rpn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(Rationnel),
    Pi,
    E,

    Var(String),

    Sqrt(Box<Expr>),
    Abs(Box<Expr>),
    Ln(Box<Expr>),
    Exp(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

/// Valeurs des variables pour l’évaluation flottante.
pub type Valeurs = BTreeMap<String, f64>;

/// Texte -> jetons -> RPN -> AST.
pub fn parse_expression(s: &str) -> Resultat<Expr> {
    let tokens = tokenize(s)?;
    if tokens.is_empty() {
        return Err(NoyauError::syntaxe("expression vide"));
    }
    let rpn = to_rpn(&tokens)?;
    let e = from_rpn(&rpn)?;
    log::trace!("parse_expression({s:?}) = {e}");
    Ok(e)
}

impl Expr {
    pub fn rat(r: Rationnel) -> Expr {
        Expr::Rat(r)
    }

    pub fn var(nom: &str) -> Expr {
        Expr::Var(nom.to_string())
    }

    /// Variables présentes (triées, sans doublon).
    pub fn variables(&self) -> Vec<String> {
        let mut acc = BTreeSet::new();
        self.collecte_variables(&mut acc);
        acc.into_iter().collect()
    }

    fn collecte_variables(&self, acc: &mut BTreeSet<String>) {
        use Expr::*;
        match self {
            Rat(_) | Pi | E => {}
            Var(v) => {
                acc.insert(v.clone());
            }
            Sqrt(x) | Abs(x) | Ln(x) | Exp(x) | Sin(x) | Cos(x) | Tan(x) => {
                x.collecte_variables(acc)
            }
            Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => {
                a.collecte_variables(acc);
                b.collecte_variables(acc);
            }
        }
    }

    /// Évaluation flottante. Variable absente => NaN.
    pub fn eval(&self, valeurs: &Valeurs) -> f64 {
        use Expr::*;
        match self {
            Rat(r) => vers_flottant(r),
            Pi => std::f64::consts::PI,
            E => std::f64::consts::E,
            Var(v) => valeurs.get(v).copied().unwrap_or(f64::NAN),

            Sqrt(x) => x.eval(valeurs).sqrt(),
            Abs(x) => x.eval(valeurs).abs(),
            Ln(x) => x.eval(valeurs).ln(),
            Exp(x) => x.eval(valeurs).exp(),
            Sin(x) => x.eval(valeurs).sin(),
            Cos(x) => x.eval(valeurs).cos(),
            Tan(x) => x.eval(valeurs).tan(),

            Add(a, b) => a.eval(valeurs) + b.eval(valeurs),
            Sub(a, b) => a.eval(valeurs) - b.eval(valeurs),
            Mul(a, b) => a.eval(valeurs) * b.eval(valeurs),
            Div(a, b) => a.eval(valeurs) / b.eval(valeurs),
            Pow(a, b) => puissance_flottante(a.eval(valeurs), b.eval(valeurs)),
        }
    }

    /// Évaluation exacte.
    /// Ok(None) : pas de valeur rationnelle exacte (variable, π, fonction…).
    /// Err(Domaine) : division par zéro, 0^négatif, racine d’un négatif.
    pub fn eval_exact(&self) -> Resultat<Option<Rationnel>> {
        use Expr::*;
        let r = match self {
            Rat(r) => Some(*r),
            Pi | E | Var(_) => None,

            Sqrt(x) => match x.eval_exact()? {
                Some(v) if v.is_negative() => {
                    return Err(NoyauError::domaine(format!(
                        "racine carrée d’un négatif ({})",
                        rational_to_string(&v)
                    )))
                }
                Some(v) => racine_exacte(&v),
                None => None,
            },
            Abs(x) => x.eval_exact()?.map(|v| v.abs()),
            Ln(_) | Exp(_) | Sin(_) | Cos(_) | Tan(_) => None,

            Add(a, b) => deux(a, b, |x, y| x.checked_add(&y))?,
            Sub(a, b) => deux(a, b, |x, y| x.checked_sub(&y))?,
            Mul(a, b) => deux(a, b, |x, y| x.checked_mul(&y))?,
            Div(a, b) => {
                let (x, y) = (a.eval_exact()?, b.eval_exact()?);
                if let Some(y) = y {
                    if y.is_zero() {
                        return Err(NoyauError::domaine("division par zéro"));
                    }
                }
                match (x, y) {
                    (Some(x), Some(y)) => x.checked_div(&y).and_then(borne),
                    _ => None,
                }
            }
            Pow(a, b) => {
                let (x, y) = (a.eval_exact()?, b.eval_exact()?);
                match (x, y) {
                    (Some(x), Some(y)) if y.is_integer() => {
                        if x.is_zero() && y.is_negative() {
                            return Err(NoyauError::domaine("0 élevé à une puissance négative"));
                        }
                        y.to_integer()
                            .to_i32()
                            .filter(|n| n.unsigned_abs() <= 64)
                            .and_then(|n| puissance(&x, n))
                    }
                    _ => None,
                }
            }
        };
        Ok(r)
    }

    /// Aucune variable.
    pub fn est_constante(&self) -> bool {
        self.variables().is_empty()
    }
}

fn deux(
    a: &Expr,
    b: &Expr,
    op: impl Fn(Rationnel, Rationnel) -> Option<Rationnel>,
) -> Resultat<Option<Rationnel>> {
    let (x, y) = (a.eval_exact()?, b.eval_exact()?);
    Ok(match (x, y) {
        (Some(x), Some(y)) => op(x, y).and_then(borne),
        _ => None,
    })
}

/// x^y réel : base négative acceptée seulement pour y entier.
fn puissance_flottante(x: f64, y: f64) -> f64 {
    if y.fract() == 0.0 && y.abs() <= i32::MAX as f64 {
        x.powi(y as i32)
    } else {
        x.powf(y)
    }
}

/* ------------------------ Outils rationnels ------------------------ */

fn racine_exacte(r: &Rationnel) -> Option<Rationnel> {
    let sn = racine_entiere_exacte(*r.numer())?;
    let sd = racine_entiere_exacte(*r.denom())?;
    Some(Rationnel::new(sn, sd))
}

fn racine_entiere_exacte(x: i64) -> Option<i64> {
    if x < 0 {
        return None;
    }
    let mut s = (x as f64).sqrt() as i64;
    // correction de l’arrondi flottant
    while s > 0 && s.checked_mul(s).map_or(true, |c| c > x) {
        s -= 1;
    }
    while (s + 1).checked_mul(s + 1).is_some_and(|c| c <= x) {
        s += 1;
    }
    if s * s == x {
        Some(s)
    } else {
        None
    }
}

/* ------------------------ Affichage ------------------------ */

fn priorite(e: &Expr) -> u8 {
    use Expr::*;
    match e {
        Add(_, _) | Sub(_, _) => 1,
        Mul(_, _) | Div(_, _) => 2,
        Pow(_, _) => 3,
        Rat(r) if r.is_negative() || !r.is_integer() => 2,
        _ => 4,
    }
}

fn est_negation(e: &Expr) -> Option<&Expr> {
    match e {
        Expr::Sub(a, b) if matches!(**a, Expr::Rat(z) if z.is_zero()) => Some(b),
        _ => None,
    }
}

fn ecrire_sous(f: &mut fmt::Formatter<'_>, e: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;

        if let Some(x) = est_negation(self) {
            write!(f, "-")?;
            return ecrire_sous(f, x, priorite(x) < 3);
        }

        match self {
            Rat(r) => write!(f, "{}", rational_to_string(r)),
            Pi => write!(f, "π"),
            E => write!(f, "e"),
            Var(s) => write!(f, "{s}"),
            Sqrt(x) => write!(f, "√({x})"),
            Abs(x) => write!(f, "abs({x})"),
            Ln(x) => write!(f, "ln({x})"),
            Exp(x) => write!(f, "exp({x})"),
            Sin(x) => write!(f, "sin({x})"),
            Cos(x) => write!(f, "cos({x})"),
            Tan(x) => write!(f, "tan({x})"),

            Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => {
                let (op, p) = match self {
                    Add(_, _) => (" + ", 1),
                    Sub(_, _) => (" - ", 1),
                    Mul(_, _) => ("*", 2),
                    Div(_, _) => ("/", 2),
                    _ => ("^", 3),
                };
                // ^ associatif à droite, les autres à gauche
                let (pg, pd) = if p == 3 {
                    (priorite(a) <= p, priorite(b) < p)
                } else if matches!(self, Div(_, _)) {
                    // "2^3/4" : après ^ le lecteur prendrait 3/4 pour une fraction littérale
                    (priorite(a) < 4, priorite(b) < 4)
                } else {
                    (priorite(a) < p, priorite(b) <= p && priorite(b) != 4)
                };
                let pg = pg || est_negation(a).is_some();
                let pd = pd || est_negation(b).is_some();
                ecrire_sous(f, a, pg)?;
                write!(f, "{op}")?;
                ecrire_sous(f, b, pd)
            }
        }
    }
}
