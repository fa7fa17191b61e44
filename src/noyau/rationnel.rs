// src/noyau/rationnel.rs
//
// Rationnels exacts (i64) partagés par la trig et les tâches.
// - normalisation PGCD, dénominateur > 0, zéro = 0/1
// - dénominateur nul => NoyauError::Domaine (jamais de panique)
// - opérations contrôlées : dépassement i64 => NoyauError::Domaine ; i64::MIN jamais produit
// - texte : "n" ou "n/d" (aller-retour exact)

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, One, Signed, Zero};

use super::erreurs::{NoyauError, Resultat};

pub type Rationnel = Rational64;

/// Construit n/d normalisé.
pub fn rationnel(n: i64, d: i64) -> Resultat<Rationnel> {
    if d == 0 {
        return Err(NoyauError::domaine(format!(
            "dénominateur nul dans {n}/{d}"
        )));
    }
    if n == i64::MIN || d == i64::MIN {
        return Err(depassement());
    }
    // Ratio::new réduit déjà et remet le signe au numérateur.
    Ok(Rationnel::new(n, d))
}

pub fn entier(n: i64) -> Rationnel {
    Rationnel::from_integer(n)
}

/// "n" si entier, "n/d" sinon.
pub fn rational_to_string(r: &Rationnel) -> String {
    if r.denom().is_one() {
        format!("{}", r.numer())
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}

/// Lecture stricte "n", "-n", "n/d", "-n/d" (espaces tolérés autour).
pub fn parse_rational(s: &str) -> Resultat<Rationnel> {
    let t = s.trim();
    if t.is_empty() {
        return Err(NoyauError::syntaxe("rationnel vide"));
    }

    let (num_txt, den_txt) = match t.split_once('/') {
        Some((a, b)) => (a.trim(), Some(b.trim())),
        None => (t, None),
    };

    let n: i64 = num_txt
        .parse()
        .map_err(|_| NoyauError::syntaxe(format!("numérateur invalide: '{num_txt}'")))?;

    let d: i64 = match den_txt {
        Some(b) => b
            .parse()
            .map_err(|_| NoyauError::syntaxe(format!("dénominateur invalide: '{b}'")))?,
        None => 1,
    };

    rationnel(n, d)
}

/// Conversion approchée (repli flottant → rationnel).
/// None si non fini ou hors bornes i64.
pub fn depuis_flottant(x: f64) -> Option<Rationnel> {
    if !x.is_finite() {
        return None;
    }
    Rationnel::approximate_float(x)
}

pub fn vers_flottant(r: &Rationnel) -> f64 {
    *r.numer() as f64 / *r.denom() as f64
}

/// PGCD (valeur absolue), pgcd(0,0) = 0.
pub fn pgcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

/* ------------------------ Opérations contrôlées ------------------------ */

pub fn depassement() -> NoyauError {
    NoyauError::domaine("nombre trop grand (dépassement des entiers 64 bits)")
}

/// Écarte i64::MIN : négation et valeur absolue restent sûres ensuite.
pub(crate) fn borne(r: Rationnel) -> Option<Rationnel> {
    (*r.numer() != i64::MIN).then_some(r)
}

pub fn somme(a: &Rationnel, b: &Rationnel) -> Resultat<Rationnel> {
    a.checked_add(b).and_then(borne).ok_or_else(depassement)
}

pub fn produit(a: &Rationnel, b: &Rationnel) -> Resultat<Rationnel> {
    a.checked_mul(b).and_then(borne).ok_or_else(depassement)
}

pub fn quotient(a: &Rationnel, b: &Rationnel) -> Resultat<Rationnel> {
    if b.is_zero() {
        return Err(NoyauError::domaine("division par zéro"));
    }
    a.checked_div(b).and_then(borne).ok_or_else(depassement)
}

/// Puissance entière signée, None si 0^négatif ou dépassement.
pub fn puissance(base: &Rationnel, exp: i32) -> Option<Rationnel> {
    let base = &borne(*base)?;
    if base.is_zero() {
        return match exp {
            0 => Some(Rationnel::one()),
            e if e < 0 => None,
            _ => Some(Rationnel::zero()),
        };
    }
    let b = if exp < 0 {
        quotient(&Rationnel::one(), base).ok()?
    } else {
        *base
    };
    // ±1 : pas de boucle sur de grands exposants
    if b.abs().is_one() {
        return Some(if exp % 2 == 0 { Rationnel::one() } else { b });
    }
    let mut acc = Rationnel::one();
    for _ in 0..exp.unsigned_abs() {
        acc = produit(&acc, &b).ok()?;
    }
    Some(acc)
}

/// Signe sous forme i8 (-1, 0, 1).
pub fn signe(r: &Rationnel) -> i8 {
    if r.is_zero() {
        0
    } else if r.is_negative() {
        -1
    } else {
        1
    }
}
