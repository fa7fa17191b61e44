// src/noyau/taches/polynome.rs
//
// Polynômes en x : somme de termes signés  c·x^n  (n entier ≥ 0).
// Les coefficients sont rangés par degré : coeffs[k] = coefficient de x^k.
// Les termes de même degré s’additionnent ("x + x" = "2x").

use std::fmt;

use num_traits::{One, Signed, Zero};

use super::monome::lire_decimal;
use crate::noyau::erreurs::{NoyauError, Resultat};
use crate::noyau::rationnel::{parse_rational, produit, quotient, rational_to_string, somme, Rationnel};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynome {
    coeffs: Vec<Rationnel>,
}

impl Polynome {
    pub fn new(mut coeffs: Vec<Rationnel>) -> Polynome {
        while coeffs.last().is_some_and(|c| c.is_zero()) {
            coeffs.pop();
        }
        Polynome { coeffs }
    }

    pub fn coefficient(&self, degre: usize) -> Rationnel {
        self.coeffs.get(degre).copied().unwrap_or_else(Rationnel::zero)
    }

    /// None pour le polynôme nul.
    pub fn degre(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }
}

impl fmt::Display for Polynome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeffs.is_empty() {
            return write!(f, "0");
        }
        let mut premier = true;
        for (k, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let signe = if c.is_negative() { "-" } else { "+" };
            if premier {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {signe} ")?;
            }
            premier = false;

            let a = c.abs();
            let coef = if a.is_integer() {
                a.to_string()
            } else {
                format!("({})", rational_to_string(&a))
            };
            match k {
                0 => write!(f, "{}", rational_to_string(&a))?,
                1 if a.is_one() => write!(f, "x")?,
                1 => write!(f, "{coef}x")?,
                _ if a.is_one() => write!(f, "x^{k}")?,
                _ => write!(f, "{coef}x^{k}")?,
            }
        }
        Ok(())
    }
}

pub fn parse_polynome(text: &str) -> Resultat<Polynome> {
    let s: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '*' && *c != '·')
        .map(|c| match c {
            '−' => '-',
            'X' => 'x',
            c => c,
        })
        .collect();
    if s.is_empty() {
        return Err(NoyauError::syntaxe("polynôme vide"));
    }

    let mut coeffs: Vec<Rationnel> = Vec::new();
    let mut i = 0;
    while i < s.len() {
        let mut negatif = false;
        match s[i] {
            '+' => i += 1,
            '-' => {
                negatif = true;
                i += 1;
            }
            _ if i > 0 => {
                return Err(NoyauError::syntaxe(format!(
                    "'+' ou '-' attendu à la position {i}"
                )))
            }
            _ => {}
        }
        let (c, k, suite) = lire_terme(&s, i)?;
        i = suite;
        if coeffs.len() <= k {
            coeffs.resize(k + 1, Rationnel::zero());
        }
        coeffs[k] = somme(&coeffs[k], &if negatif { -c } else { c })?;
    }

    Ok(Polynome::new(coeffs))
}

/// Un terme sans signe : [coef] [x [^n | ² | ³]] ; coef = décimal, a/b ou (a/b).
fn lire_terme(s: &[char], mut i: usize) -> Resultat<(Rationnel, usize, usize)> {
    if s.get(i) == Some(&'(') {
        let fin = s[i..]
            .iter()
            .position(|&c| c == ')')
            .map(|k| i + k)
            .ok_or_else(|| NoyauError::syntaxe("parenthèse fermante manquante"))?;
        let coef = parse_rational(&s[i + 1..fin].iter().collect::<String>())?;
        let (reste, degre, suite) = lire_terme(s, fin + 1)
            .or_else(|_| Ok::<_, NoyauError>((Rationnel::one(), 0, fin + 1)))?;
        return Ok((produit(&coef, &reste)?, degre, suite));
    }

    let debut = i;
    while i < s.len() && (s[i].is_ascii_digit() || s[i] == '.') {
        i += 1;
    }
    let mut coef = if i > debut {
        lire_decimal(&s[debut..i].iter().collect::<String>())?
    } else {
        Rationnel::one()
    };

    if i > debut && i < s.len() && s[i] == '/' {
        let d0 = i + 1;
        let mut j = d0;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j == d0 {
            return Err(NoyauError::syntaxe(format!("dénominateur attendu à la position {d0}")));
        }
        let d = lire_decimal(&s[d0..j].iter().collect::<String>())?;
        if d.is_zero() {
            return Err(NoyauError::domaine("division par zéro dans un coefficient"));
        }
        coef = quotient(&coef, &d)?;
        i = j;
    }

    if i >= s.len() || s[i] != 'x' {
        if i == debut {
            return Err(match s.get(i) {
                Some(c) => NoyauError::syntaxe(format!("symbole inattendu '{c}' à la position {i}")),
                None => NoyauError::syntaxe("fin d’entrée prématurée"),
            });
        }
        return Ok((coef, 0, i));
    }
    i += 1;

    let degre = match s.get(i) {
        Some('^') => {
            let e0 = i + 1;
            let mut j = e0;
            while j < s.len() && s[j].is_ascii_digit() {
                j += 1;
            }
            let txt: String = s[e0..j].iter().collect();
            let n: usize = txt
                .parse()
                .map_err(|_| NoyauError::syntaxe(format!("exposant entier attendu à la position {e0}")))?;
            i = j;
            n
        }
        Some('²') => {
            i += 1;
            2
        }
        Some('³') => {
            i += 1;
            3
        }
        _ => 1,
    };
    if degre > 64 {
        return Err(NoyauError::syntaxe(format!("degré {degre} trop grand")));
    }
    Ok((coef, degre, i))
}
