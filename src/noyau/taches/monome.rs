// src/noyau/taches/monome.rs
//
// Monômes : coefficient · produit de variables^exposant.
// Grammaire (réponses saisies) :
//   monome  := facteur ( ('*' | '·' | '/' | implicite) facteur )*
//   facteur := nombre | lettre [ '^' exposant ] | '(' monome ')' [ '^' exposant ]
//   exposant:= ['-'] entier | '(' ['-'] rationnel ')'
// La division donne des exposants négatifs : x^3/y^2 = x^3·y^-2.

use std::collections::BTreeMap;
use std::fmt;

use num_traits::{One, ToPrimitive, Zero};

use crate::noyau::erreurs::{NoyauError, Resultat};
use crate::noyau::rationnel::{
    depassement, parse_rational, produit, puissance, quotient, rational_to_string, somme, Rationnel,
};
use crate::noyau::saisie::normaliser;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monome {
    pub coefficient: Rationnel,
    /// exposants non nuls uniquement
    pub exposants: BTreeMap<char, Rationnel>,
}

impl Monome {
    pub fn constante(c: Rationnel) -> Monome {
        Monome {
            coefficient: c,
            exposants: BTreeMap::new(),
        }
    }

    /// c · Π v^e (exposants nuls retirés).
    pub fn depuis(c: Rationnel, exposants: impl IntoIterator<Item = (char, Rationnel)>) -> Monome {
        let mut exposants: BTreeMap<char, Rationnel> = exposants.into_iter().collect();
        exposants.retain(|_, e| !e.is_zero());
        Monome {
            coefficient: c,
            exposants,
        }
    }

    /// c · v^e
    pub fn terme(c: Rationnel, v: char, e: Rationnel) -> Monome {
        Monome::depuis(c, [(v, e)])
    }

    pub fn fois(&self, autre: &Monome) -> Resultat<Monome> {
        let mut exposants = self.exposants.clone();
        for (v, e) in &autre.exposants {
            let x = exposants.entry(*v).or_insert_with(Rationnel::zero);
            *x = somme(x, e)?;
        }
        let coefficient = produit(&self.coefficient, &autre.coefficient)?;
        Ok(Monome::depuis(coefficient, exposants))
    }

    pub fn inverse(&self) -> Resultat<Monome> {
        Ok(Monome {
            coefficient: quotient(&Rationnel::one(), &self.coefficient)?,
            exposants: self.exposants.iter().map(|(v, e)| (*v, -e)).collect(),
        })
    }

    /// Puissance rationnelle : le coefficient doit rester rationnel (exposant entier, ou coefficient 1).
    pub fn puissance(&self, e: &Rationnel) -> Resultat<Monome> {
        let coefficient = if self.coefficient.is_one() {
            Rationnel::one()
        } else if e.is_integer() {
            let n = e.to_integer().to_i32().ok_or_else(depassement)?;
            puissance(&self.coefficient, n).ok_or_else(|| {
                if self.coefficient.is_zero() {
                    NoyauError::domaine("0 élevé à une puissance négative")
                } else {
                    depassement()
                }
            })?
        } else {
            return Err(NoyauError::domaine(format!(
                "puissance {} non représentable par un monôme",
                rational_to_string(e)
            )));
        };
        let exposants = self
            .exposants
            .iter()
            .map(|(v, x)| -> Resultat<(char, Rationnel)> { Ok((*v, produit(x, e)?)) })
            .collect::<Resultat<Vec<_>>>()?;
        Ok(Monome::depuis(coefficient, exposants))
    }
}

impl fmt::Display for Monome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exposants.is_empty() {
            return write!(f, "{}", rational_to_string(&self.coefficient));
        }
        if self.coefficient == -Rationnel::one() {
            write!(f, "-")?;
        } else if !self.coefficient.is_one() {
            if self.coefficient.is_integer() {
                write!(f, "{}", self.coefficient)?;
            } else {
                write!(f, "({})", rational_to_string(&self.coefficient))?;
            }
        }
        for (v, e) in &self.exposants {
            write!(f, "{v}")?;
            if e.is_one() {
                continue;
            }
            if e.is_integer() {
                write!(f, "^{e}")?;
            } else {
                write!(f, "^({})", rational_to_string(e))?;
            }
        }
        Ok(())
    }
}

/* ------------------------ Lecture ------------------------ */

pub fn parse_monome(text: &str) -> Resultat<Monome> {
    let s: Vec<char> = normaliser(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '−' { '-' } else { c })
        .collect();
    let mut l = Lecteur { s: &s, i: 0 };
    let m = l.produit()?;
    if l.i < s.len() {
        return Err(NoyauError::syntaxe(format!(
            "reste non lu à la position {} : '{}'",
            l.i,
            s[l.i..].iter().collect::<String>()
        )));
    }
    Ok(m)
}

struct Lecteur<'a> {
    s: &'a [char],
    i: usize,
}

impl Lecteur<'_> {
    fn courant(&self) -> Option<char> {
        self.s.get(self.i).copied()
    }

    fn produit(&mut self) -> Resultat<Monome> {
        let mut signe = Rationnel::one();
        if self.courant() == Some('-') {
            signe = -signe;
            self.i += 1;
        } else if self.courant() == Some('+') {
            self.i += 1;
        }

        let mut m = Monome::constante(signe).fois(&self.facteur()?)?;
        loop {
            match self.courant() {
                Some('*') | Some('·') | Some('×') => {
                    self.i += 1;
                    m = m.fois(&self.facteur()?)?;
                }
                Some('/') | Some('÷') => {
                    self.i += 1;
                    let d = self.facteur()?;
                    m = m.fois(&d.inverse()?)?;
                }
                Some(c) if c.is_ascii_alphanumeric() || c == '(' => {
                    m = m.fois(&self.facteur()?)?;
                }
                _ => break,
            }
        }
        Ok(m)
    }

    fn facteur(&mut self) -> Resultat<Monome> {
        let base = match self.courant() {
            Some(c) if c.is_ascii_digit() => Monome::constante(self.nombre()?),
            Some(c) if c.is_ascii_alphabetic() => {
                self.i += 1;
                Monome::terme(Rationnel::one(), c, Rationnel::one())
            }
            Some('(') => {
                self.i += 1;
                let m = self.produit()?;
                if self.courant() != Some(')') {
                    return Err(NoyauError::syntaxe("parenthèse fermante manquante"));
                }
                self.i += 1;
                m
            }
            Some(c) => {
                return Err(NoyauError::syntaxe(format!(
                    "symbole inattendu '{c}' à la position {}",
                    self.i
                )))
            }
            None => return Err(NoyauError::syntaxe("fin d’entrée prématurée")),
        };

        if self.courant() != Some('^') {
            return Ok(base);
        }
        self.i += 1;
        let e = self.exposant()?;
        base.puissance(&e)
    }

    fn nombre(&mut self) -> Resultat<Rationnel> {
        let debut = self.i;
        while self
            .courant()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.i += 1;
        }
        let txt: String = self.s[debut..self.i].iter().collect();
        lire_decimal(&txt)
    }

    fn exposant(&mut self) -> Resultat<Rationnel> {
        if self.courant() == Some('(') {
            self.i += 1;
            let debut = self.i;
            while self.courant().is_some_and(|c| c != ')') {
                self.i += 1;
            }
            if self.courant() != Some(')') {
                return Err(NoyauError::syntaxe("parenthèse fermante manquante dans l’exposant"));
            }
            let txt: String = self.s[debut..self.i].iter().collect();
            self.i += 1;
            return parse_rational(&txt);
        }

        let debut = self.i;
        if self.courant() == Some('-') {
            self.i += 1;
        }
        while self.courant().is_some_and(|c| c.is_ascii_digit()) {
            self.i += 1;
        }
        let txt: String = self.s[debut..self.i].iter().collect();
        if txt.is_empty() || txt == "-" {
            return Err(NoyauError::syntaxe(format!(
                "exposant attendu à la position {debut}"
            )));
        }
        parse_rational(&txt)
    }
}

/// "12", "0.25" (exact).
pub(crate) fn lire_decimal(txt: &str) -> Resultat<Rationnel> {
    let (ent, frac) = txt.split_once('.').unwrap_or((txt, ""));
    if (ent.is_empty() && frac.is_empty()) || frac.contains('.') || ent.len() + frac.len() > 17 {
        return Err(NoyauError::syntaxe(format!("nombre invalide: '{txt}'")));
    }
    let echelle = 10i64.pow(frac.len() as u32);
    let n: i64 = format!("{ent}{frac}")
        .parse()
        .map_err(|_| NoyauError::syntaxe(format!("nombre invalide: '{txt}'")))?;
    Ok(Rationnel::new(n, echelle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Signed;
    use crate::noyau::rationnel::{entier, rationnel};

    fn m(s: &str) -> Monome {
        parse_monome(s).unwrap_or_else(|e| panic!("parse_monome({s:?}) erreur: {e}"))
    }

    #[test]
    fn produits_et_puissances() {
        let attendu = Monome::terme(entier(6), 'x', entier(5));
        assert_eq!(m("6x^5"), attendu);
        assert_eq!(m("2x^2 * 3x^3"), attendu);
        assert_eq!(m("3·x^2·2·x^3"), attendu);
        assert_eq!(m("(x^2)^3"), Monome::terme(entier(1), 'x', entier(6)));
        assert_eq!(m("(2x^2)^3"), Monome::terme(entier(8), 'x', entier(6)));
    }

    #[test]
    fn division_et_exposants_negatifs() {
        let a = m("x^3/y^2");
        assert_eq!(a.exposants[&'x'], entier(3));
        assert_eq!(a.exposants[&'y'], entier(-2));
        assert_eq!(a, m("x^3 y^-2"));
        assert!(a.exposants.values().any(|e| e.is_negative()));
        assert_eq!(m("x^5/x^5"), Monome::constante(entier(1)));
    }

    #[test]
    fn exposants_rationnels() {
        let a = m("x^(2/3)");
        assert_eq!(a.exposants[&'x'], rationnel(2, 3).unwrap());
        assert_eq!(m("-x^(-1/2)").coefficient, entier(-1));
        assert_eq!(m("0.5x"), Monome::terme(rationnel(1, 2).unwrap(), 'x', entier(1)));
    }

    #[test]
    fn affichage() {
        assert_eq!(m("6x^5y^-2").to_string(), "6x^5y^-2");
        assert_eq!(m("-x").to_string(), "-x");
        assert_eq!(m("x^(1/2)").to_string(), "x^(1/2)");
        assert_eq!(m("1/2 x").to_string(), "(1/2)x");
        // relecture
        for s in ["6x^5y^-2", "-x", "x^(1/2)", "(1/2)x", "7"] {
            assert_eq!(m(&m(s).to_string()), m(s), "{s:?}");
        }
    }

    #[test]
    fn erreurs() {
        assert!(matches!(parse_monome("x^"), Err(NoyauError::Syntaxe(_))));
        assert!(matches!(parse_monome("(x"), Err(NoyauError::Syntaxe(_))));
        assert!(matches!(parse_monome("x/0"), Err(NoyauError::Domaine(_))));
        assert!(matches!(parse_monome("x + 1"), Err(NoyauError::Syntaxe(_))));
        assert!(matches!(parse_monome(""), Err(NoyauError::Syntaxe(_))));
        assert!(matches!(parse_monome("(2x)^(1/2)"), Err(NoyauError::Domaine(_))));
    }

    #[test]
    fn grands_coefficients_en_domaine() {
        for s in [
            "99999999999x * 99999999999",
            "99999999999x^7 / (1/99999999999)",
            "(99999999999x)^2",
            "x^(1/99999999999) * x^(1/99999999998)",
            "(x^99999999999)^99999999999",
            "x^(-9223372036854775808)",
        ] {
            assert!(matches!(parse_monome(s), Err(NoyauError::Domaine(_))), "{s:?}");
        }
        assert_eq!(m("(-x)^2147483647"), Monome::terme(entier(-1), 'x', entier(2147483647)));
    }
}
