// src/noyau/valeur_exacte.rs
//
// Valeurs trig exactes (énumération FERMÉE) :
//   0, ±1, ±1/2, ±√n, ±√n/2 (n ∈ {2,3}), ±√3/3, rationnel (repli approché), indéfini.
//
// Texte (aller-retour exact format_exact <-> parse_exact_value) :
//   "0" "1" "-1" "1/2" "-1/2" "sqrt(2)" "-sqrt(3)/2" "sqrt(3)/3" "undef" "n" "n/d"

use std::fmt;

use num_traits::{One, Signed, Zero};

use super::erreurs::{NoyauError, Resultat};
use super::rationnel::{parse_rational, rational_to_string, signe, vers_flottant, Rationnel};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValeurExacte {
    Zero,
    One { sign: i8 },
    Half { sign: i8 },
    Sqrt { n: u8, sign: i8, over_two: bool },
    /// ±√3/3 (= ±1/√3)
    SqrtTiers { sign: i8 },
    Rationnel(Rationnel),
    Undef,
}

impl ValeurExacte {
    /// Forme canonique d’un rationnel : 0, ±1, ±1/2 ont leur propre variante.
    pub fn depuis_rationnel(r: Rationnel) -> ValeurExacte {
        let demi = Rationnel::new(1, 2);
        if r.is_zero() {
            ValeurExacte::Zero
        } else if r.abs().is_one() {
            ValeurExacte::One { sign: signe(&r) }
        } else if r.abs() == demi {
            ValeurExacte::Half { sign: signe(&r) }
        } else {
            ValeurExacte::Rationnel(r)
        }
    }

    pub fn neg(&self) -> ValeurExacte {
        use ValeurExacte::*;
        match self {
            Zero => Zero,
            One { sign } => One { sign: -sign },
            Half { sign } => Half { sign: -sign },
            Sqrt { n, sign, over_two } => Sqrt {
                n: *n,
                sign: -sign,
                over_two: *over_two,
            },
            SqrtTiers { sign } => SqrtTiers { sign: -sign },
            Rationnel(r) => Rationnel(-r),
            Undef => Undef,
        }
    }

    /// Valeur approchée (NaN pour indéfini).
    pub fn approx(&self) -> f64 {
        use ValeurExacte::*;
        match self {
            Zero => 0.0,
            One { sign } => *sign as f64,
            Half { sign } => *sign as f64 * 0.5,
            Sqrt { n, sign, over_two } => {
                let v = (*n as f64).sqrt();
                *sign as f64 * if *over_two { v / 2.0 } else { v }
            }
            SqrtTiers { sign } => *sign as f64 * 3f64.sqrt() / 3.0,
            Rationnel(r) => vers_flottant(r),
            Undef => f64::NAN,
        }
    }

    pub fn est_indefini(&self) -> bool {
        matches!(self, ValeurExacte::Undef)
    }
}

/* ------------------------ Texte ------------------------ */

pub fn format_exact(v: &ValeurExacte) -> String {
    use ValeurExacte::*;

    let moins = |sign: i8| if sign < 0 { "-" } else { "" };
    match v {
        Zero => "0".to_string(),
        One { sign } => format!("{}1", moins(*sign)),
        Half { sign } => format!("{}1/2", moins(*sign)),
        Sqrt { n, sign, over_two } => {
            let base = format!("{}sqrt({n})", moins(*sign));
            if *over_two {
                format!("{base}/2")
            } else {
                base
            }
        }
        SqrtTiers { sign } => format!("{}sqrt(3)/3", moins(*sign)),
        Rationnel(r) => rational_to_string(r),
        Undef => "undef".to_string(),
    }
}

/// Lecture tolérante : espaces ignorés, "√" accepté pour "sqrt", "1/sqrt(n)" rationalisé.
pub fn parse_exact_value(text: &str) -> Resultat<ValeurExacte> {
    let s: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let s = remplace_radical(&s);

    if s.is_empty() {
        return Err(NoyauError::syntaxe("valeur vide"));
    }
    if matches!(s.as_str(), "undef" | "indéfini" | "indefini" | "undefined") {
        return Ok(ValeurExacte::Undef);
    }

    let (sign, corps) = match s.strip_prefix('-') {
        Some(reste) => (-1i8, reste),
        None => (1i8, s.strip_prefix('+').unwrap_or(&s)),
    };

    if corps.contains("sqrt") {
        return lire_racine(corps, sign);
    }

    let r = parse_rational(&s)?;
    Ok(ValeurExacte::depuis_rationnel(r))
}

/// "√3" -> "sqrt(3)" ; "√(3)" -> "sqrt(3)"
fn remplace_radical(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut it = s.chars().peekable();
    while let Some(c) = it.next() {
        if c != '√' {
            out.push(c);
            continue;
        }
        if it.peek() == Some(&'(') {
            out.push_str("sqrt");
            continue;
        }
        out.push_str("sqrt(");
        while let Some(d) = it.peek().copied().filter(|d| d.is_ascii_digit()) {
            out.push(d);
            it.next();
        }
        out.push(')');
    }
    out
}

fn lire_racine(corps: &str, sign: i8) -> Resultat<ValeurExacte> {
    let invalide = || NoyauError::syntaxe(format!("racine non reconnue: '{corps}'"));

    // 1/sqrt(n)
    if let Some(r) = corps.strip_prefix("1/") {
        return match r {
            "sqrt(2)" => Ok(ValeurExacte::Sqrt {
                n: 2,
                sign,
                over_two: true,
            }),
            "sqrt(3)" => Ok(ValeurExacte::SqrtTiers { sign }),
            _ => Err(invalide()),
        };
    }

    let reste = corps.strip_prefix("sqrt(").ok_or_else(invalide)?;
    let (n_txt, apres) = reste.split_once(')').ok_or_else(|| {
        NoyauError::syntaxe(format!("parenthèse fermante manquante dans '{corps}'"))
    })?;
    let n: u8 = n_txt.parse().map_err(|_| invalide())?;
    if n != 2 && n != 3 {
        return Err(NoyauError::syntaxe(format!(
            "seules sqrt(2) et sqrt(3) sont des valeurs exactes, pas sqrt({n_txt})"
        )));
    }

    match apres {
        "" => Ok(ValeurExacte::Sqrt {
            n,
            sign,
            over_two: false,
        }),
        "/2" => Ok(ValeurExacte::Sqrt {
            n,
            sign,
            over_two: true,
        }),
        "/3" if n == 3 => Ok(ValeurExacte::SqrtTiers { sign }),
        _ => Err(invalide()),
    }
}

/* ------------------------ tan depuis (sin, cos) ------------------------ */

/// Table de cas (pas une division). Toute combinaison hors table -> Undef.
pub fn tan_from_exact(sin: &ValeurExacte, cos: &ValeurExacte) -> ValeurExacte {
    use ValeurExacte::*;
    match (sin, cos) {
        (_, Zero) => Undef,
        (Zero, _) => Zero,
        (
            Sqrt {
                n: 2,
                sign: s1,
                over_two: true,
            },
            Sqrt {
                n: 2,
                sign: s2,
                over_two: true,
            },
        ) => One { sign: s1 * s2 },
        (
            Half { sign: s1 },
            Sqrt {
                n: 3,
                sign: s2,
                over_two: true,
            },
        ) => SqrtTiers { sign: s1 * s2 },
        (
            Sqrt {
                n: 3,
                sign: s1,
                over_two: true,
            },
            Half { sign: s2 },
        ) => Sqrt {
            n: 3,
            sign: s1 * s2,
            over_two: false,
        },
        _ => Undef,
    }
}

impl fmt::Display for ValeurExacte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_exact(self))
    }
}
