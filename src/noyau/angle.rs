// src/noyau/angle.rs
//
// Angles symboliques
// ------------------
// - Deg(x)        : degrés (réel, égalité à 1e-9 près)
// - Rad { p, q }  : (p/q)·π, toujours exact, jamais de radians flottants
//
// Normalisation : degrés dans [0,360) ; radians réduits (q > 0, pgcd = 1) et p/q dans [0,2).
// Arithmétique entière contrôlée : une saisie trop grande est une erreur, jamais une panique.

use std::fmt;

use super::erreurs::{NoyauError, Resultat};
use super::rationnel::{depassement, pgcd};

pub const TOLERANCE_DEGRES: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Angle {
    Deg(f64),
    Rad { p: i64, q: i64 },
}

impl Angle {
    /// Multiple de π (demi-tours), en flottant.
    pub fn en_demi_tours(&self) -> f64 {
        match *self {
            Angle::Deg(v) => v / 180.0,
            Angle::Rad { p, q } => p as f64 / q as f64,
        }
    }

    pub fn en_radians(&self) -> f64 {
        self.en_demi_tours() * std::f64::consts::PI
    }

    pub fn en_degres(&self) -> f64 {
        self.en_demi_tours() * 180.0
    }
}

/* ------------------------ Lecture ------------------------ */

/// Accepte "30°", "30 deg", "π/6", "3π/4", "-π", "pi/3", "2*π/3", "1/6" et un réel nu (multiple de π).
pub fn parse_angle(text: &str) -> Resultat<Angle> {
    let s: String = text
        .trim()
        .replace("pi", "π")
        .replace("PI", "π")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '*')
        .collect();

    if s.is_empty() {
        return Err(NoyauError::syntaxe("angle vide"));
    }

    // degrés
    if let Some(corps) = s.strip_suffix('°').or_else(|| s.strip_suffix("deg")) {
        let v: f64 = corps
            .parse()
            .map_err(|_| NoyauError::syntaxe(format!("degrés invalides: '{corps}'")))?;
        if !v.is_finite() {
            return Err(NoyauError::syntaxe(format!("degrés invalides: '{corps}'")));
        }
        return Ok(Angle::Deg(v));
    }

    // kπ/n
    if let Some((avant, apres)) = s.split_once('π') {
        let k: i64 = match avant {
            "" | "+" => 1,
            "-" => -1,
            txt => txt
                .parse()
                .map_err(|_| NoyauError::syntaxe(format!("coefficient de π invalide: '{txt}'")))?,
        };
        let n: i64 = match apres {
            "" => 1,
            txt => {
                let d = txt.strip_prefix('/').ok_or_else(|| {
                    NoyauError::syntaxe(format!("'/' attendu après π, trouvé '{txt}'"))
                })?;
                d.parse()
                    .map_err(|_| NoyauError::syntaxe(format!("dénominateur invalide: '{d}'")))?
            }
        };
        return rad(k, n);
    }

    // p/q nu
    if let Some((a, b)) = s.split_once('/') {
        let p: i64 = a
            .parse()
            .map_err(|_| NoyauError::syntaxe(format!("numérateur invalide: '{a}'")))?;
        let q: i64 = b
            .parse()
            .map_err(|_| NoyauError::syntaxe(format!("dénominateur invalide: '{b}'")))?;
        return rad(p, q);
    }

    // réel nu : multiple de π, dénominateur 1 (décimales lues exactement)
    let (p, q) = decimal_exact(&s)?;
    rad(p, q)
}

fn rad(p: i64, q: i64) -> Resultat<Angle> {
    if q == 0 {
        return Err(NoyauError::domaine("dénominateur nul dans un angle"));
    }
    if p == i64::MIN || q == i64::MIN {
        return Err(depassement());
    }
    let g = pgcd(p, q).max(1);
    let (p, q) = (p / g, q / g);
    Ok(if q < 0 {
        Angle::Rad { p: -p, q: -q }
    } else {
        Angle::Rad { p, q }
    })
}

/// "1.25" -> (5, 4) ; "3" -> (3, 1).
fn decimal_exact(s: &str) -> Resultat<(i64, i64)> {
    let invalide = || NoyauError::syntaxe(format!("angle non reconnu: '{s}'"));

    let (entier, frac) = s.split_once('.').unwrap_or((s, ""));
    if frac.len() > 9 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalide());
    }
    let q = 10i64.pow(frac.len() as u32);
    let negatif = entier.starts_with('-');
    let e: i64 = match entier {
        "" | "-" | "+" => 0,
        txt => txt.parse().map_err(|_| invalide())?,
    };
    let f: i64 = if frac.is_empty() {
        0
    } else {
        frac.parse().map_err(|_| invalide())?
    };
    if entier.is_empty() && frac.is_empty() {
        return Err(invalide());
    }
    let p = e
        .checked_mul(q)
        .and_then(|x| x.checked_add(if negatif { -f } else { f }))
        .ok_or_else(depassement)?;
    Ok((p, q))
}

/* ------------------------ Normalisation ------------------------ */

pub fn normalize_angle(a: Angle) -> Angle {
    match a {
        Angle::Deg(v) => {
            let r = v.rem_euclid(360.0);
            // rem_euclid peut rendre 360.0 par arrondi (ex: -1e-17)
            Angle::Deg(if r >= 360.0 { 0.0 } else { r })
        }
        Angle::Rad { q: 0, .. } => a,
        Angle::Rad { p, q } => {
            // en i128 : 2q et -p ne débordent pas
            let (p, q) = (p as i128, q as i128);
            let (p, q) = if q < 0 { (-p, -q) } else { (p, q) };
            let p = p.rem_euclid(2 * q);
            let g = pgcd_large(p, q).max(1);
            match (i64::try_from(p / g), i64::try_from(q / g)) {
                (Ok(p), Ok(q)) => Angle::Rad { p, q },
                // q > 2^62 seulement : repli en degrés (approché)
                _ => Angle::Deg((p as f64 / q as f64) * 180.0),
            }
        }
    }
}

fn pgcd_large(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

/// Égalité d’angles (après normalisation) : exacte en radians, à 1e-9 près en degrés.
pub fn angles_equal(a: Angle, b: Angle) -> bool {
    match (normalize_angle(a), normalize_angle(b)) {
        (Angle::Rad { p: p1, q: q1 }, Angle::Rad { p: p2, q: q2 }) => {
            p1 as i128 * q2 as i128 == p2 as i128 * q1 as i128
        }
        (x, y) => {
            let d = (x.en_degres() - y.en_degres()).abs();
            d < TOLERANCE_DEGRES || (360.0 - d).abs() < TOLERANCE_DEGRES
        }
    }
}

/* ------------------------ Affichage ------------------------ */

pub fn angle_to_string(a: &Angle) -> String {
    match *a {
        Angle::Deg(v) => format!("{}°", format_reel(v)),
        Angle::Rad { p, q } => format_angle_kn_pi(p, q),
    }
}

/// 0, π, -π, 2π, π/6, -π/2, 3π/4
pub fn format_angle_kn_pi(k: i64, n: i64) -> String {
    if k == 0 {
        return "0".to_string();
    }
    let num = match k {
        1 => "π".to_string(),
        -1 => "-π".to_string(),
        _ => format!("{k}π"),
    };
    if n == 1 {
        num
    } else {
        format!("{num}/{n}")
    }
}

/// Réel sans décimales inutiles (30 -> "30", 22.5 -> "22.5").
pub fn format_reel(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.9}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", angle_to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(s: &str) -> Angle {
        parse_angle(s).unwrap_or_else(|e| panic!("parse_angle({s:?}) erreur: {e}"))
    }

    #[test]
    fn lecture_radians() {
        assert_eq!(a("π/6"), Angle::Rad { p: 1, q: 6 });
        assert_eq!(a("3π/4"), Angle::Rad { p: 3, q: 4 });
        assert_eq!(a("π"), Angle::Rad { p: 1, q: 1 });
        assert_eq!(a("-π/2"), Angle::Rad { p: -1, q: 2 });
        assert_eq!(a("2*pi/3"), Angle::Rad { p: 2, q: 3 });
        assert_eq!(a("2π/4"), Angle::Rad { p: 1, q: 2 });
    }

    #[test]
    fn lecture_degres_et_reels() {
        assert_eq!(a("30°"), Angle::Deg(30.0));
        assert_eq!(a(" 22.5 deg"), Angle::Deg(22.5));
        assert_eq!(a("2"), Angle::Rad { p: 2, q: 1 });
        assert_eq!(a("0.25"), Angle::Rad { p: 1, q: 4 });
        assert_eq!(a("-1.5"), Angle::Rad { p: -3, q: 2 });
        assert_eq!(a("1/6"), Angle::Rad { p: 1, q: 6 });
    }

    #[test]
    fn lecture_erreurs() {
        assert!(matches!(parse_angle(""), Err(NoyauError::Syntaxe(_))));
        assert!(matches!(parse_angle("abc"), Err(NoyauError::Syntaxe(_))));
        assert!(matches!(parse_angle("π/0"), Err(NoyauError::Domaine(_))));
        assert!(matches!(parse_angle("xπ"), Err(NoyauError::Syntaxe(_))));
    }

    #[test]
    fn grandes_mesures_sans_panique() {
        assert!(matches!(parse_angle("1000000000000000000.5"), Err(NoyauError::Domaine(_))));
        assert!(matches!(parse_angle("-9223372036854775808π"), Err(NoyauError::Domaine(_))));
        assert!(matches!(parse_angle("π/-9223372036854775808"), Err(NoyauError::Domaine(_))));
        assert!(parse_angle("99999999999999999999π").is_err());

        let fin = a("π/5000000000000000000");
        assert_eq!(normalize_angle(fin), Angle::Rad { p: 1, q: 5_000_000_000_000_000_000 });
        let grand = a("-9223372036854775807π/9223372036854775806");
        assert!(matches!(normalize_angle(grand), Angle::Rad { .. }));
        assert_eq!(
            normalize_angle(Angle::Rad { p: 1, q: i64::MAX }),
            Angle::Rad { p: 1, q: i64::MAX }
        );
        assert!(angles_equal(a("π/3000000000000000000"), a("-5999999999999999999π/3000000000000000000")));
    }

    #[test]
    fn normalisation() {
        assert_eq!(normalize_angle(Angle::Deg(-30.0)), Angle::Deg(330.0));
        assert_eq!(normalize_angle(Angle::Deg(720.0)), Angle::Deg(0.0));
        assert_eq!(normalize_angle(Angle::Rad { p: -1, q: 2 }), Angle::Rad { p: 3, q: 2 });
        assert_eq!(normalize_angle(Angle::Rad { p: 9, q: 4 }), Angle::Rad { p: 1, q: 4 });
        assert_eq!(normalize_angle(Angle::Rad { p: 4, q: -2 }), Angle::Rad { p: 0, q: 1 });
    }

    #[test]
    fn egalites() {
        assert!(angles_equal(a("π/6"), a("13π/6")));
        assert!(angles_equal(a("π/6"), a("30°")));
        assert!(angles_equal(a("-30°"), a("330°")));
        assert!(!angles_equal(a("π/6"), a("π/3")));
        assert!(angles_equal(a("0°"), a("360°")));
    }

    #[test]
    fn affichage() {
        assert_eq!(angle_to_string(&a("π/6")), "π/6");
        assert_eq!(angle_to_string(&a("-π")), "-π");
        assert_eq!(angle_to_string(&a("3π/2")), "3π/2");
        assert_eq!(angle_to_string(&Angle::Deg(22.5)), "22.5°");
        assert_eq!(angle_to_string(&Angle::Deg(330.0)), "330°");
    }
}
