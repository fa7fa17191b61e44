// src/noyau/trig.rs
//
// Trig exacte sur angles spéciaux
// -------------------------------
// - Angle normalisé en demi-tours t ∈ [0,2) (t·π)
// - Spécial si t est multiple entier d’une fraction de {1/6, 1/4, 1/3, 1/2, 1}
//   (radians : test exact sur q ; degrés : tolérance relative 1e-9)
// - Valeur de référence (1/6, 1/4, 1/3) + signe par quadrant
//   (sin < 0 aux quadrants 2,3 ; cos < 0 aux quadrants 1,2)
// - Multiples de π/2 traités à part (0, ±1 exacts, sans arrondi)
// - Sinon : repli flottant -> ValeurExacte::Rationnel (approché, exact = false)

use super::angle::{normalize_angle, Angle};
use super::rationnel::{depuis_flottant, pgcd};
use super::valeur_exacte::{tan_from_exact, ValeurExacte};

const FRACTIONS_SPECIALES: [i64; 5] = [6, 4, 3, 2, 1];
const TOLERANCE_RELATIVE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

impl TrigFn {
    pub fn nom(&self) -> &'static str {
        match self {
            TrigFn::Sin => "sin",
            TrigFn::Cos => "cos",
            TrigFn::Tan => "tan",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrigExact {
    pub sin: ValeurExacte,
    pub cos: ValeurExacte,
    pub tan: ValeurExacte,
    /// false si repli approché (angle non spécial)
    pub exact: bool,
}

impl TrigExact {
    pub fn valeur(&self, f: TrigFn) -> &ValeurExacte {
        match f {
            TrigFn::Sin => &self.sin,
            TrigFn::Cos => &self.cos,
            TrigFn::Tan => &self.tan,
        }
    }
}

pub fn sin_cos_tan_exact(angle: Angle) -> TrigExact {
    match multiple_special(normalize_angle(angle)) {
        Some((k, n)) => {
            let (sin, cos) = sin_cos_special(k, n);
            let tan = tan_from_exact(&sin, &cos);
            TrigExact {
                sin,
                cos,
                tan,
                exact: true,
            }
        }
        None => {
            log::debug!("angle {angle} non spécial : repli approché");
            repli_approche(angle)
        }
    }
}

/// (k, n) réduit avec t = k/n, k ∈ [0, 2n), n ∈ {1,2,3,4,6}.
fn multiple_special(a: Angle) -> Option<(i64, i64)> {
    match a {
        Angle::Rad { p, q } => {
            if FRACTIONS_SPECIALES.contains(&q) {
                Some((p, q))
            } else {
                None
            }
        }
        Angle::Deg(v) => {
            let t = v / 180.0;
            FRACTIONS_SPECIALES.iter().find_map(|&n| {
                let ratio = t * n as f64;
                let k = ratio.round();
                if (ratio - k).abs() <= TOLERANCE_RELATIVE * ratio.abs().max(1.0) {
                    let k = (k as i64).rem_euclid(2 * n);
                    let g = pgcd(k, n).max(1);
                    Some((k / g, n / g))
                } else {
                    None
                }
            })
        }
    }
}

fn sin_cos_special(k: i64, n: i64) -> (ValeurExacte, ValeurExacte) {
    use ValeurExacte::*;

    // quadrant = floor(t / (1/2)) = floor(2k/n)
    let quadrant = (2 * k).div_euclid(n).rem_euclid(4);

    // multiples de π/2 : valeurs cardinales exactes
    if (2 * k) % n == 0 {
        return match quadrant {
            0 => (Zero, One { sign: 1 }),
            1 => (One { sign: 1 }, Zero),
            2 => (Zero, One { sign: -1 }),
            _ => (One { sign: -1 }, Zero),
        };
    }

    // angle de référence r = ref/(2n) dans (0, 1/2)
    let dans_quadrant = 2 * k - quadrant * n;
    let reference = if quadrant % 2 == 1 {
        n - dans_quadrant
    } else {
        dans_quadrant
    };

    let (sin_ref, cos_ref) = if reference * 3 == n {
        // π/6
        (
            Half { sign: 1 },
            Sqrt {
                n: 3,
                sign: 1,
                over_two: true,
            },
        )
    } else if reference * 2 == n {
        // π/4
        let r2 = Sqrt {
            n: 2,
            sign: 1,
            over_two: true,
        };
        (r2.clone(), r2)
    } else {
        // π/3
        (
            Sqrt {
                n: 3,
                sign: 1,
                over_two: true,
            },
            Half { sign: 1 },
        )
    };

    let sin = if quadrant >= 2 { sin_ref.neg() } else { sin_ref };
    let cos = if quadrant == 1 || quadrant == 2 {
        cos_ref.neg()
    } else {
        cos_ref
    };
    (sin, cos)
}

fn repli_approche(angle: Angle) -> TrigExact {
    let x = angle.en_radians();
    let approx = |v: f64| {
        depuis_flottant(v)
            .map(ValeurExacte::depuis_rationnel)
            .unwrap_or(ValeurExacte::Undef)
    };

    let (s, c) = (x.sin(), x.cos());
    let tan = if c.abs() < 1e-12 {
        ValeurExacte::Undef
    } else {
        approx(s / c)
    };

    TrigExact {
        sin: approx(s),
        cos: approx(c),
        tan,
        exact: false,
    }
}
