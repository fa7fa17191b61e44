// src/noyau/reglages.rs
//
// Réglages partagés (aucun état global mutable) :
// - Difficulte : facile / moyen / difficile
// - constantes d’échantillonnage numérique

use std::fmt;
use std::str::FromStr;

use super::erreurs::NoyauError;

/// Nombre de points tirés pour comparer deux expressions.
pub const NB_ECHANTILLONS: usize = 6;

/// Tolérance relative d’égalité numérique.
pub const TOLERANCE: f64 = 1e-9;

/// Graine fixe des points d’échantillonnage (reproductible).
pub const GRAINE_ECHANTILLONS: u32 = 0x5EED_2024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Difficulte {
    #[default]
    Facile,
    Moyen,
    Difficile,
}

impl Difficulte {
    /// 1, 2, 3
    pub fn niveau(&self) -> i64 {
        match self {
            Difficulte::Facile => 1,
            Difficulte::Moyen => 2,
            Difficulte::Difficile => 3,
        }
    }
}

impl fmt::Display for Difficulte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulte::Facile => "facile",
            Difficulte::Moyen => "moyen",
            Difficulte::Difficile => "difficile",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Difficulte {
    type Err = NoyauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facile" | "easy" | "1" => Ok(Difficulte::Facile),
            "moyen" | "medium" | "2" => Ok(Difficulte::Moyen),
            "difficile" | "hard" | "3" => Ok(Difficulte::Difficile),
            autre => Err(NoyauError::syntaxe(format!("difficulté inconnue: '{autre}'"))),
        }
    }
}

/// Égalité numérique relative ; tout non-fini => faux.
pub fn presque_egaux(a: f64, b: f64) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}
