// src/noyau/alea.rs
//
// Générateur congruentiel linéaire (LCG) déterministe, état EXPLICITE.
//   état' = (1664525 · état + 1013904223) mod 2^32 ; graine 0 -> 1
//
// Chaque tirage rend (valeur, nouvel état) : rien n’est muté en cachette,
// l’appelant enfile l’état d’un tirage au suivant (ordre des tirages = contrat).

use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lcg {
    etat: u32,
}

impl Lcg {
    pub fn new(graine: u32) -> Lcg {
        Lcg {
            etat: if graine == 0 { 1 } else { graine },
        }
    }

    pub fn etat(&self) -> u32 {
        self.etat
    }

    /// Transition pure.
    pub fn suivant(self) -> (u32, Lcg) {
        let etat = self
            .etat
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        (etat, Lcg { etat })
    }

    /// Flottant dans [0, 1).
    pub fn flottant(self) -> (f64, Lcg) {
        let (v, suite) = self.suivant();
        (v as f64 / 4_294_967_296.0, suite)
    }

    /// Entier uniforme dans [lo, hi] (bornes incluses).
    pub fn entre(self, lo: i64, hi: i64) -> (i64, Lcg) {
        let (f, suite) = self.flottant();
        let etendue = (hi - lo + 1).max(1) as f64;
        (lo + (f * etendue).floor() as i64, suite)
    }

    /// Entier non nul dans [lo, hi] (un seul tirage, 0 remplacé par hi).
    pub fn entre_non_nul(self, lo: i64, hi: i64) -> (i64, Lcg) {
        let (v, suite) = self.entre(lo, hi);
        (if v == 0 { hi } else { v }, suite)
    }

    pub fn piece(self) -> (bool, Lcg) {
        let (f, suite) = self.flottant();
        (f < 0.5, suite)
    }

    /// Choix uniforme dans une tranche non vide.
    pub fn choisir<T>(self, options: &[T]) -> (&T, Lcg) {
        let (i, suite) = self.entre(0, options.len() as i64 - 1);
        (&options[i.clamp(0, options.len() as i64 - 1) as usize], suite)
    }

    /// Choix pondéré : indice tiré proportionnellement aux poids (somme > 0).
    pub fn choisir_pondere(self, poids: &[u32]) -> (usize, Lcg) {
        let total: u32 = poids.iter().sum();
        let (f, suite) = self.flottant();
        let mut cible = f * total as f64;
        for (i, &w) in poids.iter().enumerate() {
            if cible < w as f64 {
                return (i, suite);
            }
            cible -= w as f64;
        }
        (poids.len().saturating_sub(1), suite)
    }
}

/// Graine quand l’appelant n’en fournit pas (non reproductible).
pub fn graine_horloge() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}
