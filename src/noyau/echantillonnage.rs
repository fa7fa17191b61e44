// src/noyau/echantillonnage.rs
//
// Équivalence de deux expressions par échantillonnage numérique.
// - points rationnels pseudo-aléatoires (LCG à graine fixe => reproductible)
// - variables = union des variables des deux côtés
// - un point non fini (NaN, inf) d’un côté ou de l’autre => NON équivalent
// - deux constantes évaluables exactement sont comparées exactement

use super::alea::Lcg;
use super::expr::{Expr, Valeurs};
use super::reglages::{presque_egaux, GRAINE_ECHANTILLONS, NB_ECHANTILLONS};

/// Où tirer les points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DomaineEchantillons {
    /// réels (décalés pour éviter 0 et les valeurs « rondes »)
    #[default]
    Reels,
    /// réels > 0 (logarithmes, racines)
    Positifs,
}

/// Points d’échantillonnage pour une liste de variables.
pub fn points_echantillons(variables: &[String], domaine: DomaineEchantillons) -> Vec<Valeurs> {
    let mut g = Lcg::new(GRAINE_ECHANTILLONS);
    let mut points = Vec::with_capacity(NB_ECHANTILLONS);

    for _ in 0..NB_ECHANTILLONS {
        let mut v = Valeurs::new();
        for nom in variables {
            let (num, suite) = match domaine {
                DomaineEchantillons::Reels => g.entre(-12, 12),
                DomaineEchantillons::Positifs => g.entre(1, 24),
            };
            let (den, suite) = suite.entre(2, 7);
            g = suite;
            let x = num as f64 / den as f64;
            v.insert(
                nom.clone(),
                match domaine {
                    DomaineEchantillons::Reels => x + 0.1,
                    DomaineEchantillons::Positifs => x,
                },
            );
        }
        points.push(v);
    }
    points
}

pub fn equivalentes_par_echantillonnage(a: &Expr, b: &Expr, domaine: DomaineEchantillons) -> bool {
    // constantes exactes : comparaison exacte
    if let (Ok(Some(x)), Ok(Some(y))) = (a.eval_exact(), b.eval_exact()) {
        return x == y;
    }

    let mut variables = a.variables();
    variables.extend(b.variables());
    variables.sort();
    variables.dedup();

    let equivalentes = points_echantillons(&variables, domaine).iter().all(|p| {
        let (va, vb) = (a.eval(p), b.eval(p));
        let ok = presque_egaux(va, vb);
        if !ok {
            log::trace!("échantillon {p:?} : {va} ≠ {vb}");
        }
        ok
    });

    log::debug!("équivalence par échantillonnage {a} ≡ {b} : {equivalentes}");
    equivalentes
}
