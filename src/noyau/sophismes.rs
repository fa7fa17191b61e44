// src/noyau/sophismes.rs
//
// Sophismes trigonométriques : « cette égalité est-elle toujours vraie, parfois vraie, ou fausse ? »
// ----------------------------------------------------------------------------------------------
// Banque FIXE de règles. Sélection déterministe (graine, difficulté) :
//   1. règle   : tirage pondéré (Parfois : poids 1/2/3 selon difficulté, les autres 1)
//   2. angle a : multiple de 15° dans [15°, 345°]
//   3. angle b : idem (toujours tiré, même si la règle n’a qu’une variable)
//   4. ordre des options : une des 6 permutations de (Toujours, Parfois, Faux)
// L’ordre des tirages ne dépend JAMAIS de la règle choisie => même graine, même sortie.

use std::fmt;
use std::str::FromStr;

use super::alea::Lcg;
use super::erreurs::{NoyauError, Resultat};
use super::reglages::{presque_egaux, Difficulte};
use super::taches::CheckResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Toujours,
    Parfois,
    Faux,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Toujours => "toujours vraie",
            Verdict::Parfois => "parfois vraie",
            Verdict::Faux => "fausse",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Verdict {
    type Err = NoyauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toujours" | "toujours vraie" | "always" | "t" => Ok(Verdict::Toujours),
            "parfois" | "parfois vraie" | "sometimes" | "p" => Ok(Verdict::Parfois),
            "faux" | "fausse" | "jamais" | "false" | "never" | "f" => Ok(Verdict::Faux),
            autre => Err(NoyauError::syntaxe(format!("verdict inconnu: '{autre}'"))),
        }
    }
}

type Membre = fn(f64, f64) -> f64;

struct Regle {
    id: &'static str,
    gauche: &'static str,
    droite: &'static str,
    verdict: Verdict,
    condition: Option<&'static str>,
    /// a et b, sinon x seul
    deux_angles: bool,
    explication: &'static str,
    eval_g: Membre,
    eval_d: Membre,
}

fn carre(v: f64) -> f64 {
    v * v
}

const BANQUE: [Regle; 19] = [
    Regle {
        id: "pythagore",
        gauche: "sin²x + cos²x",
        droite: "1",
        verdict: Verdict::Toujours,
        condition: None,
        deux_angles: false,
        explication: "identité de Pythagore sur le cercle trigonométrique",
        eval_g: |x, _| carre(x.sin()) + carre(x.cos()),
        eval_d: |_, _| 1.0,
    },
    Regle {
        id: "pythagore-2",
        gauche: "sin²x + cos²x",
        droite: "2",
        verdict: Verdict::Faux,
        condition: None,
        deux_angles: false,
        explication: "sin²x + cos²x vaut toujours 1",
        eval_g: |x, _| carre(x.sin()) + carre(x.cos()),
        eval_d: |_, _| 2.0,
    },
    Regle {
        id: "somme-sin",
        gauche: "sin(a + b)",
        droite: "sin a + sin b",
        verdict: Verdict::Parfois,
        condition: Some("par exemple si a = 0 ou b = 0"),
        deux_angles: true,
        explication: "le sinus n’est pas linéaire : sin(a + b) = sin a cos b + cos a sin b",
        eval_g: |a, b| (a + b).sin(),
        eval_d: |a, b| a.sin() + b.sin(),
    },
    Regle {
        id: "addition-sin",
        gauche: "sin(a + b)",
        droite: "sin a cos b + cos a sin b",
        verdict: Verdict::Toujours,
        condition: None,
        deux_angles: true,
        explication: "formule d’addition du sinus",
        eval_g: |a, b| (a + b).sin(),
        eval_d: |a, b| a.sin() * b.cos() + a.cos() * b.sin(),
    },
    Regle {
        id: "somme-cos",
        gauche: "cos(a + b)",
        droite: "cos a + cos b",
        verdict: Verdict::Parfois,
        condition: Some("seulement pour des valeurs particulières de a et b"),
        deux_angles: true,
        explication: "cos(a + b) = cos a cos b − sin a sin b",
        eval_g: |a, b| (a + b).cos(),
        eval_d: |a, b| a.cos() + b.cos(),
    },
    Regle {
        id: "difference-cos",
        gauche: "cos(a − b)",
        droite: "cos a cos b + sin a sin b",
        verdict: Verdict::Toujours,
        condition: None,
        deux_angles: true,
        explication: "formule d’addition du cosinus appliquée à −b",
        eval_g: |a, b| (a - b).cos(),
        eval_d: |a, b| a.cos() * b.cos() + a.sin() * b.sin(),
    },
    Regle {
        id: "somme-tan",
        gauche: "tan(a + b)",
        droite: "tan a + tan b",
        verdict: Verdict::Parfois,
        condition: Some("par exemple si a = 0 ou b = 0"),
        deux_angles: true,
        explication: "tan(a + b) = (tan a + tan b)/(1 − tan a tan b)",
        eval_g: |a, b| (a + b).tan(),
        eval_d: |a, b| a.tan() + b.tan(),
    },
    Regle {
        id: "double-sin",
        gauche: "sin(2x)",
        droite: "2 sin x",
        verdict: Verdict::Parfois,
        condition: Some("seulement si sin x = 0"),
        deux_angles: false,
        explication: "sin(2x) = 2 sin x cos x",
        eval_g: |x, _| (2.0 * x).sin(),
        eval_d: |x, _| 2.0 * x.sin(),
    },
    Regle {
        id: "double-cos",
        gauche: "cos(2x)",
        droite: "2cos²x − 1",
        verdict: Verdict::Toujours,
        condition: None,
        deux_angles: false,
        explication: "formule de duplication du cosinus",
        eval_g: |x, _| (2.0 * x).cos(),
        eval_d: |x, _| 2.0 * carre(x.cos()) - 1.0,
    },
    Regle {
        id: "double-cos-lineaire",
        gauche: "cos(2x)",
        droite: "2 cos x",
        verdict: Verdict::Parfois,
        condition: Some("seulement si cos x = (1 − √3)/2"),
        deux_angles: false,
        explication: "cos(2x) = 2cos²x − 1, pas 2 cos x",
        eval_g: |x, _| (2.0 * x).cos(),
        eval_d: |x, _| 2.0 * x.cos(),
    },
    Regle {
        id: "moitie-sin",
        gauche: "sin(x/2)",
        droite: "sin(x)/2",
        verdict: Verdict::Parfois,
        condition: Some("par exemple si x = 0"),
        deux_angles: false,
        explication: "on ne sort pas une constante de l’intérieur d’un sinus",
        eval_g: |x, _| (x / 2.0).sin(),
        eval_d: |x, _| x.sin() / 2.0,
    },
    Regle {
        id: "parite-sin",
        gauche: "sin(−x)",
        droite: "sin x",
        verdict: Verdict::Parfois,
        condition: Some("seulement si sin x = 0"),
        deux_angles: false,
        explication: "le sinus est impair : sin(−x) = −sin x",
        eval_g: |x, _| (-x).sin(),
        eval_d: |x, _| x.sin(),
    },
    Regle {
        id: "parite-cos",
        gauche: "cos(−x)",
        droite: "cos x",
        verdict: Verdict::Toujours,
        condition: None,
        deux_angles: false,
        explication: "le cosinus est pair",
        eval_g: |x, _| (-x).cos(),
        eval_d: |x, _| x.cos(),
    },
    Regle {
        id: "supplementaire-sin",
        gauche: "sin(π − x)",
        droite: "−sin x",
        verdict: Verdict::Parfois,
        condition: Some("seulement si sin x = 0"),
        deux_angles: false,
        explication: "sin(π − x) = sin x (symétrie par rapport à l’axe des ordonnées)",
        eval_g: |x, _| (std::f64::consts::PI - x).sin(),
        eval_d: |x, _| -x.sin(),
    },
    Regle {
        id: "supplementaire-cos",
        gauche: "cos(π − x)",
        droite: "−cos x",
        verdict: Verdict::Toujours,
        condition: None,
        deux_angles: false,
        explication: "symétrie par rapport à l’axe des ordonnées",
        eval_g: |x, _| (std::f64::consts::PI - x).cos(),
        eval_d: |x, _| -x.cos(),
    },
    Regle {
        id: "quotient-tan",
        gauche: "tan x",
        droite: "sin x / cos x",
        verdict: Verdict::Toujours,
        condition: Some("pour cos x ≠ 0"),
        deux_angles: false,
        explication: "définition de la tangente",
        eval_g: |x, _| x.tan(),
        eval_d: |x, _| x.sin() / x.cos(),
    },
    Regle {
        id: "secante",
        gauche: "1 + tan²x",
        droite: "1/cos²x",
        verdict: Verdict::Toujours,
        condition: Some("pour cos x ≠ 0"),
        deux_angles: false,
        explication: "diviser sin²x + cos²x = 1 par cos²x",
        eval_g: |x, _| 1.0 + carre(x.tan()),
        eval_d: |x, _| 1.0 / carre(x.cos()),
    },
    Regle {
        id: "somme-sin-cos-2",
        gauche: "sin x + cos x",
        droite: "2",
        verdict: Verdict::Faux,
        condition: None,
        deux_angles: false,
        explication: "sin x + cos x = √2 sin(x + π/4) ne dépasse jamais √2",
        eval_g: |x, _| x.sin() + x.cos(),
        eval_d: |_, _| 2.0,
    },
    Regle {
        id: "produit-sin-cos-1",
        gauche: "sin x · cos x",
        droite: "1",
        verdict: Verdict::Faux,
        condition: None,
        deux_angles: false,
        explication: "sin x cos x = sin(2x)/2 ne dépasse jamais 1/2",
        eval_g: |x, _| x.sin() * x.cos(),
        eval_d: |_, _| 1.0,
    },
];

const PERMUTATIONS: [[Verdict; 3]; 6] = {
    use Verdict::*;
    [
        [Toujours, Parfois, Faux],
        [Toujours, Faux, Parfois],
        [Parfois, Toujours, Faux],
        [Parfois, Faux, Toujours],
        [Faux, Toujours, Parfois],
        [Faux, Parfois, Toujours],
    ]
};

#[derive(Clone, Debug, PartialEq)]
pub struct FallacyTask {
    pub regle: &'static str,
    /// « sin(a + b) = sin a + sin b »
    pub enonce: String,
    pub options: [Verdict; 3],
    pub attendu: Verdict,
    pub condition: Option<String>,
    /// exemple numérique aux angles tirés
    pub exemple: String,
    pub feedback: String,
    pub next_seed: u32,
}

impl FallacyTask {
    pub fn prompt(&self) -> String {
        let choix: Vec<String> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}) {v}", i + 1))
            .collect();
        format!(
            "L’égalité « {} » est-elle… {}",
            self.enonce,
            choix.join("  ")
        )
    }
}

fn poids(difficulte: Difficulte) -> Vec<u32> {
    BANQUE
        .iter()
        .map(|r| match r.verdict {
            Verdict::Parfois => difficulte.niveau() as u32,
            _ => 1,
        })
        .collect()
}

/// Sélection déterministe d’une règle et de son exemple.
pub fn generate_fallacy_rule(seed: u32, difficulte: Difficulte) -> FallacyTask {
    let g = Lcg::new(seed);
    let (i, g) = g.choisir_pondere(&poids(difficulte));
    let (a_deg, g) = g.entre(1, 23);
    let (b_deg, g) = g.entre(1, 23);
    let (perm, g) = g.choisir(&PERMUTATIONS);

    let regle = &BANQUE[i];
    let exemple = exemple_numerique(regle, a_deg * 15, b_deg * 15);

    let enonce = format!("{} = {}", regle.gauche, regle.droite);
    let mut feedback = format!("« {enonce} » est {} : {}", regle.verdict, regle.explication);
    if let Some(c) = regle.condition {
        feedback.push_str(&format!(" ({c})"));
    }
    feedback.push_str(". ");
    feedback.push_str(&exemple);

    log::debug!(
        "sophisme graine={seed} difficulté={difficulte} règle={} suivante={}",
        regle.id,
        g.etat()
    );

    FallacyTask {
        regle: regle.id,
        enonce,
        options: *perm,
        attendu: regle.verdict,
        condition: regle.condition.map(str::to_string),
        exemple,
        feedback,
        next_seed: g.etat(),
    }
}

/// Au-delà, la valeur flottante vient d’un pôle (cos x = 0 à l’arrondi près).
const BORNE_DEFINIE: f64 = 1e12;

fn definie(v: f64) -> bool {
    v.is_finite() && v.abs() < BORNE_DEFINIE
}

fn exemple_numerique(regle: &Regle, a_deg: i64, b_deg: i64) -> String {
    let (a, b) = ((a_deg as f64).to_radians(), (b_deg as f64).to_radians());
    let (vg, vd) = ((regle.eval_g)(a, b), (regle.eval_d)(a, b));

    let variables = if regle.deux_angles {
        format!("a = {a_deg}°, b = {b_deg}°")
    } else {
        format!("x = {a_deg}°")
    };
    let constat = if !definie(vg) || !definie(vd) {
        "un des membres n’est pas défini"
    } else if presque_egaux(vg, vd) {
        "les deux membres sont égaux"
    } else {
        "les deux membres diffèrent"
    };
    format!(
        "Pour {variables} : {} ≈ {}, {} ≈ {} ({constat}).",
        regle.gauche,
        format_approx(vg),
        regle.droite,
        format_approx(vd)
    )
}

fn format_approx(v: f64) -> String {
    if definie(v) {
        format!("{v:.4}")
    } else {
        "indéfini".to_string()
    }
}

pub fn check_fallacy_answer(task: &FallacyTask, verdict: Verdict) -> CheckResult {
    let correct = verdict == task.attendu;
    log::debug!("sophisme {} : réponse {verdict:?}, correct={correct}", task.regle);
    let tete = if correct { "Exact." } else { "Non." };
    CheckResult {
        correct,
        feedback: format!("{tete} {}", task.feedback),
    }
}

/// Réponse texte : verdict en toutes lettres ou numéro d’option (1, 2, 3).
pub fn lire_verdict(task: &FallacyTask, saisie: &str) -> Resultat<Verdict> {
    match saisie.trim() {
        "1" => Ok(task.options[0]),
        "2" => Ok(task.options[1]),
        "3" => Ok(task.options[2]),
        autre => autre.parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banque_coherente_avec_les_verdicts() {
        // sur une grille d’angles : Toujours => égal partout où défini, Faux => jamais égal
        for r in &BANQUE {
            let mut egal = 0;
            let mut different = 0;
            for i in 1..24 {
                for j in 1..24 {
                    let (a, b) = ((i as f64 * 15.0).to_radians(), (j as f64 * 15.0 + 7.0).to_radians());
                    let (g, d) = ((r.eval_g)(a, b), (r.eval_d)(a, b));
                    if !g.is_finite() || !d.is_finite() || g.abs() > 1e12 || d.abs() > 1e12 {
                        continue;
                    }
                    if presque_egaux(g, d) || (g - d).abs() < 1e-9 {
                        egal += 1;
                    } else {
                        different += 1;
                    }
                }
            }
            match r.verdict {
                Verdict::Toujours => assert_eq!(different, 0, "règle {}", r.id),
                Verdict::Faux => assert_eq!(egal, 0, "règle {}", r.id),
                Verdict::Parfois => assert!(different > 0, "règle {}", r.id),
            }
        }
    }

    #[test]
    fn exemple_aux_poles_non_defini() {
        for id in ["quotient-tan", "secante"] {
            let regle = BANQUE.iter().find(|r| r.id == id).unwrap();
            for x in [90, 270] {
                let e = exemple_numerique(regle, x, 15);
                assert!(e.contains("n’est pas défini"), "{id} {x}° : {e}");
                assert!(!e.contains("égaux"), "{id} {x}° : {e}");
            }
            let e = exemple_numerique(regle, 45, 15);
            assert!(e.contains("les deux membres sont égaux"), "{id} : {e}");
        }
        let somme = BANQUE.iter().find(|r| r.id == "somme-tan").unwrap();
        assert!(exemple_numerique(somme, 45, 45).contains("indéfini"));
    }

    #[test]
    fn deterministe() {
        for d in [Difficulte::Facile, Difficulte::Moyen, Difficulte::Difficile] {
            for seed in [0u32, 1, 42, 2024, u32::MAX] {
                assert_eq!(generate_fallacy_rule(seed, d), generate_fallacy_rule(seed, d));
            }
        }
    }

    #[test]
    fn graine_suivante_enchaine() {
        let t = generate_fallacy_rule(7, Difficulte::Moyen);
        assert_ne!(t.next_seed, 7);
        let u = generate_fallacy_rule(t.next_seed, Difficulte::Moyen);
        assert_eq!(u, generate_fallacy_rule(t.next_seed, Difficulte::Moyen));
    }

    #[test]
    fn options_sont_une_permutation() {
        for seed in 0..50 {
            let t = generate_fallacy_rule(seed, Difficulte::Facile);
            for v in [Verdict::Toujours, Verdict::Parfois, Verdict::Faux] {
                assert!(t.options.contains(&v));
            }
        }
    }

    #[test]
    fn difficulte_favorise_parfois() {
        let compte = |d: Difficulte| {
            (0..600u32)
                .filter(|&s| generate_fallacy_rule(s.wrapping_mul(2_654_435_761), d).attendu == Verdict::Parfois)
                .count()
        };
        assert!(compte(Difficulte::Difficile) > compte(Difficulte::Facile));
    }

    #[test]
    fn verification() {
        let t = generate_fallacy_rule(11, Difficulte::Facile);
        assert!(check_fallacy_answer(&t, t.attendu).correct);
        let autre = t.options.iter().copied().find(|v| *v != t.attendu).unwrap();
        let r = check_fallacy_answer(&t, autre);
        assert!(!r.correct);
        assert!(r.feedback.contains(&t.enonce));

        let idx = t.options.iter().position(|v| *v == t.attendu).unwrap();
        assert_eq!(lire_verdict(&t, &(idx + 1).to_string()).unwrap(), t.attendu);
        assert_eq!("Parfois".parse::<Verdict>().unwrap(), Verdict::Parfois);
        assert!("peut-être".parse::<Verdict>().is_err());
    }
}
