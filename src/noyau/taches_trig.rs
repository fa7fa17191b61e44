// src/noyau/taches_trig.rs
//
// Tâches de trigonométrie
// -----------------------
// Trois genres, tirés avec des poids selon la difficulté :
//   - valeur exacte de sin/cos/tan en un angle spécial
//   - conversion degrés <-> radians (mesure exacte, SANS modulo : 390° = 13π/6, pas π/6)
//   - identité : réécrire une expression trigonométrique, vérifiée par échantillonnage
// Ordre des tirages : genre, puis tirages propres au genre (fixes pour un genre donné).

use super::alea::Lcg;
use super::angle::{angle_to_string, format_angle_kn_pi, format_reel, parse_angle, Angle, TOLERANCE_DEGRES};
use super::echantillonnage::{equivalentes_par_echantillonnage, DomaineEchantillons};
use super::erreurs::Resultat;
use super::expr::parse_expression;
use super::rationnel::pgcd;
use super::reglages::Difficulte;
use super::taches::CheckResult;
use super::trig::{sin_cos_tan_exact, TrigFn};
use super::valeur_exacte::{format_exact, parse_exact_value, ValeurExacte};

#[derive(Clone, Debug, PartialEq)]
pub enum PayloadTrig {
    Valeur {
        angle: Angle,
        fonction: TrigFn,
        attendu: ValeurExacte,
    },
    /// `angle` est la mesure donnée dans l’énoncé (degrés si vers_radians).
    Conversion { angle: Angle, vers_radians: bool },
    Identite { depart: String, attendu: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrigTask {
    pub prompt: String,
    pub payload: PayloadTrig,
    pub explication: String,
    pub next_seed: u32,
}

impl PayloadTrig {
    pub fn reponse_attendue(&self) -> String {
        match self {
            PayloadTrig::Valeur { attendu, .. } => format_exact(attendu),
            PayloadTrig::Conversion { angle, vers_radians } => {
                if *vers_radians {
                    let (p, q) = demi_tours_exacts(angle);
                    format_angle_kn_pi(p, q)
                } else {
                    format!("{}°", format_reel(angle.en_degres()))
                }
            }
            PayloadTrig::Identite { attendu, .. } => attendu.clone(),
        }
    }
}

/* ------------------------ Banque d’identités ------------------------ */

// (départ, forme attendue, difficulté minimale 1..3)
const IDENTITES: [(&str, &str, i64); 14] = [
    ("sin(-x)", "-sin(x)", 1),
    ("cos(-x)", "cos(x)", 1),
    ("sin(π - x)", "sin(x)", 1),
    ("cos(π - x)", "-cos(x)", 1),
    ("sin(x + 2π)", "sin(x)", 1),
    ("tan(x + π)", "tan(x)", 2),
    ("sin(x + π/2)", "cos(x)", 2),
    ("cos(x + π/2)", "-sin(x)", 2),
    ("cos(x - π/2)", "sin(x)", 2),
    ("sin(x)^2 + cos(x)^2", "1", 2),
    ("1 - cos(x)^2", "sin(x)^2", 3),
    ("tan(x)cos(x)", "sin(x)", 3),
    ("2sin(x)cos(x)", "sin(2x)", 3),
    ("cos(x)^2 - sin(x)^2", "cos(2x)", 3),
];

/* ------------------------ Génération ------------------------ */

fn poids_genres(difficulte: Difficulte) -> [u32; 3] {
    match difficulte {
        Difficulte::Facile => [2, 1, 0],
        Difficulte::Moyen => [2, 1, 1],
        Difficulte::Difficile => [1, 1, 2],
    }
}

fn rad_reduit(p: i64, q: i64) -> Angle {
    let g = pgcd(p, q).max(1);
    Angle::Rad { p: p / g, q: q / g }
}

/// (p, q) réduits tels que l’angle vaille (p/q)·π ; degrés supposés multiples de 1°.
fn demi_tours_exacts(angle: &Angle) -> (i64, i64) {
    match *angle {
        Angle::Rad { p, q } => (p, q),
        Angle::Deg(v) => match rad_reduit(v.round() as i64, 180) {
            Angle::Rad { p, q } => (p, q),
            Angle::Deg(_) => (0, 1),
        },
    }
}

pub fn generate_trig_task(seed: u32, difficulte: Difficulte) -> TrigTask {
    let g = Lcg::new(seed);
    let (genre, g) = g.choisir_pondere(&poids_genres(difficulte));

    let (prompt, payload, explication, g) = match genre {
        0 => tache_valeur(g, difficulte),
        1 => tache_conversion(g, difficulte),
        _ => tache_identite(g, difficulte),
    };

    log::debug!(
        "tâche trig genre={genre} graine={seed} difficulté={difficulte} suivante={}",
        g.etat()
    );

    TrigTask {
        prompt,
        payload,
        explication,
        next_seed: g.etat(),
    }
}

fn tache_valeur(g: Lcg, difficulte: Difficulte) -> (String, PayloadTrig, String, Lcg) {
    const PREMIER_QUADRANT: [(i64, i64); 5] = [(0, 1), (1, 6), (1, 4), (1, 3), (1, 2)];

    let (q, g) = g.choisir(&[6i64, 4, 3]);
    let q = *q;
    let (angle, g) = match difficulte {
        Difficulte::Facile => {
            let (&(p, q), g) = g.choisir(&PREMIER_QUADRANT);
            (Angle::Deg((180 * p / q) as f64), g)
        }
        Difficulte::Moyen => {
            let (p, g) = g.entre(0, 2 * q - 1);
            let (en_degres, g) = g.piece();
            let a = if en_degres {
                Angle::Deg((180 * p / q) as f64)
            } else {
                rad_reduit(p, q)
            };
            (a, g)
        }
        Difficulte::Difficile => {
            let (p, g) = g.entre(-2 * q, 4 * q);
            (rad_reduit(p, q), g)
        }
    };
    let fonctions: &[TrigFn] = match difficulte {
        Difficulte::Facile => &[TrigFn::Sin, TrigFn::Cos],
        _ => &[TrigFn::Sin, TrigFn::Cos, TrigFn::Tan],
    };
    let (fonction, g) = g.choisir(fonctions);
    let fonction = *fonction;

    let valeurs = sin_cos_tan_exact(angle);
    let attendu = valeurs.valeur(fonction).clone();
    let a = angle_to_string(&angle);
    let prompt = format!(
        "Donner la valeur exacte de {}({a}) (ex. sqrt(3)/2, -1/2, undef).",
        fonction.nom()
    );
    let explication = format!(
        "En {a} : sin = {}, cos = {}, tan = {}.",
        format_exact(&valeurs.sin),
        format_exact(&valeurs.cos),
        format_exact(&valeurs.tan)
    );
    (
        prompt,
        PayloadTrig::Valeur {
            angle,
            fonction,
            attendu,
        },
        explication,
        g,
    )
}

fn tache_conversion(g: Lcg, difficulte: Difficulte) -> (String, PayloadTrig, String, Lcg) {
    let (vers_radians, g) = g.piece();
    let (k, g) = match difficulte {
        Difficulte::Facile => {
            let (k, g) = g.choisir(&[2i64, 3, 4, 6, 12]);
            (*k, g)
        }
        Difficulte::Moyen => g.entre(1, 24),
        Difficulte::Difficile => g.entre_non_nul(-24, 48),
    };
    // k·15°
    let angle = if vers_radians {
        Angle::Deg((15 * k) as f64)
    } else {
        rad_reduit(k, 12)
    };
    let (p, q) = demi_tours_exacts(&angle);

    let prompt = if vers_radians {
        format!(
            "Convertir {} en radians (forme kπ/n).",
            angle_to_string(&angle)
        )
    } else {
        format!("Convertir {} en degrés.", angle_to_string(&angle))
    };
    let explication = format!(
        "{}° × π/180 = {} (1° = π/180 rad).",
        format_reel(angle.en_degres()),
        format_angle_kn_pi(p, q)
    );
    (
        prompt,
        PayloadTrig::Conversion {
            angle,
            vers_radians,
        },
        explication,
        g,
    )
}

fn tache_identite(g: Lcg, difficulte: Difficulte) -> (String, PayloadTrig, String, Lcg) {
    let permises: Vec<&(&str, &str, i64)> = IDENTITES
        .iter()
        .filter(|(_, _, niveau)| *niveau <= difficulte.niveau())
        .collect();
    let (&&(depart, attendu, _), g) = g.choisir(&permises);

    let prompt = format!("Simplifier : {depart}");
    let explication = format!("{depart} = {attendu} pour tout x où les deux membres sont définis.");
    (
        prompt,
        PayloadTrig::Identite {
            depart: depart.to_string(),
            attendu: attendu.to_string(),
        },
        explication,
        g,
    )
}

/* ------------------------ Vérification ------------------------ */

pub fn check_trig_answer(task: &TrigTask, input: &str) -> CheckResult {
    let verdict = match verifier(&task.payload, input) {
        Ok(Ok(())) => CheckResult::juste(&task.explication),
        Ok(Err(motif)) => CheckResult::faux(format!(
            "Incorrect{motif}. Réponse attendue : {}. {}",
            task.payload.reponse_attendue(),
            task.explication
        )),
        Err(e) => CheckResult::faux(format!("Réponse illisible ({e}).")),
    };
    log::debug!("vérification trig saisie={input:?} correct={}", verdict.correct);
    verdict
}

fn verifier(payload: &PayloadTrig, input: &str) -> Resultat<Result<(), String>> {
    match payload {
        PayloadTrig::Valeur { attendu, .. } => {
            // forme exacte exigée : une approximation décimale est fausse
            let reponse = parse_exact_value(input)?;
            Ok(if reponse == *attendu {
                Ok(())
            } else {
                Err(String::new())
            })
        }

        PayloadTrig::Conversion { angle, vers_radians: true } => {
            let (p, q) = demi_tours_exacts(angle);
            match parse_angle(input)? {
                Angle::Deg(_) => Ok(Err(" (réponse attendue en radians)".to_string())),
                Angle::Rad { p: p2, q: q2 } if p2 == p && q2 == q => Ok(Ok(())),
                Angle::Rad { .. } => Ok(Err(String::new())),
            }
        }

        PayloadTrig::Conversion { angle, vers_radians: false } => {
            let s = input.trim();
            // nombre nu = degrés
            let degres = match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => match parse_angle(s)? {
                    Angle::Deg(v) => Some(v),
                    Angle::Rad { .. } => None,
                },
            };
            Ok(match degres {
                None => Err(" (réponse attendue en degrés)".to_string()),
                Some(v) if (v - angle.en_degres()).abs() < TOLERANCE_DEGRES => Ok(()),
                Some(_) => Err(String::new()),
            })
        }

        PayloadTrig::Identite { depart, attendu } => {
            let reponse = parse_expression(input)?;
            let depart = parse_expression(depart)?;
            if reponse.to_string() == depart.to_string() {
                return Ok(Err(" (l’expression de départ a été recopiée)".to_string()));
            }
            let attendu = parse_expression(attendu)?;
            Ok(
                if equivalentes_par_echantillonnage(&reponse, &attendu, DomaineEchantillons::Reels) {
                    Ok(())
                } else {
                    Err(" (expressions non équivalentes)".to_string())
                },
            )
        }
    }
}
