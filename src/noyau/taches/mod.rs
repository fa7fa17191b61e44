// src/noyau/taches/mod.rs
//
// Tâches algébriques générées
// ---------------------------
// - generate_task(mode, difficulté, graine?) : fonction PURE de la graine (graine absente => horloge)
// - next_seed = état du LCG après le dernier tirage (enchaînement déterministe)
// - check_answer(tâche, saisie) : vérification sémantique selon le payload, jamais par égalité de texte
//   (sauf payload Texte, comparé après normalisation)

pub mod generateurs;
pub mod monome;
pub mod polynome;

use std::fmt;
use std::str::FromStr;

use super::alea::{graine_horloge, Lcg};
use super::echantillonnage::{equivalentes_par_echantillonnage, DomaineEchantillons};
use super::erreurs::{NoyauError, Resultat};
use super::expr::{parse_expression, Expr, Valeurs};
use super::rationnel::{rational_to_string, Rationnel};
use super::reglages::Difficulte;

use monome::{parse_monome, Monome};
use polynome::{parse_polynome, Polynome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeTache {
    Arithmetique,
    Puissances,
    Racines,
    Binome,
    Quadratique,
    Logarithmes,
    Sommes,
}

impl ModeTache {
    pub const TOUS: [ModeTache; 7] = [
        ModeTache::Arithmetique,
        ModeTache::Puissances,
        ModeTache::Racines,
        ModeTache::Binome,
        ModeTache::Quadratique,
        ModeTache::Logarithmes,
        ModeTache::Sommes,
    ];

    /// Clé stable (compteurs de progression).
    pub fn cle(&self) -> &'static str {
        match self {
            ModeTache::Arithmetique => "arithmetique",
            ModeTache::Puissances => "puissances",
            ModeTache::Racines => "racines",
            ModeTache::Binome => "binome",
            ModeTache::Quadratique => "quadratique",
            ModeTache::Logarithmes => "logarithmes",
            ModeTache::Sommes => "sommes",
        }
    }
}

impl fmt::Display for ModeTache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cle())
    }
}

impl FromStr for ModeTache {
    type Err = NoyauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_lowercase();
        ModeTache::TOUS
            .iter()
            .copied()
            .find(|m| m.cle() == t)
            .ok_or_else(|| NoyauError::syntaxe(format!("mode inconnu: '{s}'")))
    }
}

/// Contrainte de forme en plus de l’équivalence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Structure {
    /// a(x − h)² + k : un seul terme en x, carré d’une expression affine
    FormeCanonique,
    /// un seul logarithme
    UnSeulLn,
    /// réécriture : pas la même expression que l’énoncé
    DifferenteDe(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Rationnel(Rationnel),
    Numerique {
        valeur: f64,
        tolerance: f64,
    },
    Expression {
        attendu: String,
        domaine: DomaineEchantillons,
        structure: Option<Structure>,
    },
    Monome(Monome),
    Booleen(bool),
    Polynome(Polynome),
    /// réponses acceptées (comparées après normalisation)
    Texte {
        attendus: Vec<String>,
    },
}

impl Payload {
    pub fn reponse_attendue(&self) -> String {
        match self {
            Payload::Rationnel(r) => rational_to_string(r),
            Payload::Numerique { valeur, .. } => format!("{valeur:.2}"),
            Payload::Expression { attendu, .. } => attendu.clone(),
            Payload::Monome(m) => m.to_string(),
            Payload::Booleen(b) => if *b { "vrai" } else { "faux" }.to_string(),
            Payload::Polynome(p) => p.to_string(),
            Payload::Texte { attendus } => attendus.first().cloned().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MathTask {
    pub mode: ModeTache,
    pub difficulte: Difficulte,
    pub seed: u32,
    pub prompt: String,
    pub payload: Payload,
    pub explication: String,
    pub next_seed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub correct: bool,
    pub feedback: String,
}

impl CheckResult {
    pub(crate) fn juste(explication: &str) -> CheckResult {
        CheckResult {
            correct: true,
            feedback: format!("Correct ! {explication}"),
        }
    }

    pub(crate) fn faux(motif: impl fmt::Display) -> CheckResult {
        CheckResult {
            correct: false,
            feedback: motif.to_string(),
        }
    }
}

/// Ce que rend un générateur avant d’être habillé en MathTask.
#[derive(Clone, Debug, PartialEq)]
pub struct Brouillon {
    pub prompt: String,
    pub payload: Payload,
    pub explication: String,
}

pub fn generate_task(mode: ModeTache, difficulte: Difficulte, seed: Option<u32>) -> MathTask {
    let seed = seed.unwrap_or_else(graine_horloge);
    let g = Lcg::new(seed);

    let (b, g) = match mode {
        ModeTache::Arithmetique => generateurs::arithmetique(g, difficulte),
        ModeTache::Puissances => generateurs::puissances(g, difficulte),
        ModeTache::Racines => generateurs::racines(g, difficulte),
        ModeTache::Binome => generateurs::binome(g, difficulte),
        ModeTache::Quadratique => generateurs::quadratique(g, difficulte),
        ModeTache::Logarithmes => generateurs::logarithmes(g, difficulte),
        ModeTache::Sommes => generateurs::sommes(g, difficulte),
    };

    log::debug!(
        "tâche {mode} graine={seed} difficulté={difficulte} suivante={}",
        g.etat()
    );

    MathTask {
        mode,
        difficulte,
        seed,
        prompt: b.prompt,
        payload: b.payload,
        explication: b.explication,
        next_seed: g.etat(),
    }
}

pub fn check_answer(task: &MathTask, input: &str) -> CheckResult {
    let verdict = match verifier(&task.payload, input) {
        Ok(Ok(())) => CheckResult::juste(&task.explication),
        Ok(Err(motif)) => CheckResult::faux(format!(
            "Incorrect{motif}. Réponse attendue : {}. {}",
            task.payload.reponse_attendue(),
            task.explication
        )),
        Err(e) => CheckResult::faux(format!("Réponse illisible ({e}).")),
    };
    log::debug!(
        "vérification {} graine={} saisie={input:?} correct={}",
        task.mode,
        task.seed,
        verdict.correct
    );
    verdict
}

/// Ok(Ok) : juste ; Ok(Err(motif)) : lisible mais faux ; Err : illisible.
fn verifier(payload: &Payload, input: &str) -> Resultat<Result<(), String>> {
    let faux = |motif: &str| -> Resultat<Result<(), String>> { Ok(Err(motif.to_string())) };
    match payload {
        Payload::Rationnel(r) => {
            let e = parse_expression(input)?;
            match e.eval_exact()? {
                Some(v) if v == *r => Ok(Ok(())),
                Some(_) => faux(""),
                None if !e.est_constante() => faux(" : un nombre est attendu"),
                None => faux(" : une valeur exacte rationnelle est attendue"),
            }
        }

        Payload::Numerique { valeur, tolerance } => {
            let e = parse_expression(input)?;
            if !e.est_constante() {
                return faux(" : un nombre est attendu");
            }
            let v = e.eval(&Valeurs::new());
            if v.is_finite() && (v - valeur).abs() <= *tolerance {
                Ok(Ok(()))
            } else {
                faux("")
            }
        }

        Payload::Expression {
            attendu,
            domaine,
            structure,
        } => {
            let saisie = parse_expression(input)?;
            let cible = parse_expression(attendu)?;
            if let Some(s) = structure {
                if let Some(motif) = structure_non_respectee(s, &saisie)? {
                    return faux(&motif);
                }
            }
            if equivalentes_par_echantillonnage(&cible, &saisie, *domaine) {
                Ok(Ok(()))
            } else {
                faux(" : expression non équivalente")
            }
        }

        Payload::Monome(m) => {
            if parse_monome(input)? == *m {
                Ok(Ok(()))
            } else {
                faux("")
            }
        }

        Payload::Booleen(b) => {
            if lire_booleen(input)? == *b {
                Ok(Ok(()))
            } else {
                faux("")
            }
        }

        Payload::Polynome(p) => {
            if parse_polynome(input)? == *p {
                Ok(Ok(()))
            } else {
                faux("")
            }
        }

        Payload::Texte { attendus } => {
            let n = normaliser_texte(input);
            if attendus.iter().any(|a| normaliser_texte(a) == n) {
                Ok(Ok(()))
            } else {
                faux("")
            }
        }
    }
}

fn lire_booleen(s: &str) -> Resultat<bool> {
    match s.trim().to_lowercase().as_str() {
        "vrai" | "v" | "oui" | "true" | "1" => Ok(true),
        "faux" | "f" | "non" | "false" | "0" => Ok(false),
        autre => Err(NoyauError::syntaxe(format!("vrai ou faux attendu, pas '{autre}'"))),
    }
}

/// minuscules, sans espaces ni accolades/parenthèses/étoiles ; "sum" et Σ -> σ
pub fn normaliser_texte(s: &str) -> String {
    s.to_lowercase()
        .replace("sum", "σ")
        .replace("prod", "π")
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | '(' | ')' | '*' | '·'))
        .map(|c| match c {
            'Σ' | 'ς' => 'σ',
            'Π' | '∏' => 'π',
            '∑' => 'σ',
            c => c,
        })
        .collect()
}

/* ------------------------ Contrôles de forme ------------------------ */

fn structure_non_respectee(s: &Structure, e: &Expr) -> Resultat<Option<String>> {
    Ok(match s {
        Structure::FormeCanonique => {
            if est_forme_canonique(e) {
                None
            } else {
                Some(" : la forme a(x − h)² + k est attendue".to_string())
            }
        }
        Structure::UnSeulLn => {
            if compte_ln(e) == 1 {
                None
            } else {
                Some(" : un seul logarithme est attendu".to_string())
            }
        }
        Structure::DifferenteDe(depart) => {
            if parse_expression(depart)? == *e {
                Some(" : c’est l’expression de départ".to_string())
            } else {
                None
            }
        }
    })
}

fn compte_ln(e: &Expr) -> usize {
    use Expr::*;
    match e {
        Rat(_) | Pi | E | Var(_) => 0,
        Ln(x) => 1 + compte_ln(x),
        Sqrt(x) | Abs(x) | Exp(x) | Sin(x) | Cos(x) | Tan(x) => compte_ln(x),
        Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) => compte_ln(a) + compte_ln(b),
    }
}

fn termes<'a>(e: &'a Expr, acc: &mut Vec<&'a Expr>) {
    match e {
        Expr::Add(a, b) | Expr::Sub(a, b) => {
            termes(a, acc);
            termes(b, acc);
        }
        _ => acc.push(e),
    }
}

fn est_forme_canonique(e: &Expr) -> bool {
    let mut ts = Vec::new();
    termes(e, &mut ts);
    let (variables, constantes): (Vec<&Expr>, Vec<&Expr>) =
        ts.into_iter().partition(|t| !t.est_constante());
    variables.len() == 1 && constantes.len() <= 2 && est_carre_affine(variables[0])
}

/// c·(affine)², (affine)²·c, (affine)²/c
fn est_carre_affine(e: &Expr) -> bool {
    use Expr::*;
    match e {
        Pow(base, n) => {
            matches!(n.eval_exact(), Ok(Some(v)) if v == Rationnel::from_integer(2))
                && !base.est_constante()
                && est_affine(base)
        }
        Mul(a, b) if a.est_constante() => est_carre_affine(b),
        Mul(a, b) if b.est_constante() => est_carre_affine(a),
        Div(a, b) if b.est_constante() => est_carre_affine(a),
        _ => false,
    }
}

fn est_affine(e: &Expr) -> bool {
    use Expr::*;
    match e {
        _ if e.est_constante() => true,
        Var(_) => true,
        Add(a, b) | Sub(a, b) => est_affine(a) && est_affine(b),
        Mul(a, b) => (a.est_constante() && est_affine(b)) || (b.est_constante() && est_affine(a)),
        Div(a, b) => b.est_constante() && est_affine(a),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::rationnel::{entier, rationnel};

    fn tache(payload: Payload) -> MathTask {
        MathTask {
            mode: ModeTache::Arithmetique,
            difficulte: Difficulte::Facile,
            seed: 1,
            prompt: String::new(),
            payload,
            explication: "explication".to_string(),
            next_seed: 2,
        }
    }

    #[test]
    fn modes_texte() {
        for m in ModeTache::TOUS {
            assert_eq!(m.to_string().parse::<ModeTache>().unwrap(), m);
        }
        assert!("géométrie".parse::<ModeTache>().is_err());
    }

    #[test]
    fn rationnel_sous_toutes_ses_formes() {
        let t = tache(Payload::Rationnel(rationnel(3, 4).unwrap()));
        for ok in ["3/4", "0.75", "6/8", "1 - 1/4", "(3)/(4)"] {
            assert!(check_answer(&t, ok).correct, "{ok:?}");
        }
        for ko in ["0.7", "x", "√2", "4/3"] {
            assert!(!check_answer(&t, ko).correct, "{ko:?}");
        }
        let r = check_answer(&t, "3/");
        assert!(!r.correct);
        assert!(r.feedback.contains("illisible"));
    }

    #[test]
    fn numerique_avec_tolerance() {
        let t = tache(Payload::Numerique {
            valeur: 5f64.ln(),
            tolerance: 0.0051,
        });
        assert!(check_answer(&t, "1.61").correct);
        assert!(check_answer(&t, "ln(5)").correct);
        assert!(!check_answer(&t, "1.62").correct);
    }

    #[test]
    fn forme_canonique() {
        let t = tache(Payload::Expression {
            attendu: "(x + 3)^2 - 4".to_string(),
            domaine: DomaineEchantillons::Reels,
            structure: Some(Structure::FormeCanonique),
        });
        assert!(check_answer(&t, "(x+3)^2 - 4").correct);
        assert!(check_answer(&t, "-4 + (x + 3)²").correct);
        // équivalent mais pas canonique
        assert!(!check_answer(&t, "x^2 + 6x + 5").correct);
        assert!(!check_answer(&t, "(x+3)(x+3) - 4").correct);
        // canonique mais faux
        assert!(!check_answer(&t, "(x-3)^2 - 4").correct);

        let t2 = tache(Payload::Expression {
            attendu: "2(x - 1/2)^2 + 3/2".to_string(),
            domaine: DomaineEchantillons::Reels,
            structure: Some(Structure::FormeCanonique),
        });
        assert!(check_answer(&t2, "2(x - 0.5)^2 + 1.5").correct);
    }

    #[test]
    fn un_seul_ln_et_reecriture() {
        let t = tache(Payload::Expression {
            attendu: "ln(x*y)".to_string(),
            domaine: DomaineEchantillons::Positifs,
            structure: Some(Structure::UnSeulLn),
        });
        assert!(check_answer(&t, "ln(xy)").correct);
        assert!(!check_answer(&t, "ln(x) + ln(y)").correct);

        let t = tache(Payload::Expression {
            attendu: "3ln(x)".to_string(),
            domaine: DomaineEchantillons::Positifs,
            structure: Some(Structure::DifferenteDe("ln(x^3)".to_string())),
        });
        assert!(check_answer(&t, "3 ln x").correct);
        assert!(!check_answer(&t, "ln(x^3)").correct);
    }

    #[test]
    fn division_chainee_verifiee_a_gauche() {
        let t = tache(Payload::Expression {
            attendu: "x/6".to_string(),
            domaine: DomaineEchantillons::Reels,
            structure: None,
        });
        assert!(check_answer(&t, "x/2/3").correct);
        assert!(check_answer(&t, "(x/2)/3").correct);
        assert!(!check_answer(&t, "3x/2").correct);
    }

    #[test]
    fn grands_nombres_refuses_sans_panique() {
        let m = tache(Payload::Monome(Monome::terme(entier(1), 'x', entier(7))));
        let r = check_answer(&m, "99999999999x * 99999999999");
        assert!(!r.correct);
        assert!(r.feedback.starts_with("Réponse illisible"), "{}", r.feedback);

        let p = tache(Payload::Polynome(Polynome::new(vec![entier(0), entier(2)])));
        let r = check_answer(&p, "1/99999999999x + 1/99999999998x");
        assert!(!r.correct);
        assert!(r.feedback.starts_with("Réponse illisible"), "{}", r.feedback);

        let q = tache(Payload::Rationnel(entier(1)));
        assert!(!check_answer(&q, "99999999999999999^4").correct);
    }

    #[test]
    fn monome_polynome_booleen_texte() {
        let m = tache(Payload::Monome(Monome::terme(entier(1), 'x', entier(7))));
        assert!(check_answer(&m, "x^7").correct);
        assert!(!check_answer(&m, "x^12").correct);

        let p = tache(Payload::Polynome(Polynome::new(vec![entier(9), entier(6), entier(1)])));
        assert!(check_answer(&p, "x^2 + 6x + 9").correct);
        assert!(check_answer(&p, "9 + 6x + x²").correct);
        assert!(!check_answer(&p, "x^2 + 9").correct);

        let b = tache(Payload::Booleen(false));
        assert!(check_answer(&b, "Faux").correct);
        assert!(!check_answer(&b, "oui").correct);
        assert!(!check_answer(&b, "peut-être").correct);

        let s = tache(Payload::Texte {
            attendus: vec!["Σ_{k=1}^{10} 2k".to_string()],
        });
        assert!(check_answer(&s, "Σ_{k=1}^{10} 2*k").correct);
        assert!(check_answer(&s, "sum_{k=1}^{10} (2k)").correct);
        assert!(!check_answer(&s, "Σ_{k=1}^{10} k").correct);
    }

    #[test]
    fn feedback_cite_la_reponse() {
        let t = tache(Payload::Rationnel(rationnel(5, 6).unwrap()));
        let r = check_answer(&t, "1");
        assert!(r.feedback.contains("5/6"));
        assert!(r.feedback.contains("explication"));
    }
}
