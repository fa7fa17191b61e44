//! Tests fuzz safe : robustesse + relecture + limites contrôlées.
//!
//! But : marteler les trois lecteurs (formules, ensembles, expressions) sans brûler la machine.
//! - tirages déterministes (LCG du noyau, graine fixe)
//! - profondeur et longueur bornées
//! - budget temps global
//! - invariant clé : une lecture réussie se ré-affiche en un texte qui se relit à l’identique
//! - les saisies au hasard échouent proprement (Syntaxe / Domaine), jamais de panique
//! - grands nombres (10 à 19 chiffres) : dépassement => Domaine, jamais de panique

use std::time::{Duration, Instant};

use super::alea::Lcg;
use super::angle::{angle_to_string, normalize_angle, parse_angle};
use super::ensembles::parse_set_expression;
use super::erreurs::NoyauError;
use super::expr::{parse_expression, Valeurs};
use super::formule::{ast_to_string, parse_formula, Formule};
use super::rationnel::{parse_rational, vers_flottant};
use super::reglages::Difficulte;
use super::taches::monome::parse_monome;
use super::taches::polynome::parse_polynome;
use super::taches::{check_answer, generate_task, ModeTache};
use super::taches_trig::{check_trig_answer, generate_trig_task};
use super::trig::sin_cos_tan_exact;
use super::valeur_exacte::parse_exact_value;
use super::transformations::{eliminate_implications, negate_with_de_morgan};
use super::verite::formules_equivalentes;

/* ------------------------ Tirages ------------------------ */

struct Rng {
    g: Lcg,
}

impl Rng {
    fn new(seed: u32) -> Self {
        Self { g: Lcg::new(seed) }
    }

    fn pick(&mut self, n: usize) -> usize {
        let (i, g) = self.g.entre(0, n as i64 - 1);
        self.g = g;
        i as usize
    }

    fn coin(&mut self) -> bool {
        let (b, g) = self.g.piece();
        self.g = g;
        b
    }

    fn chaine(&mut self, alphabet: &[&str], longueur: usize) -> String {
        (0..longueur).map(|_| alphabet[self.pick(alphabet.len())]).collect()
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération bornée ------------------------ */

fn gen_formule(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 || rng.pick(4) == 0 {
        return ["A", "B", "C"][rng.pick(3)].to_string();
    }
    if rng.pick(5) == 0 {
        return format!("¬{}", gen_formule(rng, depth - 1));
    }
    let op = ["∧", "∨", "⇒", "⇔"][rng.pick(4)];
    format!(
        "({} {op} {})",
        gen_formule(rng, depth - 1),
        gen_formule(rng, depth - 1)
    )
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "x".to_string(),
        1 => format!("{}^2", 1 + rng.pick(5)),
        2 => format!("{}^-1", 1 + rng.pick(5)),
        3 => format!("√({})", [1, 4, 9, 2][rng.pick(4)]),
        _ => format!("{}", 1 + rng.pick(5)),
    }
}

fn gen_arith(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 || rng.pick(3) == 0 {
        return gen_atome(rng);
    }
    let signe = if rng.coin() { "-" } else { "" };
    let op = ["+", "-", "*", "/"][rng.pick(4)];
    format!(
        "{signe}({} {op} {})",
        gen_arith(rng, depth - 1),
        gen_arith(rng, depth - 1)
    )
}

fn erreur_attendue(e: &NoyauError) -> bool {
    matches!(e, NoyauError::Syntaxe(_) | NoyauError::Domaine(_))
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_formules_relecture_et_transformations() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);
    let mut rng = Rng::new(0xC0FFEE);

    for _ in 0..150 {
        budget(t0, max);
        let s = gen_formule(&mut rng, 4);
        let f = parse_formula(&s).unwrap_or_else(|e| panic!("{s:?} : {e}"));

        let affiche = ast_to_string(&f);
        let relu = parse_formula(&affiche).unwrap_or_else(|e| panic!("{affiche:?} : {e}"));
        assert_eq!(relu, f, "{s:?} -> {affiche:?}");

        assert!(formules_equivalentes(&f, &eliminate_implications(&f)), "{s:?}");
        assert!(
            formules_equivalentes(&Formule::not(f.clone()), &negate_with_de_morgan(&f)),
            "{s:?}"
        );
    }
}

#[test]
fn fuzz_safe_saisies_au_hasard() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);
    let mut rng = Rng::new(0xBADC0DE);

    let logique = ["A", "B", "C", "¬", "∧", "∨", "⇒", "⇔", "(", ")", " ", "->", "!", "&", "x"];
    let ensembles = ["A", "B", "C", "∪", "∩", "∖", "Δ", "^c", "'", "(", ")", "∅", "Ω", "U", "?"];
    let arith = ["x", "1", "2", "0", "/", "+", "-", "*", "^", "(", ")", "π", "sin", "√", ".", "ln"];

    let (mut ok, mut err) = (0usize, 0usize);
    for _ in 0..300 {
        budget(t0, max);
        let n = 1 + rng.pick(10);

        let s = rng.chaine(&logique, n);
        match parse_formula(&s) {
            Ok(f) => {
                ok += 1;
                assert_eq!(parse_formula(&ast_to_string(&f)).ok(), Some(f), "{s:?}");
            }
            Err(e) => {
                err += 1;
                assert!(erreur_attendue(&e), "{s:?} : {e}");
            }
        }

        let s = rng.chaine(&ensembles, n);
        match parse_set_expression(&s) {
            Ok(x) => {
                ok += 1;
                assert_eq!(parse_set_expression(&x.to_string()).ok(), Some(x), "{s:?}");
            }
            Err(e) => {
                err += 1;
                assert!(erreur_attendue(&e), "{s:?} : {e}");
            }
        }

        let s = rng.chaine(&arith, n);
        match parse_expression(&s) {
            Ok(x) => {
                ok += 1;
                // "(2)/0" s’affiche "2/0" : fraction littérale refusée dès la lecture
                let relu = match parse_expression(&x.to_string()) {
                    Ok(relu) => relu,
                    Err(NoyauError::Domaine(_)) if x.eval_exact().is_err() => continue,
                    Err(e) => panic!("{s:?} -> {x} : {e}"),
                };
                match (x.eval_exact(), relu.eval_exact()) {
                    (Ok(a), Ok(b)) => assert_eq!(a, b, "{s:?} -> {x}"),
                    (Err(_), Err(_)) => {}
                    autre => panic!("{s:?} -> {x} : {autre:?}"),
                }
            }
            Err(e) => {
                err += 1;
                assert!(erreur_attendue(&e), "{s:?} : {e}");
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(ok > 10, "trop peu de succès: {ok}");
    assert!(err > 10, "trop peu d’erreurs: {err}");
}

#[test]
fn fuzz_safe_exact_contre_flottant() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);
    let mut rng = Rng::new(2024);
    let vide = Valeurs::new();
    let mut compares = 0usize;

    for _ in 0..200 {
        budget(t0, max);
        let s = gen_arith(&mut rng, 2).replace('x', "3");
        let e = parse_expression(&s).unwrap_or_else(|err| panic!("{s:?} : {err}"));
        match e.eval_exact() {
            Ok(Some(r)) => {
                let (exact, approche) = (vers_flottant(&r), e.eval(&vide));
                assert!(
                    (exact - approche).abs() <= 1e-9 * (1.0 + exact.abs()),
                    "{s:?} : exact {r} / flottant {approche}"
                );
                compares += 1;
            }
            Ok(None) => {}
            Err(err) => assert!(matches!(err, NoyauError::Domaine(_)), "{s:?} : {err}"),
        }
    }
    assert!(compares > 50, "trop peu de comparaisons: {compares}");
}

fn accepte<T>(r: Result<T, NoyauError>, s: &str) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            assert!(erreur_attendue(&e), "{s:?} : {e}");
            None
        }
    }
}

#[test]
fn fuzz_safe_grands_nombres() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    let mut rng = Rng::new(0x5EED);

    let grands = [
        "99999999999",
        "99999999998",
        "99999999999999999",
        "4294967296",
        "2147483648",
        "9223372036854775807",
        "9223372036854775808",
        "5000000000000000000",
        "1000000000000000000.5",
        "0.000000001",
    ];
    let liants = ["/", "*", " + ", " - ", "-", "^", "x", "x^", "(", ")", "π", "π/", "°", "/-"];

    let taches: Vec<_> = ModeTache::TOUS
        .iter()
        .map(|&m| generate_task(m, Difficulte::Difficile, Some(31)))
        .collect();
    let trig: Vec<_> = (1..12u32).map(|s| generate_trig_task(s, Difficulte::Moyen)).collect();
    let vide = Valeurs::new();

    for _ in 0..400 {
        budget(t0, max);
        let mut s = String::new();
        for k in 0..2 + rng.pick(4) {
            if k > 0 || rng.coin() {
                s.push_str(liants[rng.pick(liants.len())]);
            }
            s.push_str(grands[rng.pick(grands.len())]);
        }

        if let Some(e) = accepte(parse_expression(&s), &s) {
            let _ = accepte(e.eval_exact(), &s);
            let _ = e.eval(&vide);
        }
        let _ = accepte(parse_monome(&s), &s);
        let _ = accepte(parse_polynome(&s), &s);
        let _ = accepte(parse_rational(&s), &s);
        let _ = accepte(parse_exact_value(&s), &s);
        if let Some(a) = accepte(parse_angle(&s), &s) {
            let _ = angle_to_string(&normalize_angle(a));
            let _ = sin_cos_tan_exact(a);
        }

        for t in &taches {
            assert!(!check_answer(t, &s).feedback.is_empty(), "{s:?}");
        }
        for t in &trig {
            assert!(!check_trig_answer(t, &s).feedback.is_empty(), "{s:?}");
        }
    }
}

#[test]
fn fuzz_safe_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = vec!["1/2"; 400].join(" + ");
    budget(t0, max);
    let e = parse_expression(&expr).unwrap_or_else(|err| panic!("err: {err}"));
    assert_eq!(e.eval_exact().ok().flatten().map(|r| r.to_integer()), Some(200));
    budget(t0, max);
}
