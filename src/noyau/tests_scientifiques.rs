//! Tests scientifiques (campagne) : propriétés de bout en bout + déterminisme des générateurs.
//!
//! But : vérifier le contrat public du noyau tel qu’un appelant le voit.
//! - logique : transformations sans ⇒/⇔, équivalence par table de vérité
//! - ensembles : identités classiques, inclusion, disjonction
//! - trigonométrie : angles, valeurs exactes, aller-retour texte
//! - générateurs : même graine => même tâche, graine suivante chaînable
//! - budget temps global (pas de gel sur les balayages de graines)

use std::time::{Duration, Instant};

use super::angle::Angle;
use super::taches::ModeTache;
use super::valeur_exacte::ValeurExacte;
use super::*;

fn f(s: &str) -> Formule {
    parse_formula(s).unwrap_or_else(|e| panic!("parse_formula({s:?}) erreur: {e}"))
}

fn e(s: &str) -> EnsembleExpr {
    parse_set_expression(s).unwrap_or_else(|err| panic!("parse_set_expression({s:?}) erreur: {err}"))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

const NIVEAUX: [Difficulte; 3] = [Difficulte::Facile, Difficulte::Moyen, Difficulte::Difficile];

const FORMULES: [&str; 8] = [
    "A ⇒ B",
    "A ⇔ B",
    "(A ⇒ B) ⇔ (¬B ⇒ ¬A)",
    "¬(A ∧ (B ⇒ C))",
    "(A ⇔ B) ⇔ C",
    "A ∨ ¬A",
    "(A ⇒ B) ∧ (B ⇒ C) ⇒ (A ⇒ C)",
    "¬¬A ∧ (B ∨ C ⇔ A)",
];

/* ------------------------ Logique ------------------------ */

#[test]
fn sci_elimination_des_implications() {
    for s in FORMULES {
        let x = f(s);
        let y = eliminate_implications(&x);
        assert!(!contains_implication(&y) && !contains_iff(&y), "{s:?} -> {y}");
        assert!(truth_table_equality(&x, &y).equal, "{s:?} -> {y}");
    }
}

#[test]
fn sci_elimination_des_equivalences_seules() {
    for s in FORMULES {
        let x = f(s);
        let y = eliminate_iff_only(&x);
        assert!(!contains_iff(&y), "{s:?} -> {y}");
        assert!(truth_table_equality(&x, &y).equal, "{s:?} -> {y}");
    }
    // ⇒ conservé
    assert!(contains_implication(&eliminate_iff_only(&f("A ⇒ B"))));
}

#[test]
fn sci_de_morgan() {
    for s in FORMULES {
        let x = f(s);
        let y = negate_with_de_morgan(&x);
        assert!(!contains_implication(&y) && !contains_iff(&y), "{s:?} -> {y}");
        assert!(truth_table_equality(&Formule::not(x), &y).equal, "{s:?} -> {y}");
    }
}

#[test]
fn sci_saisie_et_curseur() {
    let n = normalize_with_cursor("A -> B", 4);
    assert_eq!(n.value, "A ⇒ B");
    assert_eq!(n.cursor, 3);
}

#[test]
fn sci_tables_de_verite() {
    let t = truth_table(&f("B ∨ A"));
    assert_eq!(t.variables, vec!['A', 'B']);
    assert_eq!(t.rows.len(), 4);
    assert_eq!(t.rows.iter().filter(|l| l.result).count(), 3);

    assert!(are_equivalent("A ⇒ B", "¬A ∨ B").unwrap());
    assert!(!are_equivalent("A∧B", "A∨B").unwrap());
    assert!(are_equivalent("A -> B", "!A | B").is_ok());
    assert!(matches!(are_equivalent("A ∧", "A"), Err(NoyauError::Syntaxe(_))));
}

/* ------------------------ Ensembles ------------------------ */

#[test]
fn sci_identites_ensemblistes() {
    let paires = [
        ("(A∩B)^c", "A^c∪B^c"),
        ("(A∪B)^c", "A^c∩B^c"),
        ("A∖B", "A∩B^c"),
        ("AΔB", "(A∖B)∪(B∖A)"),
        ("A∩A^c", "∅"),
        ("A∪A^c", "Ω"),
    ];
    for (l, r) in paires {
        assert!(are_set_expr_equivalent(&e(l), &e(r)), "{l} ≢ {r}");
    }
    assert!(!are_set_expr_equivalent(&e("A∖B"), &e("B∖A")));

    assert!(is_subset(&e("A∩B"), &e("A")));
    assert!(is_disjoint(&e("A"), &e("A^c")));
    assert!(!is_disjoint(&e("A"), &e("B")));
}

#[test]
fn sci_masques_et_affichage_ensembles() {
    let noms = ['A', 'B'];
    let m = compute_region_mask_from_expr(&e("A∪B"), &noms).unwrap();
    assert_eq!(m.count_ones(), 3);
    assert_eq!(truth_table_set(&e("A∪B"), &noms).rows.len(), 4);
    for s in ["(A∩B)^c", "A∖(B∪C)", "AΔB∪C", "A^c^c"] {
        let x = e(s);
        assert_eq!(e(&set_expr_to_string(&x)), x, "{s:?}");
    }
}

/* ------------------------ Trigonométrie exacte ------------------------ */

#[test]
fn sci_angles() {
    assert_eq!(parse_angle("π/6").unwrap(), Angle::Rad { p: 1, q: 6 });
    assert_eq!(normalize_angle(Angle::Deg(-30.0)), Angle::Deg(330.0));
    assert!(angles_equal(Angle::Rad { p: 1, q: 6 }, Angle::Deg(390.0)));
}

#[test]
fn sci_valeurs_exactes_angles_speciaux() {
    let t = sin_cos_tan_exact(parse_angle("π/6").unwrap());
    assert_eq!(format_exact(&t.sin), "1/2");
    assert!(t.exact);

    let t = sin_cos_tan_exact(parse_angle("3π/4").unwrap());
    assert_eq!(format_exact(&t.sin), "sqrt(2)/2");
    assert_eq!(format_exact(&t.cos), "-sqrt(2)/2");

    assert_eq!(sin_cos_tan_exact(parse_angle("π/2").unwrap()).tan, ValeurExacte::Undef);

    // périodicité et parité, lues sur les valeurs exactes
    for (a, b) in [("π/4", "9π/4"), ("π/3", "7π/3"), ("-π/6", "11π/6"), ("30°", "-330°")] {
        let (x, y) = (
            sin_cos_tan_exact(parse_angle(a).unwrap()),
            sin_cos_tan_exact(parse_angle(b).unwrap()),
        );
        assert_eq!(x, y, "{a} / {b}");
    }
    for k in 1..12 {
        let plus = sin_cos_tan_exact(Angle::Rad { p: k, q: 6 });
        let moins = sin_cos_tan_exact(Angle::Rad { p: -k, q: 6 });
        assert_eq!(moins.sin, plus.sin.neg(), "sin(-{k}π/6)");
        assert_eq!(moins.cos, plus.cos, "cos(-{k}π/6)");
    }
}

#[test]
fn sci_repli_approche_signale() {
    let t = sin_cos_tan_exact(Angle::Deg(10.0));
    assert!(!t.exact);
    assert!((t.sin.approx() - 10f64.to_radians().sin()).abs() < 1e-9);
}

#[test]
fn sci_valeurs_exactes_texte() {
    let v = parse_exact_value("sqrt(3)/2").unwrap();
    assert_eq!(
        v,
        ValeurExacte::Sqrt {
            n: 3,
            sign: 1,
            over_two: true
        }
    );
    assert_eq!(parse_exact_value(&format_exact(&v)).unwrap(), v);
    assert_eq!(
        tan_from_exact(&parse_exact_value("1/2").unwrap(), &v),
        parse_exact_value("sqrt(3)/3").unwrap()
    );
}

#[test]
fn sci_rationnels_aller_retour() {
    for (n, d) in [(0, 1), (3, 4), (-7, 2), (22, 7), (i64::MAX, 3), (-1, 1_000_000)] {
        let r = Rationnel::new(n, d);
        assert_eq!(parse_rational(&rational_to_string(&r)).unwrap(), r, "{n}/{d}");
    }
    assert!(matches!(parse_rational("1/0"), Err(NoyauError::Domaine(_))));
}

/* ------------------------ Déterminisme des générateurs ------------------------ */

#[test]
fn sci_determinisme_sophismes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    for d in NIVEAUX {
        for seed in (1..2000u32).step_by(37) {
            budget(t0, max);
            let a = generate_fallacy_rule(seed, d);
            let b = generate_fallacy_rule(seed, d);
            assert_eq!(a.regle, b.regle);
            assert_eq!(a.options, b.options);
            assert_eq!(a.feedback, b.feedback, "graine {seed}");
        }
    }
}

#[test]
fn sci_determinisme_taches() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);
    for mode in ModeTache::TOUS {
        for d in NIVEAUX {
            let mut seed = 2024u32;
            for _ in 0..25 {
                budget(t0, max);
                let a = generate_task(mode, d, Some(seed));
                assert_eq!(a, generate_task(mode, d, Some(seed)), "{mode} {d} graine {seed}");
                assert_ne!(a.next_seed, seed);
                let r = check_answer(&a, &a.payload.reponse_attendue());
                assert!(r.correct, "{mode} {d} graine {seed} : {} -> {}", a.prompt, r.feedback);
                seed = a.next_seed;
            }
        }
    }
}

#[test]
fn sci_determinisme_trig() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    for d in NIVEAUX {
        let mut seed = 7u32;
        for _ in 0..40 {
            budget(t0, max);
            let a = generate_trig_task(seed, d);
            assert_eq!(a, generate_trig_task(seed, d), "{d} graine {seed}");
            seed = a.next_seed;
        }
    }
}

#[test]
fn sci_reponse_fausse_refusee_sans_panique() {
    for mode in ModeTache::TOUS {
        let t = generate_task(mode, Difficulte::Moyen, Some(99));
        for saisie in ["", "???", "1/0", "(((", "x^"] {
            let r = check_answer(&t, saisie);
            assert!(!r.correct, "{mode} saisie {saisie:?} acceptée");
            assert!(!r.feedback.is_empty());
        }
    }
    let t = generate_trig_task(99, Difficulte::Difficile);
    assert!(!check_trig_answer(&t, "(((").correct);
}
