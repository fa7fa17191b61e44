// src/noyau/taches/generateurs.rs
//
// Les sept générateurs. Chacun : (Lcg, Difficulte) -> (Brouillon, Lcg).
// Les tirages se font dans un ordre FIXE pour une difficulté donnée ;
// le Lcg rendu est l’état après le dernier tirage (=> next_seed).

use num_traits::{One, Signed, Zero};

use super::monome::Monome;
use super::polynome::Polynome;
use super::{Brouillon, Payload, Structure};
use crate::noyau::alea::Lcg;
use crate::noyau::echantillonnage::DomaineEchantillons;
use crate::noyau::rationnel::{entier, rational_to_string, Rationnel};
use crate::noyau::reglages::Difficulte;

/// Fraction pour un énoncé : négatifs entre parenthèses.
fn frac(r: &Rationnel) -> String {
    if r.is_negative() {
        format!("({})", rational_to_string(r))
    } else {
        rational_to_string(r)
    }
}

/* ------------------------ Arithmétique sur les rationnels ------------------------ */

pub fn arithmetique(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let nb = if d == Difficulte::Difficile { 3 } else { 2 };
    let ops_permis: &[char] = match d {
        Difficulte::Facile => &['+', '-'],
        Difficulte::Moyen => &['+', '-', '×'],
        Difficulte::Difficile => &['+', '-', '×', '÷'],
    };

    let mut g = g;
    let mut termes = Vec::with_capacity(nb);
    let mut ops = Vec::with_capacity(nb - 1);
    for i in 0..nb {
        let (n, suite) = match d {
            Difficulte::Difficile => g.entre_non_nul(-9, 9),
            _ => g.entre(1, 9),
        };
        let (den, suite) = suite.entre(2, 6);
        g = suite;
        termes.push(Rationnel::new(n, den));
        if i + 1 < nb {
            let (op, suite) = g.choisir(ops_permis);
            ops.push(*op);
            g = suite;
        }
    }

    let resultat = evalue_avec_priorites(&termes, &ops);

    let mut ecrit = frac(&termes[0]);
    for (op, t) in ops.iter().zip(&termes[1..]) {
        ecrit.push_str(&format!(" {op} {}", frac(t)));
    }

    let b = Brouillon {
        prompt: format!("Calculer (forme irréductible) : {ecrit}"),
        payload: Payload::Rationnel(resultat),
        explication: format!(
            "× et ÷ d’abord, puis + et − sur un dénominateur commun : {ecrit} = {}.",
            rational_to_string(&resultat)
        ),
    };
    (b, g)
}

/// Priorités usuelles ; les numérateurs tirés sont non nuls (pas de ÷ 0).
fn evalue_avec_priorites(termes: &[Rationnel], ops: &[char]) -> Rationnel {
    let mut valeurs: Vec<Rationnel> = vec![termes[0]];
    let mut additifs: Vec<char> = Vec::new();
    for (op, t) in ops.iter().zip(&termes[1..]) {
        let dernier = valeurs.len() - 1;
        match *op {
            '×' => valeurs[dernier] *= t,
            '÷' if !t.is_zero() => valeurs[dernier] /= t,
            _ => {
                valeurs.push(*t);
                additifs.push(*op);
            }
        }
    }
    let mut acc = valeurs[0];
    for (op, v) in additifs.iter().zip(&valeurs[1..]) {
        if *op == '-' {
            acc -= v;
        } else {
            acc += v;
        }
    }
    acc
}

/* ------------------------ Puissances ------------------------ */

pub fn puissances(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let max = match d {
        Difficulte::Facile => 1,
        Difficulte::Moyen => 3,
        Difficulte::Difficile => 4,
    };
    let (genre, g) = g.entre(0, max);
    let (a, g) = g.entre(2, 6);
    let (b, g) = g.entre(2, 5);
    let (c, g) = g.entre(2, 3);
    let (e, g) = g.entre(1, 4);

    let x = |coef: i64, n: i64| Monome::terme(entier(coef), 'x', entier(n));
    let (ecrit, attendu, regle) = match genre {
        0 => (format!("x^{a} · x^{b}"), x(1, a + b), "x^a · x^b = x^(a+b)"),
        1 => (format!("(x^{a})^{b}"), x(1, a * b), "(x^a)^b = x^(a·b)"),
        2 => (format!("x^{a} / x^{b}"), x(1, a - b), "x^a / x^b = x^(a−b)"),
        3 => (
            format!("({c}x^{a})^{b}"),
            x(c.pow(b as u32), a * b),
            "(c·x^a)^b = c^b · x^(a·b)",
        ),
        _ => (
            format!("(x^{a}y^{e})^{c} / (x^{b}y)"),
            Monome::depuis(entier(1), [('x', entier(a * c - b)), ('y', entier(e * c - 1))]),
            "(x^a y^e)^c = x^(a·c) y^(e·c), puis on soustrait les exposants du dénominateur",
        ),
    };

    let b = Brouillon {
        prompt: format!("Simplifier sous la forme c·x^n (exposants négatifs acceptés) : {ecrit}"),
        explication: format!("{regle} : {ecrit} = {attendu}."),
        payload: Payload::Monome(attendu),
    };
    (b, g)
}

/* ------------------------ Racines et exposants rationnels ------------------------ */

fn radical(q: i64) -> &'static str {
    if q == 3 {
        "∛"
    } else {
        "√"
    }
}

pub fn racines(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let max = match d {
        Difficulte::Facile => 1,
        Difficulte::Moyen => 2,
        Difficulte::Difficile => 3,
    };
    let (genre, g) = g.entre(0, max);
    let (r, g) = g.entre(2, 4);
    let (q, g) = g.entre(2, 3);
    let (p, g) = g.entre(1, 3);
    let (negatif, g) = g.piece();

    let rac = radical(q);
    let b = match genre {
        0 => {
            let base = r.pow(q as u32);
            let negatif = negatif && d == Difficulte::Difficile;
            let valeur = entier(r.pow(p as u32));
            let (expo, valeur) = if negatif {
                (format!("-{p}/{q}"), valeur.recip())
            } else {
                (format!("{p}/{q}"), valeur)
            };
            Brouillon {
                prompt: format!("Calculer : {base}^({expo})"),
                explication: format!(
                    "{base}^(1/{q}) = {r}, donc {base}^({expo}) = {}.",
                    rational_to_string(&valeur)
                ),
                payload: Payload::Rationnel(valeur),
            }
        }
        1 | 2 => {
            let signe = if genre == 2 { -1 } else { 1 };
            let attendu = Monome::terme(Rationnel::one(), 'x', Rationnel::new(signe * p, q));
            let ecrit = if genre == 2 {
                format!("1/{rac}(x^{p})")
            } else {
                format!("{rac}(x^{p})")
            };
            Brouillon {
                prompt: format!("Écrire sous la forme x^r : {ecrit}"),
                explication: format!("ⁿ√(x^p) = x^(p/n) et 1/x^s = x^(−s) : {ecrit} = {attendu}."),
                payload: Payload::Monome(attendu),
            }
        }
        _ => {
            // p/2 + 1/3
            let attendu = Monome::terme(Rationnel::one(), 'x', Rationnel::new(3 * p + 2, 6));
            let ecrit = format!("√(x^{p}) · ∛(x)");
            Brouillon {
                prompt: format!("Écrire sous la forme x^r : {ecrit}"),
                explication: format!("x^({p}/2) · x^(1/3) = x^({p}/2 + 1/3) = {attendu}."),
                payload: Payload::Monome(attendu),
            }
        }
    };
    (b, g)
}

/* ------------------------ Binôme de Newton ------------------------ */

fn binomial(n: i64, k: i64) -> i64 {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

pub fn binome(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let (genre, g) = g.entre(0, 1);
    let (a_tire, g) = g.entre_non_nul(-3, 3);
    let (b, g) = g.entre_non_nul(-5, 5);
    let (n_tire, g) = g.entre(0, 2);

    let (genre, a, n) = match d {
        Difficulte::Facile => (0, 1, 2),
        Difficulte::Moyen => (genre, a_tire.abs(), 2 + n_tire % 2),
        Difficulte::Difficile => (genre, a_tire, 3 + n_tire),
    };
    let (k, g) = g.entre(0, n);

    let coeffs: Vec<Rationnel> = (0..=n)
        .map(|j| entier(binomial(n, j) * a.pow(j as u32) * b.pow((n - j) as u32)))
        .collect();
    let lin = Polynome::new(vec![entier(b), entier(a)]);
    let developpe = Polynome::new(coeffs.clone());

    let b = if genre == 0 {
        Brouillon {
            prompt: format!("Développer et réduire : ({lin})^{n}"),
            explication: format!(
                "Binôme de Newton, (ax + b)^n = Σ C(n,k)·(ax)^k·b^(n−k) : ({lin})^{n} = {developpe}."
            ),
            payload: Payload::Polynome(developpe),
        }
    } else {
        let c = coeffs[k as usize];
        Brouillon {
            prompt: format!("Coefficient de x^{k} dans le développement de ({lin})^{n} ?"),
            explication: format!(
                "C({n},{k})·{a}^{k}·{b}^{} = {}·{}·{} = {}.",
                n - k,
                binomial(n, k),
                a.pow(k as u32),
                b.pow((n - k) as u32),
                rational_to_string(&c)
            ),
            payload: Payload::Rationnel(c),
        }
    };
    (b, g)
}

/* ------------------------ Forme canonique ------------------------ */

pub fn quadratique(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let (a_tire, g) = g.choisir(&[1i64, 2, -1]);
    let (b_tire, g) = g.entre_non_nul(-9, 9);
    let (c, g) = g.entre(-9, 9);

    let (a, b) = match d {
        // h entier
        Difficulte::Facile => (1, 2 * (b_tire.abs() / 2).max(1) * b_tire.signum()),
        Difficulte::Moyen => (1, b_tire),
        Difficulte::Difficile => (*a_tire, b_tire),
    };
    let (ar, br, cr) = (entier(a), entier(b), entier(c));
    let h = -br / (entier(2) * ar);
    let k = cr - br * br / (entier(4) * ar);

    let depart = Polynome::new(vec![cr, br, ar]);
    let attendu = forme_canonique_texte(&ar, &h, &k);

    let b = Brouillon {
        prompt: format!("Mettre sous forme canonique a(x − h)² + k : {depart}"),
        explication: format!(
            "h = −b/(2a) = {}, k = c − b²/(4a) = {} : {depart} = {attendu}.",
            rational_to_string(&h),
            rational_to_string(&k)
        ),
        payload: Payload::Expression {
            attendu,
            domaine: DomaineEchantillons::Reels,
            structure: Some(Structure::FormeCanonique),
        },
    };
    (b, g)
}

fn forme_canonique_texte(a: &Rationnel, h: &Rationnel, k: &Rationnel) -> String {
    let carre = if h.is_zero() {
        "x^2".to_string()
    } else {
        format!("({})^2", Polynome::new(vec![-h, Rationnel::one()]))
    };
    let facteur = if a.is_one() {
        String::new()
    } else if *a == -Rationnel::one() {
        "-".to_string()
    } else {
        rational_to_string(a)
    };
    let constante = if k.is_zero() {
        String::new()
    } else if k.is_negative() {
        format!(" - {}", rational_to_string(&k.abs()))
    } else {
        format!(" + {}", rational_to_string(k))
    };
    format!("{facteur}{carre}{constante}")
}

/* ------------------------ Logarithmes ------------------------ */

const AFFIRMATIONS_LN: [(&str, bool); 7] = [
    ("ln(ab) = ln(a) + ln(b) pour tous a, b > 0", true),
    ("ln(a + b) = ln(a) + ln(b) pour tous a, b > 0", false),
    ("ln(a^n) = n·ln(a) pour tout a > 0", true),
    ("ln(a)/ln(b) = ln(a − b) pour tous a > b > 1", false),
    ("e^(ln a) = a pour tout a > 0", true),
    ("ln(a)·ln(b) = ln(a + b) pour tous a, b > 0", false),
    ("log_b(1) = 0 pour toute base b > 0, b ≠ 1", true),
];

pub fn logarithmes(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let genres: &[u8] = match d {
        Difficulte::Facile => &[0, 2],
        Difficulte::Moyen => &[0, 1, 2],
        Difficulte::Difficile => &[0, 1, 2, 3],
    };
    let (genre, g) = g.choisir(genres);
    let genre = *genre;
    let (base, g) = g.entre(2, 5);
    let (n, g) = g.entre(2, 5);
    let (sous, g) = g.entre(0, 2);
    let (affirmation, g) = g.choisir(&AFFIRMATIONS_LN);
    let (cible, g) = g.entre(2, 20);

    let b = match genre {
        0 => {
            let puissance = base.pow(n as u32);
            let (argument, valeur) = if d == Difficulte::Difficile && sous == 0 {
                (format!("1/{puissance}"), -n)
            } else {
                (puissance.to_string(), n)
            };
            Brouillon {
                prompt: format!("Calculer : log_{base}({argument})"),
                explication: format!(
                    "log_b(b^n) = n et {argument} = {base}^{valeur}, donc log_{base}({argument}) = {valeur}."
                ),
                payload: Payload::Rationnel(entier(valeur)),
            }
        }
        1 => {
            let (depart, attendu, structure, consigne) = match sous {
                0 => (
                    format!("ln(x^{n})"),
                    format!("{n}ln(x)"),
                    Structure::DifferenteDe(format!("ln(x^{n})")),
                    "Simplifier (plus de puissance dans le logarithme)",
                ),
                1 => (
                    "ln(x) + ln(y)".to_string(),
                    "ln(xy)".to_string(),
                    Structure::UnSeulLn,
                    "Écrire avec un seul logarithme",
                ),
                _ => (
                    "ln(x) - ln(y)".to_string(),
                    "ln(x/y)".to_string(),
                    Structure::UnSeulLn,
                    "Écrire avec un seul logarithme",
                ),
            };
            Brouillon {
                prompt: format!("{consigne} (x, y > 0) : {depart}"),
                explication: format!("ln(ab) = ln a + ln b, ln(a/b) = ln a − ln b, ln(a^n) = n ln a : {depart} = {attendu}."),
                payload: Payload::Expression {
                    attendu,
                    domaine: DomaineEchantillons::Positifs,
                    structure: Some(structure),
                },
            }
        }
        2 => {
            let (texte, vrai) = *affirmation;
            Brouillon {
                prompt: format!("Vrai ou faux : {texte}"),
                explication: format!(
                    "« {texte} » est {}.",
                    if vrai { "vraie (propriété du logarithme)" } else { "fausse (le logarithme transforme les produits en sommes, pas les sommes)" }
                ),
                payload: Payload::Booleen(vrai),
            }
        }
        _ => {
            let valeur = (cible as f64).ln() / (base as f64).ln();
            Brouillon {
                prompt: format!("Résoudre {base}^x = {cible} (valeur approchée à 0,01 près)"),
                explication: format!("x = ln({cible})/ln({base}) ≈ {valeur:.4}."),
                payload: Payload::Numerique {
                    valeur,
                    tolerance: 0.0051,
                },
            }
        }
    };
    (b, g)
}

/* ------------------------ Sommes et produits ------------------------ */

pub fn sommes(g: Lcg, d: Difficulte) -> (Brouillon, Lcg) {
    let genres: &[u8] = match d {
        Difficulte::Facile => &[0, 1],
        Difficulte::Moyen => &[0, 1, 2],
        Difficulte::Difficile => &[0, 1, 2, 3],
    };
    let (genre, g) = g.choisir(genres);
    let genre = *genre;
    let (sous, g) = g.entre(0, 3);
    let (n, g) = g.entre(5, 20);
    let (m, g) = g.entre(2, 5);
    let (c, g) = g.entre(2, 9);

    let b = match genre {
        0 => {
            let (terme, valeur, formule) = match sous {
                0 => ("k".to_string(), n * (n + 1) / 2, "Σ k = n(n+1)/2"),
                1 => ("k^2".to_string(), n * (n + 1) * (2 * n + 1) / 6, "Σ k² = n(n+1)(2n+1)/6"),
                2 => ("(2k - 1)".to_string(), n * n, "Σ (2k − 1) = n²"),
                _ => (c.to_string(), c * n, "Σ c = n·c"),
            };
            Brouillon {
                prompt: format!("Calculer : Σ_{{k=1}}^{{{n}}} {terme}"),
                explication: format!("{formule}, ici avec n = {n} : {valeur}."),
                payload: Payload::Rationnel(entier(valeur)),
            }
        }
        1 => {
            let p = 3 + n % 4;
            let (terme, valeur, formule) = if sous % 2 == 0 {
                ("k".to_string(), (1..=p).product::<i64>(), format!("Π k = {p}!"))
            } else {
                (c.to_string(), c.pow(p as u32), format!("Π c = c^{p}"))
            };
            Brouillon {
                prompt: format!("Calculer : Π_{{k=1}}^{{{p}}} {terme}"),
                explication: format!("{formule} = {valeur}."),
                payload: Payload::Rationnel(entier(valeur)),
            }
        }
        2 => {
            let ecrit = format!("{c} + {} + {} + … + {}", 2 * c, 3 * c, n * c);
            let attendus: Vec<String> = ['k', 'i', 'j', 'p']
                .iter()
                .flat_map(|v| {
                    [
                        format!("Σ_{{{v}=1}}^{{{n}}} {c}{v}"),
                        format!("{c}Σ_{{{v}=1}}^{{{n}}} {v}"),
                        format!("Σ_{{{v}=1}}^{{{n}}} {v}·{c}"),
                    ]
                })
                .collect();
            Brouillon {
                prompt: format!("Écrire avec le symbole Σ (ex. Σ_{{k=1}}^{{5}} k) : {ecrit}"),
                explication: format!("Le terme général est {c}k, pour k de 1 à {n} : {}.", attendus[0]),
                payload: Payload::Texte { attendus },
            }
        }
        _ => {
            let debut = m;
            let valeur = (n * (n + 1) - (debut - 1) * debut) / 2;
            Brouillon {
                prompt: format!("Calculer : Σ_{{k={debut}}}^{{{n}}} k"),
                explication: format!(
                    "Σ_{{k=1}}^{{{n}}} k − Σ_{{k=1}}^{{{}}} k = {} − {} = {valeur}.",
                    debut - 1,
                    n * (n + 1) / 2,
                    (debut - 1) * debut / 2
                ),
                payload: Payload::Rationnel(entier(valeur)),
            }
        }
    };
    (b, g)
}
