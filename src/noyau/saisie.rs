// src/noyau/saisie.rs
//
// Normalisation de saisie (frappe en direct)
// ------------------------------------------
// - Digrammes ASCII -> symboles : ! & | -> <-> '
// - Mots-clés -> symboles (avec frontière de mot) : forall, exists, in, cup/union, ...
// - Le curseur suit les substitutions : chaque site commençant AVANT le curseur
//   d’origine le décale de (remplacement - consommé). Résultat borné à [0, len].
//
// Les positions sont comptées en caractères (pas en octets).

/// Table de substitution : (motif, remplacement, mot-clé ?)
/// Ordre = priorité : les motifs longs avant leurs préfixes.
const SUBSTITUTIONS: &[(&str, &str, bool)] = &[
    ("<->", "⇔", false),
    ("->", "⇒", false),
    ("!", "¬", false),
    ("&", "∧", false),
    ("|", "∨", false),
    ("'", "^c", false),
    ("forall", "∀", true),
    ("exists", "∃", true),
    ("intersect", "∩", true),
    ("union", "∪", true),
    ("infty", "∞", true),
    ("inf", "∞", true),
    ("in", "∈", true),
    ("cup", "∪", true),
    ("cap", "∩", true),
    ("delta", "Δ", true),
    ("empty", "∅", true),
    ("omega", "Ω", true),
    ("sqrt", "√", true),
    ("deg", "°", true),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaisieNormalisee {
    pub value: String,
    pub cursor: usize,
}

/// Normalise `raw` et reporte le curseur `cursor` (index en caractères).
pub fn normalize_with_cursor(raw: &str, cursor: usize) -> SaisieNormalisee {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut decalage: i64 = 0;
    let mut i = 0;

    'scan: while i < chars.len() {
        for (motif, remplacement, mot_cle) in SUBSTITUTIONS {
            let consomme = motif.chars().count();
            if !correspond(&chars, i, motif) {
                continue;
            }
            if *mot_cle && !frontiere_de_mot(&chars, i, consomme) {
                continue;
            }

            out.push_str(remplacement);
            if i < cursor {
                decalage += remplacement.chars().count() as i64 - consomme as i64;
            }
            i += consomme;
            continue 'scan;
        }

        out.push(chars[i]);
        i += 1;
    }

    let longueur = out.chars().count() as i64;
    let curseur = (cursor as i64 + decalage).clamp(0, longueur) as usize;

    SaisieNormalisee {
        value: out,
        cursor: curseur,
    }
}

/// Variante sans curseur (lecture hors éditeur).
pub fn normaliser(raw: &str) -> String {
    normalize_with_cursor(raw, 0).value
}

fn correspond(chars: &[char], i: usize, motif: &str) -> bool {
    let mut k = i;
    for c in motif.chars() {
        if k >= chars.len() || chars[k] != c {
            return false;
        }
        k += 1;
    }
    true
}

fn frontiere_de_mot(chars: &[char], debut: usize, longueur: usize) -> bool {
    let avant_ok = debut == 0 || !chars[debut - 1].is_ascii_alphabetic();
    let fin = debut + longueur;
    let apres_ok = fin >= chars.len() || !chars[fin].is_ascii_alphabetic();
    avant_ok && apres_ok
}
