// src/noyau/jetons.rs
//
// Tokenisation des expressions arithmétiques (réponses saisies, identités).
// Supporte:
// - entiers, décimaux (lus exactement : 1.25 -> 5/4)
// - fractions littérales sans espaces (ex: 3/2) -> Num(3/2), sauf après une valeur, '*' ou '/'
//   (x/2/3 = (x/2)/3, pas x/(2/3))
// - opérateurs + - * / ^ (et × · ÷ −), exposants ² ³
// - parenthèses ( )
// - π / pi, e
// - fonctions sin cos tan sqrt abs ln exp (√ = sqrt)
// - variables : une lettre ; "xy" est lu x·y (la multiplication implicite est faite en RPN)

use num_traits::Zero;

use super::erreurs::{NoyauError, Resultat};
use super::rationnel::{rational_to_string, Rationnel};

pub const FONCTIONS: [&str; 7] = ["sin", "cos", "tan", "sqrt", "abs", "ln", "exp"];

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(Rationnel),
    Pi,
    E,

    // Fonction (sin, cos, ...) ou variable (une lettre).
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^
    Neg,   // moins unaire (produit par la RPN, jamais par tokenize)

    LPar,
    RPar,
}

pub fn est_fonction(name: &str) -> bool {
    FONCTIONS.contains(&name)
}

pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' | '[' => Some(Tok::LPar),
            ')' | ']' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' | '−' => Some(Tok::Minus),
            '*' | '×' | '·' => Some(Tok::Star),
            '/' | '÷' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            'π' => Some(Tok::Pi),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // exposants unicode
        if c == '²' || c == '³' {
            out.push(Tok::Caret);
            out.push(Tok::Num(Rationnel::from_integer(if c == '²' { 2 } else { 3 })));
            i += 1;
            continue;
        }

        // Identifiants : fonctions, constantes, sinon lettres isolées
        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect::<String>().to_lowercase();
            decoupe_mot(&word, &mut out);
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (r, suite) = lire_nombre(&chars, i, fraction_permise(out.last()))?;
            i = suite;
            out.push(Tok::Num(r));
            continue;
        }

        return Err(NoyauError::syntaxe(format!(
            "caractère inattendu: '{c}' (position {i})"
        )));
    }

    Ok(out)
}

/// "sinx" -> sin, x ; "pix" -> π, x ; "ab" -> a, b
fn decoupe_mot(word: &str, out: &mut Vec<Tok>) {
    let mut reste = word;
    'mot: while !reste.is_empty() {
        for f in FONCTIONS {
            if let Some(apres) = reste.strip_prefix(f) {
                out.push(Tok::Ident(f.to_string()));
                reste = apres;
                continue 'mot;
            }
        }
        if let Some(apres) = reste.strip_prefix("pi") {
            out.push(Tok::Pi);
            reste = apres;
            continue;
        }
        let mut it = reste.chars();
        if let Some(c) = it.next() {
            out.push(if c == 'e' {
                Tok::E
            } else {
                Tok::Ident(c.to_string())
            });
        }
        reste = it.as_str();
    }
}

/// Une fraction littérale ne doit pas changer l’associativité à gauche de '/' :
/// repliée en tête, après un opérateur additif, '^', '(' ou une fonction.
fn fraction_permise(precedent: Option<&Tok>) -> bool {
    match precedent {
        None => true,
        Some(Tok::Ident(nom)) => est_fonction(nom),
        Some(t) => matches!(t, Tok::Plus | Tok::Minus | Tok::Caret | Tok::LPar),
    }
}

/// Entier, décimal ou fraction littérale a/b (sans espaces).
fn lire_nombre(chars: &[char], mut i: usize, fraction: bool) -> Resultat<(Rationnel, usize)> {
    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let int_str: String = chars[start..i].iter().collect();

    let mut frac_str = String::new();
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            frac_str.push(chars[i]);
            i += 1;
        }
    }

    if int_str.is_empty() && frac_str.is_empty() {
        return Err(NoyauError::syntaxe(format!("nombre invalide (position {start})")));
    }
    if int_str.len() + frac_str.len() > 17 {
        return Err(NoyauError::syntaxe(format!("nombre trop long (position {start})")));
    }

    let echelle = 10i64.pow(frac_str.len() as u32);
    let entier: i64 = if int_str.is_empty() { 0 } else { parse_i64(&int_str)? };
    let frac: i64 = if frac_str.is_empty() { 0 } else { parse_i64(&frac_str)? };
    let mut rat = Rationnel::new(entier * echelle + frac, echelle);

    // fraction immédiate : 12/34 (entiers seulement, pas d’espaces)
    if fraction && frac_str.is_empty() && i + 1 < chars.len() && chars[i] == '/' && chars[i + 1].is_ascii_digit() {
        let start_d = i + 1;
        let mut j = start_d;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        // "3/2.5" : division normale
        if j >= chars.len() || chars[j] != '.' {
            let d_str: String = chars[start_d..j].iter().collect();
            let d = parse_i64(&d_str)?;
            if d.is_zero() {
                return Err(NoyauError::domaine("division par zéro dans une fraction"));
            }
            rat = Rationnel::new(*rat.numer(), d);
            i = j;
        }
    }

    Ok((rat, i))
}

fn parse_i64(s: &str) -> Resultat<i64> {
    s.parse()
        .map_err(|_| NoyauError::syntaxe(format!("nombre invalide: '{s}'")))
}

/// Format utilitaire (debug) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Tok::Num(r) => rational_to_string(r),
            Tok::Pi => "π".to_string(),
            Tok::E => "e".to_string(),
            Tok::Ident(name) => name.clone(),
            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Neg => "neg".to_string(),
            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
