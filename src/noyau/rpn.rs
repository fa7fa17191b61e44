// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - si name ∈ FONCTIONS => fonction unaire (postfixée en RPN)
//    - sinon => variable (Expr::Var)
// - Moins unaire : opérateur préfixe Neg (sous ^, au-dessus de * /) : -x^2 = -(x^2), 2^-1 = 2^(-1)
// - Multiplication implicite : valeur suivie d’un début de valeur => '*' injecté (2x, 3√2, x(x+1))
// - Fonction sans parenthèse : s’applique à l’atome qui suit (√2+1 = (√2)+1)

use super::erreurs::{NoyauError, Resultat};
use super::expr::Expr;
use super::jetons::{est_fonction, Tok};
use super::rationnel::Rationnel;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret | Tok::Neg)
}

fn est_fonction_tok(t: &Tok) -> bool {
    matches!(t, Tok::Ident(name) if est_fonction(name))
}

fn debute_valeur(t: &Tok) -> bool {
    matches!(t, Tok::Num(_) | Tok::Pi | Tok::E | Tok::Ident(_) | Tok::LPar)
}

/// Dépile les opérateurs binaires qui doivent sortir avant `tok`.
fn depile_pour(tok: &Tok, ops: &mut Vec<Tok>, out: &mut Vec<Tok>) {
    while let Some(top) = ops.last() {
        if matches!(top, Tok::LPar) || est_fonction_tok(top) {
            break;
        }
        let p_top = precedence(top);
        let p_tok = precedence(tok);
        let doit_pop = if is_right_associative(tok) {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };
        if !doit_pop {
            break;
        }
        if let Some(op) = ops.pop() {
            out.push(op);
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Pi, Slash, Num(2), RPar]
///   rpn:    [Pi, Num(2), Slash, Ident("sin")]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    let mut prev_was_value = false;
    // fonction qui vient d’être lue, sans '(' derrière (encore)
    let mut fonction_nue = false;

    for tok in tokens.iter().cloned() {
        if prev_was_value && debute_valeur(&tok) {
            depile_pour(&Tok::Star, &mut ops, &mut out);
            ops.push(Tok::Star);
            prev_was_value = false;
        }

        match tok {
            Tok::Num(_) | Tok::Pi | Tok::E => {
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Ident(ref name) if est_fonction(name) => {
                ops.push(tok);
                prev_was_value = false;
                fonction_nue = true;
                continue;
            }

            Tok::Ident(_) => {
                out.push(tok);
                prev_was_value = true;
            }

            Tok::LPar => {
                ops.push(tok);
                prev_was_value = false;
                fonction_nue = false;
                continue;
            }

            Tok::RPar => {
                let mut ouvrante = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ouvrante = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouvrante {
                    return Err(NoyauError::syntaxe("parenthèse fermante sans ouvrante"));
                }
                if ops.last().is_some_and(est_fonction_tok) {
                    if let Some(f) = ops.pop() {
                        out.push(f);
                    }
                }
                prev_was_value = true;
            }

            Tok::Minus | Tok::Plus if !prev_was_value => {
                // signe unaire : '+' ignoré, '-' devient Neg (préfixe, ne dépile rien)
                if matches!(tok, Tok::Minus) {
                    ops.push(Tok::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    return Err(NoyauError::syntaxe(format!(
                        "opérande manquant avant '{}'",
                        symbole(&tok)
                    )));
                }
                depile_pour(&tok, &mut ops, &mut out);
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Neg => return Err(NoyauError::syntaxe("jeton Neg inattendu")),
        }

        // fonction nue : elle prend l’atome qu’on vient de sortir
        if fonction_nue && prev_was_value {
            if let Some(f) = ops.pop() {
                out.push(f);
            }
        }
        fonction_nue = false;
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(NoyauError::syntaxe("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

fn symbole(t: &Tok) -> &'static str {
    match t {
        Tok::Plus => "+",
        Tok::Minus => "-",
        Tok::Star => "*",
        Tok::Slash => "/",
        Tok::Caret => "^",
        _ => "?",
    }
}

/// Construit une Expr à partir d’une RPN.
pub fn from_rpn(rpn: &[Tok]) -> Resultat<Expr> {
    let invalide = || NoyauError::syntaxe("expression incomplète");
    let mut st: Vec<Expr> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(r) => st.push(Expr::Rat(r)),
            Tok::Pi => st.push(Expr::Pi),
            Tok::E => st.push(Expr::E),

            Tok::Neg => {
                let x = st.pop().ok_or_else(invalide)?;
                st.push(Expr::Sub(Box::new(Expr::Rat(Rationnel::from_integer(0))), Box::new(x)));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let b = Box::new(st.pop().ok_or_else(invalide)?);
                let a = Box::new(st.pop().ok_or_else(invalide)?);

                st.push(match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                });
            }

            Tok::Ident(name) => {
                if est_fonction(&name) {
                    let x = Box::new(st.pop().ok_or_else(|| {
                        NoyauError::syntaxe(format!("fonction {name} sans argument"))
                    })?);
                    st.push(match name.as_str() {
                        "sqrt" => Expr::Sqrt(x),
                        "sin" => Expr::Sin(x),
                        "cos" => Expr::Cos(x),
                        "tan" => Expr::Tan(x),
                        "abs" => Expr::Abs(x),
                        "ln" => Expr::Ln(x),
                        _ => Expr::Exp(x),
                    });
                } else {
                    st.push(Expr::Var(name));
                }
            }

            Tok::LPar | Tok::RPar => {
                return Err(NoyauError::syntaxe("parenthèse inattendue en RPN"))
            }
        }
    }

    let e = st.pop().ok_or_else(|| NoyauError::syntaxe("expression vide"))?;
    if !st.is_empty() {
        return Err(invalide());
    }
    Ok(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::jetons::{format_tokens, tokenize};

    fn rpn(s: &str) -> String {
        let t = tokenize(s).unwrap_or_else(|e| panic!("tokenize({s:?}) erreur: {e}"));
        format_tokens(&to_rpn(&t).unwrap_or_else(|e| panic!("to_rpn({s:?}) erreur: {e}")))
    }

    #[test]
    fn priorites() {
        assert_eq!(rpn("1 + 2 * 3"), "1 2 3 * +");
        assert_eq!(rpn("2 ^ 3 ^ 2"), "2 3 2 ^ ^");
        assert_eq!(rpn("8 - 3 - 1"), "8 3 - 1 -");
        assert_eq!(rpn("sin(π / 2)"), "π 2 / sin");
    }

    #[test]
    fn moins_unaire() {
        assert_eq!(rpn("-x^2"), "x 2 ^ neg");
        assert_eq!(rpn("2^-1"), "2 1 neg ^");
        assert_eq!(rpn("-2*3"), "2 neg 3 *");
        assert_eq!(rpn("+4"), "4");
    }

    #[test]
    fn implicite_et_fonction_nue() {
        assert_eq!(rpn("2x"), "2 x *");
        assert_eq!(rpn("x(x+1)"), "x x 1 + *");
        assert_eq!(rpn("√2 + 1"), "2 sqrt 1 +");
        assert_eq!(rpn("3√2"), "3 2 sqrt *");
        assert_eq!(rpn("2sin(x)"), "2 x sin *");
    }

    #[test]
    fn erreurs_parentheses() {
        let t = tokenize("(1 + 2").unwrap();
        assert!(to_rpn(&t).is_err());
        let t = tokenize("1 + 2)").unwrap();
        assert!(to_rpn(&t).is_err());
        let t = tokenize("* 3").unwrap();
        assert!(to_rpn(&t).is_err());
    }
}
