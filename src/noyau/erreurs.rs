// src/noyau/erreurs.rs
//
// Erreurs du noyau (typées, récupérables).
// - Syntaxe : échec de lecture (symbole inconnu, parenthèse manquante, reste non lu, fin prématurée)
// - Domaine : dénominateur nul, division par zéro, radicande négatif

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoyauError {
    #[error("erreur de syntaxe : {0}")]
    Syntaxe(String),

    #[error("erreur de domaine : {0}")]
    Domaine(String),
}

impl NoyauError {
    pub fn syntaxe(msg: impl Into<String>) -> Self {
        NoyauError::Syntaxe(msg.into())
    }

    pub fn domaine(msg: impl Into<String>) -> Self {
        NoyauError::Domaine(msg.into())
    }
}

pub type Resultat<T> = Result<T, NoyauError>;
