// src/lib.rs
//
// Entraîneur Q-pur : moteurs exacts (logique, ensembles, trigonométrie, exercices).
// Le binaire `entraineur` n’est qu’un front-end terminal au-dessus de `noyau`.

pub mod noyau;
