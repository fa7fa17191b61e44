// src/main.rs
//
// Entraîneur Q-pur : front-end terminal
// -------------------------------------
//   entraineur <mode> [--seed N] [--difficulte D] [--verbose]
//
// Un tour : énoncé affiché, UNE ligne lue sur stdin, correction + graine suivante.
// Rien n’est sauvegardé (pas de compteurs, pas de fichier).

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use clap::Parser;

use entraineur_qpur::noyau::alea::graine_horloge;
use entraineur_qpur::noyau::sophismes::lire_verdict;
use entraineur_qpur::noyau::{
    check_answer, check_fallacy_answer, check_trig_answer, generate_fallacy_rule, generate_task,
    generate_trig_task, CheckResult, Difficulte, ModeTache, NoyauError,
};

/// Exercice demandé : trigonométrie, sophisme, ou un des modes algébriques.
#[derive(Clone, Copy, Debug)]
enum Exercice {
    Trig,
    Sophisme,
    Algebre(ModeTache),
}

impl FromStr for Exercice {
    type Err = NoyauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trig" | "trigo" => Ok(Exercice::Trig),
            "sophisme" | "sophismes" => Ok(Exercice::Sophisme),
            autre => autre.parse().map(Exercice::Algebre),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Entraîneur Q-pur : un exercice, une réponse, une correction")]
struct Cli {
    /// trig, sophisme, arithmetique, puissances, racines, binome, quadratique, logarithmes, sommes
    #[arg(value_name = "MODE")]
    mode: Exercice,

    /// Graine (sinon : horloge).
    #[arg(long, value_name = "INT")]
    seed: Option<u32>,

    /// facile, moyen, difficile
    #[arg(long, value_name = "NIVEAU", default_value = "facile")]
    difficulte: Difficulte,

    /// Journal détaillé (debug).
    #[arg(long)]
    verbose: bool,
}

fn lire_ligne() -> io::Result<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut ligne = String::new();
    io::stdin().lock().read_line(&mut ligne)?;
    Ok(ligne.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Warn
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let seed = args.seed.unwrap_or_else(graine_horloge);
    log::debug!("args = {args:?} graine = {seed}");

    let (resultat, suivante): (CheckResult, u32) = match args.mode {
        Exercice::Trig => {
            let t = generate_trig_task(seed, args.difficulte);
            println!("{}", t.prompt);
            let saisie = lire_ligne()?;
            (check_trig_answer(&t, &saisie), t.next_seed)
        }
        Exercice::Sophisme => {
            let t = generate_fallacy_rule(seed, args.difficulte);
            println!("{}", t.prompt());
            let saisie = lire_ligne()?;
            let r = match lire_verdict(&t, &saisie) {
                Ok(v) => check_fallacy_answer(&t, v),
                Err(e) => CheckResult {
                    correct: false,
                    feedback: format!("Réponse illisible ({e})."),
                },
            };
            (r, t.next_seed)
        }
        Exercice::Algebre(mode) => {
            let t = generate_task(mode, args.difficulte, Some(seed));
            println!("{}", t.prompt);
            let saisie = lire_ligne()?;
            (check_answer(&t, &saisie), t.next_seed)
        }
    };

    println!("{}", if resultat.correct { "✔" } else { "✘" });
    println!("{}", resultat.feedback);
    println!("graine suivante : {suivante}");
    Ok(())
}
