// src/main.rs
//
// Calculatrice scientifique — point d’entrée ligne de commande
// ------------------------------------------------------------
// - avec des expressions : une ligne de résultat par expression
//   (code de sortie 1 si au moins une erreur)
// - sans : lecture de stdin ligne par ligne (:deg, :rad, :mode, :q)
//
// Le noyau est borné ici, au bord : longueur de saisie, affichage.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use calculatrice_sci::config::{borne_precision, Config};
use calculatrice_sci::constants::APP_NAME;
use calculatrice_sci::noyau::validation::has_max_length;
use calculatrice_sci::noyau::{translate, AngleMode, Calculation, Calculator, Evaluator};
use calculatrice_sci::{logging, ExpressionParser, PrecisionEngine};

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about = "Calculatrice scientifique (deg/rad, haute précision)")]
struct Cli {
    /// Expressions à évaluer (sinon : lecture de stdin)
    expressions: Vec<String>,

    /// Mode d’angle initial
    #[arg(short = 'a', long = "angle", value_parser = ["deg", "rad"])]
    angle: Option<String>,

    /// Chiffres significatifs du moteur (bornés à [64, 200])
    #[arg(short = 'p', long = "precision")]
    precision: Option<usize>,

    /// Fichier de configuration TOML
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Affiche aussi la forme d’affichage de l’expression
    #[arg(short = 'e', long = "echo")]
    echo: bool,

    /// Journal de débogage sur stderr
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config avant le journal : son niveau compte dans la priorité.
    let (config, erreur_config) = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => (c, None),
            Err(e) => (Config::default(), Some(e)),
        },
        None => (Config::default(), None),
    };

    logging::init(cli.debug, config.logging.level.as_deref());

    if let Some(e) = erreur_config {
        tracing::warn!(erreur = %e, "Configuration ignorée, valeurs par défaut");
        eprintln!("{APP_NAME}: {e}");
    }

    let precision = cli.precision.map(borne_precision).unwrap_or(config.precision);
    let mode = match cli.angle.as_deref() {
        Some(token) => match token.parse::<AngleMode>() {
            Ok(m) => m,
            Err(e) => {
                eprintln!("{APP_NAME}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => config.angle_mode,
    };

    tracing::debug!(precision, mode = %mode, "Démarrage");

    let mut calc = Calculator::new(
        ExpressionParser::new(),
        Evaluator::with_mode(PrecisionEngine::new(precision), mode),
    );

    if cli.expressions.is_empty() {
        boucle(&mut calc, cli.echo)
    } else {
        lot(&calc, &cli.expressions, cli.echo)
    }
}

/// Une ligne par expression ; échec si au moins une erreur.
fn lot(calc: &Calculator, expressions: &[String], echo: bool) -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut echec = false;

    for expr in expressions {
        let r = calcule(calc, expr);
        echec |= r.is_error();
        if writeln!(stdout, "{}", ligne(calc, expr, &r, echo)).is_err() {
            return ExitCode::FAILURE;
        }
    }

    if echec {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Lecture interactive (ou en tube) de stdin.
fn boucle(calc: &mut Calculator, echo: bool) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for ligne_lue in stdin.lock().lines() {
        let saisie = match ligne_lue {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(erreur = %e, "Lecture de stdin impossible");
                return ExitCode::FAILURE;
            }
        };
        let saisie = saisie.trim();

        let sortie = match saisie {
            "" => continue,
            ":q" | ":quit" => break,
            ":mode" => calc.angle_mode().to_string(),
            ":deg" | ":rad" => match calc.set_angle_mode(&saisie[1..]) {
                Ok(()) => calc.angle_mode().to_string(),
                Err(e) => Calculation::error(e).to_string(),
            },
            expr => {
                let r = calcule(calc, expr);
                ligne(calc, expr, &r, echo)
            }
        };

        if writeln!(stdout, "{sortie}").is_err() {
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

/// Borne de longueur appliquée par le frontal, puis calcul.
fn calcule(calc: &Calculator, expr: &str) -> Calculation {
    if !has_max_length(expr) {
        tracing::debug!(longueur = expr.chars().count(), "Saisie trop longue");
        return Calculation::error("Expression too long");
    }
    calc.calculate(expr)
}

fn ligne(calc: &Calculator, expr: &str, r: &Calculation, echo: bool) -> String {
    if echo {
        format!("{} = {r}", calc.format_for_display(&translate(expr)))
    } else {
        r.to_string()
    }
}
