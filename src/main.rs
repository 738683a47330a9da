use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use triage_grader::grading::Grader;
use triage_grader::output;
use triage_grader::table::SubmissionFormat;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_FORMAT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "triage-grader")]
#[command(about = "Validate and score a daily triage allocation submission", long_about = None)]
#[command(version)]
struct Cli {
    /// Reference patient data (id, health, decline after a header line)
    reference: PathBuf,

    /// Submission file (.csv or .xlsx)
    submission: PathBuf,

    /// Day number the submission is for
    day: u32,

    /// Submission format; detected from the file extension when omitted
    #[arg(long, value_enum)]
    format: Option<SubmissionFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/triage-grader/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON instead of report lines
    #[arg(long)]
    json: bool,

    /// Also save the JSON result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Load config
    let config = match triage_grader::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = triage_grader::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let catalog = config.catalog();
    let scoring = config.effective_scoring();

    if cli.verbose {
        eprintln!("Treatments:");
        for t in catalog.iter() {
            eprintln!(
                "  {} ({:?}): {} per day, efficacy {}",
                t.name, t.kind, t.daily_quantity, t.efficacy
            );
        }
        eprintln!(
            "Scoring: cap {}, death penalty {}, bonus rate {}",
            scoring.health_cap(),
            scoring.death_penalty(),
            scoring.bonus_rate()
        );
    }

    let grader = match Grader::load(
        &cli.reference,
        &cli.submission,
        cli.format,
        catalog,
        scoring,
    ) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Format error: {}", e);
            std::process::exit(EXIT_FORMAT);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} reference patients from {}",
            grader.reference().len(),
            cli.reference.display()
        );
        eprintln!(
            "Loaded {} submission rows from {} (columns: {})",
            grader.submission().len(),
            cli.submission.display(),
            grader.submission().columns().join(", ")
        );
    }

    let use_colors = output::should_use_colors();

    let (exit_code, json) = match grader.grade(cli.day) {
        Ok(breakdown) => {
            let json = output::format_json(&breakdown);
            if cli.json {
                match &json {
                    Ok(j) => println!("{}", j),
                    Err(e) => eprintln!("{:#}", e),
                }
            } else {
                println!("{}", output::format_breakdown(&breakdown, use_colors));
            }
            (EXIT_SUCCESS, json)
        }
        Err(err) => {
            if cli.verbose {
                eprintln!("Rule failed: {}", err.rule());
            }
            let json = output::format_invalid_json(&err);
            if cli.json {
                match &json {
                    Ok(j) => println!("{}", j),
                    Err(e) => eprintln!("{:#}", e),
                }
            } else {
                println!("{}", output::format_invalid(&err, use_colors));
            }
            (EXIT_INVALID, json)
        }
    };

    if let Some(ref path) = cli.output {
        if let Err(e) = json.and_then(|j| output::save_report(path, &j)) {
            eprintln!("Failed to save report: {:#}", e);
        } else if cli.verbose {
            eprintln!("Report saved to {}", path.display());
        }
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(exit_code);
}
