//! # Shaftcheck CLI
//!
//! Runs a shaft analysis job from a JSON file, or walks through a single
//! load case interactively.
//!
//! ```text
//! shaft_cli --input job.json          # run a job, print the report
//! shaft_cli --template > job.json     # write an example job
//! shaft_cli --units imperial          # interactive demo in in/lbf/ksi
//! ```
//!
//! Set `RUST_LOG=debug` to follow the solver.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;
use structopt::StructOpt;

use shaft_core::calculations::criteria::{FailureCriterion, LoadHistory};
use shaft_core::calculations::endurance::EnduranceInput;
use shaft_core::calculations::fatigue::{CriterionOutcome, FatigueInput, SolveMode};
use shaft_core::fields::{parse_count, parse_field};
use shaft_core::job::{self, JobReport, ShaftJob};
use shaft_core::materials::MaterialInput;
use shaft_core::{AnalysisSettings, ShaftAnalysis, UnitSystem};

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "shaft_cli",
    about = "Bearing reactions, moment diagrams and fatigue sizing of a two-bearing shaft"
)]
struct Options {
    /// JSON job file to run
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,

    /// Print an example job and exit
    #[structopt(long)]
    template: bool,

    /// Print only the JSON report
    #[structopt(long)]
    json: bool,

    /// Unit system of the interactive demo (si or imperial)
    #[structopt(short, long, default_value = "si")]
    units: String,
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_str(prompt)
        .and_then(|text| parse_field("value", &text).ok())
        .unwrap_or(default)
}

fn prompt_str(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from_args();
    debug!("{:?}", options);

    if options.template {
        println!("{}", ShaftJob::example().to_json()?);
        return Ok(());
    }

    match &options.input {
        Some(path) => run_job_file(path, options.json),
        None => {
            let units = UnitSystem::from_str_flexible(&options.units)
                .ok_or_else(|| anyhow!("unknown unit system '{}'", options.units))?;
            run_interactive(units)
        }
    }
}

fn run_job_file(path: &Path, json_only: bool) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let job = ShaftJob::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    let report = job::run(&job).with_context(|| format!("running job '{}'", job.meta.label))?;

    if !json_only {
        print_report(&report);
        println!();
        println!("JSON Output:");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_interactive(units: UnitSystem) -> Result<()> {
    let labels = units.labels();
    println!("Shaftcheck CLI - Shaft Statics and Fatigue");
    println!("==========================================");
    println!("Units: {}", units);
    println!();

    let length = prompt_f64(&format!("Shaft length ({}) [1.0]: ", labels.length), 1.0);
    let support_a = prompt_f64(&format!("Bearing A position ({}) [0.0]: ", labels.length), 0.0);
    let support_b = prompt_f64(
        &format!("Bearing B position ({}) [{}]: ", labels.length, length),
        length,
    );
    let load_count = match prompt_str("Number of loads [1]: ") {
        Some(text) => parse_count("load_count", &text)?,
        None => 1,
    };

    let mut analysis = ShaftAnalysis::new(AnalysisSettings::with_units(units));
    analysis.start(length, load_count, support_a, support_b)?;
    let mut rx = length / 2.0;
    for index in 0..load_count {
        println!("Load {}:", index + 1);
        let fy = prompt_f64(&format!("  Fy ({}) [-1000.0]: ", labels.force), -1000.0);
        let fz = prompt_f64(&format!("  Fz ({}) [0.0]: ", labels.force), 0.0);
        rx = prompt_f64(&format!("  Position ({}) [{}]: ", labels.length, rx), rx);
        let ry = prompt_f64(&format!("  Arm ry ({}) [0.0]: ", labels.length), 0.0);
        let rz = prompt_f64(&format!("  Arm rz ({}) [0.05]: ", labels.length), 0.05);
        analysis
            .add_load(index, fy, fz, rx, ry, rz)
            .with_context(|| format!("load {}", index + 1))?;
    }

    let section = prompt_f64(
        &format!("Section to check ({}) [{}]: ", labels.length, rx),
        rx,
    );
    let sample = analysis.inspect(section)?;

    println!();
    println!("═══════════════════════════════════════");
    println!("  SHAFT DIAGRAMS");
    println!("═══════════════════════════════════════");
    if let Some(diagrams) = analysis.diagrams() {
        let [_, ay, az] = diagrams.reactions.a;
        let [_, by, bz] = diagrams.reactions.b;
        println!("  A = ({:.1}, {:.1}) {}", ay, az, labels.force);
        println!("  B = ({:.1}, {:.1}) {}", by, bz, labels.force);
        println!("  max|Mh| = {:.2} {}", diagrams.max_abs_mh, labels.moment);
        println!("  max|Mv| = {:.2} {}", diagrams.max_abs_mv, labels.moment);
        println!("  max|Mt| = {:.2} {}", diagrams.field.max_abs_torque(), labels.moment);
    }
    println!(
        "  At x = {:.4}: Mr = {:.2}, Mt = {:.2} {}",
        sample.x, sample.mr, sample.mt, labels.moment
    );
    println!();

    let criterion = prompt_str("Criterion [ASME-Elliptic]: ")
        .map(|name| {
            FailureCriterion::from_str_flexible(&name).ok_or_else(|| anyhow!("unknown criterion '{}'", name))
        })
        .transpose()?
        .unwrap_or(FailureCriterion::AsmeElliptic);
    let material = prompt_str("Material [SAE 1045 LF]: ").unwrap_or_else(|| "SAE 1045 LF".to_string());
    let se = prompt_f64(&format!("Endurance limit Se ({}) [200.0]: ", labels.stress), 200.0);
    let target = prompt_f64("Target safety factor [2.0]: ", 2.0);

    let input = FatigueInput::new(
        SolveMode::Diameter { safety_factor: target },
        MaterialInput::catalog(material),
        LoadHistory::rotating_shaft(&sample),
    )
    .with_endurance(EnduranceInput::Direct { se });

    analysis.select_criterion(criterion)?;
    let outcome = CriterionOutcome::from_result(criterion, analysis.evaluate(&input).cloned());

    println!();
    print_outcome(&outcome, units);
    println!();
    println!("JSON Output:");
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn print_report(report: &JobReport) {
    let labels = report.units.labels();
    let title = report_title(report);
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
    println!("  Reactions A: {:?} {}", report.reactions.a, labels.force);
    println!("  Reactions B: {:?} {}", report.reactions.b, labels.force);
    println!("  max|Mh| = {:.2} {}", report.max_abs_mh, labels.moment);
    println!("  max|Mv| = {:.2} {}", report.max_abs_mv, labels.moment);
    println!("  max|Mt| = {:.2} {}", report.max_abs_torque, labels.moment);
    println!(
        "  Peak Mr = {:.2} {} at x = {:.4} {}",
        report.peak.mr, labels.moment, report.peak.x, labels.length
    );
    println!(
        "  Section x = {:.4}: Mr = {:.2}, Mt = {:.2}",
        report.inspected.x, report.inspected.mr, report.inspected.mt
    );
    println!();
    for outcome in &report.outcomes {
        print_outcome(outcome, report.units);
    }
}

fn report_title(report: &JobReport) -> &str {
    if report.meta.label.is_empty() {
        "SHAFT JOB"
    } else {
        report.meta.label.as_str()
    }
}

fn print_outcome(outcome: &CriterionOutcome, units: UnitSystem) {
    let labels = units.labels();
    match (&outcome.result, &outcome.error) {
        (Some(result), _) => {
            let note = if result.neutral_fallback {
                "  [Marin factors ignored]"
            } else {
                ""
            };
            println!(
                "  {:<14} CS = {:.3}  d = {:.5} {}{}",
                outcome.criterion.display_name(),
                result.safety_factor,
                result.diameter,
                labels.length,
                note
            );
        }
        (None, Some(error)) => {
            println!(
                "  {:<14} [{}] {}",
                outcome.criterion.display_name(),
                error.error_code(),
                error
            );
        }
        (None, None) => {}
    }
}
