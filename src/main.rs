//! ZonePlanner CLI Entry Point
//!
//! Provides command-line interface for plan files.
//!
//! # Usage
//!
//! ```bash
//! # Print the workouts of a plan
//! zoneplanner show plan.yaml
//!
//! # Export to the platform's JSON format
//! zoneplanner export plan.yaml --output workouts.json
//!
//! # Convert downloaded workouts back into a plan
//! zoneplanner import workouts.json --config zones.yaml
//!
//! # Date the plan for a race
//! zoneplanner schedule plan.yaml --race-day 2026-05-17 --days 1,3,5
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use colored::Colorize;
use log::{debug, error, info, warn};

use zoneplanner::wire::{decode_workout_lenient, encode_workout, WorkoutDTO};
use zoneplanner::workout::writer::{format_duration, format_end_condition};
use zoneplanner::workout::{
    parse_date, validate_workout, DslWriter, PlanFile, StepKind, TrainingPlanner, Workout, WorkoutStep,
};
use zoneplanner::zones::{ZoneConfig, ZoneResolver};
use zoneplanner::{APP_NAME, VERSION};

/// Indentation per nesting level in `show` output.
const TREE_INDENT: &str = "  ";

/// Subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show,
    Export,
    Import,
    Schedule,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(Self::Show),
            "export" => Ok(Self::Export),
            "import" => Ok(Self::Import),
            "schedule" => Ok(Self::Schedule),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Show => "show",
            Self::Export => "export",
            Self::Import => "import",
            Self::Schedule => "schedule",
        };
        f.write_str(name)
    }
}

/// Command-line configuration parsed from arguments.
#[derive(Debug, Default)]
struct Config {
    command: Option<Command>,
    input_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    dist_to_time: bool,
    race_day: Option<String>,
    days: Option<Vec<u8>>,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    eprintln!();
    eprintln!("{} v{}", APP_NAME.bold(), VERSION);
    eprintln!("Zone-Based Workout Authoring");
    eprintln!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: zoneplanner [OPTIONS] <COMMAND> <FILE>");
    println!();
    println!("Commands:");
    println!("  show                Print the workouts of a plan file");
    println!("  export              Convert a plan file to platform JSON");
    println!("  import              Convert platform JSON to a plan file");
    println!("  schedule            Assign dates to the workouts of a plan file");
    println!();
    println!("Options:");
    println!("  --config PATH       Zone configuration YAML (default: built-in zones)");
    println!("  --output PATH       Write the result to PATH instead of stdout");
    println!("  --dist-to-time      Convert distance steps with a pace target to time");
    println!("  --race-day DATE     Race date for schedule (YYYY-MM-DD)");
    println!("  --days LIST         Training days for schedule, 0 = Monday (default: 1,3,5)");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
    println!();
    println!("Examples:");
    println!("  zoneplanner show plan.yaml --config zones.yaml");
    println!("  zoneplanner export plan.yaml --dist-to-time --output workouts.json");
    println!("  zoneplanner schedule plan.yaml --race-day 2026-05-17 --days 0,2,5");
}

/// Parses a comma separated list of weekday numbers.
fn parse_days(text: &str) -> Result<Vec<u8>, String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>().map_err(|_| format!("Invalid day: {}", part)))
        .collect()
}

/// Returns the value following an option.
fn option_value<'a>(args: &'a [String], i: &mut usize, option: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires an argument", option))
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut positional_index = 0;
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--dist-to-time" => {
                config.dist_to_time = true;
            }
            "--config" | "-c" => {
                config.config_path = Some(PathBuf::from(option_value(args, &mut i, arg)?));
            }
            "--output" | "-o" => {
                config.output_path = Some(PathBuf::from(option_value(args, &mut i, arg)?));
            }
            "--race-day" => {
                config.race_day = Some(option_value(args, &mut i, arg)?.to_string());
            }
            "--days" => {
                config.days = Some(parse_days(option_value(args, &mut i, arg)?)?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                // Positional argument
                match positional_index {
                    0 => config.command = Some(arg.parse()?),
                    1 => config.input_path = Some(PathBuf::from(arg)),
                    _ => return Err(format!("Unexpected argument: {}", arg)),
                }
                positional_index += 1;
            }
        }
        i += 1;
    }

    if config.command.is_none() {
        return Err("Missing command".to_string());
    }
    if config.input_path.is_none() {
        return Err("Missing input file".to_string());
    }

    Ok(config)
}

/// Loads the zone configuration, falling back to the built-in zones.
fn load_zone_config(path: Option<&Path>) -> Result<ZoneConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        info!("Using built-in zones");
        return Ok(ZoneConfig::default());
    };

    let config = ZoneConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Writes command output to a file, or stdout when no path is given.
fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            fs::write(path, content).map_err(|e| format!("Could not write '{}': {}", path.display(), e))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Loads a plan file and parses its workouts, logging DSL warnings.
fn load_workouts(path: &Path, zones: &ZoneConfig) -> Result<(PlanFile, Vec<Workout>), Box<dyn std::error::Error>> {
    let plan = PlanFile::load(path)?;
    let (workouts, warnings) = plan.build_workouts(zones);

    for warning in &warnings {
        warn!("{}", warning);
    }
    info!("Plan loaded: {} workouts, {} warnings", workouts.len(), warnings.len());

    Ok((plan, workouts))
}

fn print_step(writer: &DslWriter<'_>, workout: &Workout, step: &WorkoutStep, depth: usize) {
    let indent = TREE_INDENT.repeat(depth + 1);

    match &step.kind {
        StepKind::Repeat(group) => {
            println!("{}{} {}x", indent, "repeat".magenta().bold(), group.iterations);
            for child in &group.steps {
                print_step(writer, workout, child, depth + 1);
            }
        }
        StepKind::Leaf(leaf) => {
            let mut line = format!(
                "{}{} {}",
                indent,
                format!("{:<9}", leaf.step_type.key()).green(),
                format_end_condition(&leaf.end)
            );
            if let Some(target) = writer.format_target(workout.sport_type, &leaf.target) {
                line.push_str(&format!(" @ {}", target.yellow()));
            }
            if !leaf.description.is_empty() {
                line.push_str(&format!(" {}", leaf.description.dimmed()));
            }
            println!("{}", line);
        }
    }
}

fn show(workouts: &[Workout], zones: &ZoneConfig) {
    let writer = DslWriter::with_labels(zones);

    for workout in workouts {
        let date = workout
            .scheduled_date
            .map(|date| date.format("%a %Y-%m-%d").to_string())
            .unwrap_or_else(|| "unscheduled".to_string());
        let duration = workout
            .estimated_duration()
            .map(|seconds| format!(", ~{}", format_duration(seconds)))
            .unwrap_or_default();

        println!(
            "{} ({}, {}{})",
            workout.name.cyan().bold(),
            workout.sport_type,
            date,
            duration
        );
        if let Some(description) = &workout.description {
            println!("{}{}", TREE_INDENT, description.dimmed());
        }
        for step in &workout.steps {
            print_step(&writer, workout, step, 0);
        }
        println!();
    }
}

fn export(
    plan: &PlanFile,
    workouts: &mut [Workout],
    zones: &ZoneConfig,
    dist_to_time: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut invalid = 0;

    for workout in workouts.iter_mut() {
        if dist_to_time {
            let converted = workout.dist_to_time();
            debug!("Converted {} distance steps in '{}'", converted, workout.name);
        }
        if let Err(errors) = validate_workout(workout) {
            for e in errors {
                error!("{}: {}", workout.name, e);
            }
            invalid += 1;
        }
    }

    if invalid > 0 {
        return Err(format!("{} workouts failed validation", invalid).into());
    }

    let dtos: Vec<WorkoutDTO> = workouts
        .iter()
        .map(|workout| {
            let mut dto = encode_workout(workout);
            dto.workout_name = plan.export_name(&dto.workout_name, zones);
            dto
        })
        .collect();

    info!("Exported {} workouts", dtos.len());
    Ok(serde_json::to_string_pretty(&dtos)?)
}

fn import(path: &Path, zones: &ZoneConfig) -> Result<String, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("Could not read '{}': {}", path.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    let resolver = ZoneResolver::new(zones);
    let mut workouts = Vec::with_capacity(items.len());

    for item in &items {
        let (mut workout, skipped) = decode_workout_lenient(item)?;
        for e in skipped {
            warn!("{}: skipped step: {}", workout.name, e);
        }
        let labelled = workout.resolve_labels(&resolver);
        debug!("'{}': {} targets matched a zone", workout.name, labelled);
        workouts.push(workout);
    }

    info!("Imported {} workouts", workouts.len());
    Ok(PlanFile::from_workouts(&workouts).to_yaml_string()?)
}

fn schedule(
    mut plan: PlanFile,
    mut workouts: Vec<Workout>,
    zones: &ZoneConfig,
    race_day: Option<&str>,
    days: Option<&[u8]>,
) -> Result<String, Box<dyn std::error::Error>> {
    let race_day = race_day.unwrap_or(zones.planning.race_day.as_str());
    if race_day.trim().is_empty() {
        return Err("No race day given: use --race-day or planning.race_day".into());
    }

    let days = days.unwrap_or(zones.planning.preferred_days.as_slice());
    let planner = TrainingPlanner::new(parse_date(race_day)?).with_preferred_days(days)?;
    info!("Race day: {}", planner.race_day().format("%a %Y-%m-%d"));

    let scheduled = planner.schedule_all(&mut workouts)?;

    for (entry, workout) in plan.workouts.iter_mut().zip(&workouts) {
        entry.date = workout.scheduled_date;
    }

    info!("Scheduled {} of {} workouts", scheduled, workouts.len());
    Ok(plan.to_yaml_string()?)
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("{}: {}", "Error".red().bold(), e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);
    print_banner();

    let (Some(command), Some(input)) = (config.command, config.input_path.as_deref()) else {
        return Err("Missing command or input file".into());
    };
    info!("Command: {} {}", command, input.display());

    let zones = load_zone_config(config.config_path.as_deref())?;
    let output = config.output_path.as_deref();

    match command {
        Command::Show => {
            let (_, mut workouts) = load_workouts(input, &zones)?;
            if config.dist_to_time {
                workouts.iter_mut().for_each(|workout| {
                    workout.dist_to_time();
                });
            }
            show(&workouts, &zones);
        }
        Command::Export => {
            let (plan, mut workouts) = load_workouts(input, &zones)?;
            let json = export(&plan, &mut workouts, plan.zone_config(&zones), config.dist_to_time)?;
            write_output(output, &json)?;
        }
        Command::Import => {
            let yaml = import(input, &zones)?;
            write_output(output, &yaml)?;
        }
        Command::Schedule => {
            let (plan, workouts) = load_workouts(input, &zones)?;
            let yaml = schedule(plan, workouts, &zones, config.race_day.as_deref(), config.days.as_deref())?;
            write_output(output, &yaml)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("zoneplanner").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_arguments() {
        let config = parse_arguments(&args(&[
            "schedule",
            "plan.yaml",
            "--race-day",
            "2026-05-17",
            "--days",
            "0, 2,5",
            "-o",
            "out.yaml",
        ]))
        .unwrap();

        assert_eq!(config.command, Some(Command::Schedule));
        assert_eq!(config.input_path, Some(PathBuf::from("plan.yaml")));
        assert_eq!(config.race_day.as_deref(), Some("2026-05-17"));
        assert_eq!(config.days, Some(vec![0, 2, 5]));
        assert_eq!(config.output_path, Some(PathBuf::from("out.yaml")));
    }

    #[test]
    fn test_parse_arguments_errors() {
        assert!(parse_arguments(&args(&["publish", "plan.yaml"])).is_err());
        assert!(parse_arguments(&args(&["show"])).is_err());
        assert!(parse_arguments(&args(&["show", "plan.yaml", "--output"])).is_err());
        assert!(parse_arguments(&args(&["show", "plan.yaml", "--bogus"])).is_err());
        assert!(parse_arguments(&args(&["show", "plan.yaml", "--days", "1,x"])).is_err());
    }

    #[test]
    fn test_schedule_writes_dates() {
        let zones = ZoneConfig::default();
        let plan = PlanFile::from_yaml_str(
            "workouts:\n  - name: W01S01 Easy\n    sport: running\n    steps: \"interval: 30min @ Z2\"\n",
        )
        .unwrap();
        let (workouts, _) = plan.build_workouts(&zones);

        let yaml = schedule(plan, workouts, &zones, Some("2026-05-17"), None).unwrap();
        assert!(yaml.contains("2026-05-05"));
    }

    #[test]
    fn test_schedule_requires_race_day() {
        let zones = ZoneConfig::default();
        assert!(schedule(PlanFile::default(), Vec::new(), &zones, None, None).is_err());
    }

    #[test]
    fn test_export_applies_prefix() {
        let zones = ZoneConfig::default();
        let plan = PlanFile::from_yaml_str(
            "name_prefix: \"10K \"\nworkouts:\n  - name: Easy\n    sport: running\n    steps: \"interval: 1km @ Z2\"\n",
        )
        .unwrap();
        let (mut workouts, _) = plan.build_workouts(&zones);

        let json = export(&plan, &mut workouts, &zones, true).unwrap();
        assert!(json.contains("\"workoutName\": \"10K Easy\""));
        assert!(json.contains("\"conditionTypeKey\": \"time\""));
    }
}
