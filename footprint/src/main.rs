//! # footprint
//!
//! A CLI carbon footprint estimator.
//!
//! ## Overview
//!
//! footprint is built on top of footprintlib. It turns a short monthly survey
//! (travel, home energy, diet) into yearly CO₂ emissions, shows how they split
//! across categories, compares them with the global average and suggests
//! where to cut.
//!
//! ## Features
//!
//! - **Local calculation**: country-aware grid intensities, no network needed
//! - **Result rendering**: format results produced elsewhere (file or stdin)
//! - **World statistics**: regional intensities, rankings, energy sources
//! - **Multiple output formats**: styled terminal text (default), plain text, JSON
//!
//! ## Usage
//!
//! ```bash
//! # Calculate a footprint
//! footprint calculate --country DE --car-km 800 --meat-kg 4 --electricity-kwh 250
//!
//! # Survey answers from a JSON file
//! footprint calculate --input survey.json --breakdown
//!
//! # Render a calculator response
//! curl -s ... | footprint render -
//!
//! # Statistics as JSON
//! footprint stats --output json
//! ```

mod logging;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use footprintlib::calculator::DEFAULT_COUNTRY;
use footprintlib::response::read_source;
use footprintlib::{
    format_metrics_with, read_results, recommend, ApiResponse, CalculateResponse, Calculator,
    Catalog, CountriesResponse, DisplayMetrics, DisplayOptions, EmissionFactors, FootprintConfig,
    FootprintTable, NumberLocale, Recommendation, RecommendationsResponse, Sections, SurveyInput,
    ZeroSign,
};
use outstanding::cli::{App, CommandContext, HandlerResult, Output, RunResult};
use serde::Serialize;

use render::{
    COUNTRY_TEMPLATE, RECOMMENDATIONS_TEMPLATE, RESULTS_TEMPLATE, STATISTICS_TEMPLATE,
    TABLE_TEMPLATE,
};

/// Survey flags: (argument id, help)
const SURVEY_ARGS: &[(&str, &str)] = &[
    ("car-km", "Kilometers driven by car per month"),
    ("bus-km", "Kilometers by bus per month"),
    ("train-km", "Kilometers by train per month"),
    ("flight-km", "Kilometers flown per month"),
    ("heating-kwh", "Heating energy per month (kWh)"),
    ("electricity-kwh", "Electricity used per month (kWh)"),
    ("water-m3", "Water used per month (m³)"),
    ("meat-kg", "Meat eaten per month (kg)"),
    ("dairy-kg", "Dairy eaten per month (kg)"),
    ("vegetables-kg", "Vegetables eaten per month (kg)"),
];

/// Settings shared by every command, from flags and the config file
struct Settings {
    display: DisplayOptions,
    catalog: Catalog,
    factors: EmissionFactors,
    default_country: String,
}

/// JSON shape of the calculate command
#[derive(Debug, Serialize)]
struct CalculateReport {
    #[serde(flatten)]
    response: CalculateResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<DisplayMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendations: Option<Vec<Recommendation>>,
}

/// JSON shape of the render command
#[derive(Debug, Serialize)]
struct RenderReport {
    display: DisplayMetrics,
}

fn input_arg() -> Arg {
    Arg::new("file")
        .help("Results JSON file, or '-' for stdin")
        .default_value("-")
}

fn breakdown_arg() -> Arg {
    Arg::new("breakdown")
        .short('b')
        .long("breakdown")
        .action(ArgAction::SetTrue)
        .help("Show the monthly line items")
}

/// Build the clap Command structure
fn build_command() -> Command {
    let mut calculate = Command::new("calculate")
        .about("Calculate a footprint from monthly survey answers")
        .arg(
            Arg::new("country")
                .short('c')
                .long("country")
                .help("Country code for the electricity grid intensity (e.g. FR, DE)"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_parser(value_parser!(PathBuf))
                .help("Survey answers as JSON ('-' for stdin); flags override file values"),
        )
        .arg(breakdown_arg())
        .arg(
            Arg::new("no-results")
                .long("no-results")
                .action(ArgAction::SetTrue)
                .help("Skip the figures and tables, show only recommendations"),
        )
        .arg(
            Arg::new("no-recommendations")
                .long("no-recommendations")
                .action(ArgAction::SetTrue)
                .help("Skip recommendations"),
        );
    for (id, help) in SURVEY_ARGS {
        calculate = calculate.arg(
            Arg::new(*id)
                .long(*id)
                .value_name("N")
                .value_parser(value_parser!(f64))
                .help(*help),
        );
    }

    Command::new("footprint")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Carbon footprint estimator: yearly CO₂, comparisons and advice")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("locale")
                .long("locale")
                .global(true)
                .value_parser(["plain", "fr"])
                .help("Number separators (plain: 15 235 / 4.3, fr: 15 235 / 4,3)"),
        )
        .arg(
            Arg::new("zero-sign")
                .long("zero-sign")
                .global(true)
                .value_parser(["plain", "plus"])
                .help("Render a zero comparison as 0% (plain) or +0% (plus)"),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Country catalog file (TOML or JSON)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log diagnostics to stderr (repeat for more)"),
        )
        .subcommand(calculate)
        .subcommand(
            Command::new("render")
                .about("Display a results object or calculator response")
                .arg(input_arg())
                .arg(breakdown_arg()),
        )
        .subcommand(
            Command::new("recommend")
                .about("Suggest reductions for a results object or calculator response")
                .arg(input_arg()),
        )
        .subcommand(Command::new("stats").about("Show world emission statistics"))
        .subcommand(Command::new("countries").about("List known countries"))
        .subcommand(
            Command::new("country")
                .about("Show one country's grid intensity")
                .arg(Arg::new("code").required(true).help("Country code")),
        )
}

/// Install logging, then merge config file values with command-line flags
fn resolve_settings(matches: &ArgMatches) -> anyhow::Result<Settings> {
    logging::init_logging(matches.get_count("verbose"));

    let config_path = matches.get_one::<PathBuf>("config").map(|p| p.as_path());
    let config = FootprintConfig::load_optional(config_path)?;

    let mut display = config.display_options()?;
    if let Some(locale) = matches.get_one::<String>("locale") {
        display = display.locale(locale.parse::<NumberLocale>().map_err(anyhow::Error::msg)?);
    }
    if let Some(zero_sign) = matches.get_one::<String>("zero-sign") {
        display = display.zero_sign(zero_sign.parse::<ZeroSign>().map_err(anyhow::Error::msg)?);
    }

    let catalog = match matches.get_one::<PathBuf>("catalog") {
        Some(path) => Catalog::load(path)?,
        None => config.load_catalog()?,
    };

    Ok(Settings {
        display,
        catalog,
        factors: config.factors,
        default_country: config
            .default_country
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    })
}

/// Build the survey from an optional JSON file and flags
fn build_survey(matches: &ArgMatches, default_country: &str) -> anyhow::Result<SurveyInput> {
    let mut survey = match matches.get_one::<PathBuf>("input") {
        Some(path) => {
            let text = read_source(path)?;
            let mut value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("invalid survey file '{}'", path.display()))?;
            if let Some(object) = value.as_object_mut() {
                object
                    .entry("country_code")
                    .or_insert_with(|| default_country.into());
            }
            serde_json::from_value(value)
                .with_context(|| format!("invalid survey file '{}'", path.display()))?
        }
        None => SurveyInput::new().country(default_country),
    };

    if let Some(country) = matches.get_one::<String>("country") {
        survey.country_code = country.clone();
    }

    let flag = |id: &str| matches.get_one::<f64>(id).copied();
    let fields: [(&str, &mut f64); 10] = [
        ("car-km", &mut survey.car_km),
        ("bus-km", &mut survey.bus_km),
        ("train-km", &mut survey.train_km),
        ("flight-km", &mut survey.flight_km),
        ("heating-kwh", &mut survey.heating_kwh),
        ("electricity-kwh", &mut survey.electricity_kwh),
        ("water-m3", &mut survey.water_m3),
        ("meat-kg", &mut survey.meat_kg),
        ("dairy-kg", &mut survey.dairy_kg),
        ("vegetables-kg", &mut survey.vegetables_kg),
    ];
    for (id, field) in fields {
        if let Some(value) = flag(id) {
            *field = value;
        }
    }

    tracing::debug!(?survey, "survey input");
    Ok(survey)
}

fn file_arg(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<String>("file")
        .map(|s| Path::new(s.as_str()))
        .unwrap_or_else(|| Path::new("-"))
}

/// Handler for calculate command
fn calculate_handler(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> HandlerResult<serde_json::Value> {
    let settings = resolve_settings(matches)?;
    let survey = build_survey(matches, &settings.default_country)?;
    let calculator = Calculator::new(settings.catalog.clone()).factors(settings.factors);
    let response = calculator.calculate(&survey)?;

    let sections = Sections::all()
        .with_results(!matches.get_flag("no-results"))
        .with_recommendations(!matches.get_flag("no-recommendations"));
    let recommendations = if sections.recommendations {
        recommend(&response.results)
    } else {
        Vec::new()
    };

    // For JSON mode, return raw data
    if ctx.output_mode.is_structured() {
        let report = CalculateReport {
            display: sections
                .results
                .then(|| format_metrics_with(&response.results, &settings.display)),
            recommendations: sections.recommendations.then_some(recommendations),
            response,
        };
        return Ok(Output::Render(serde_json::to_value(&report)?));
    }

    let country = calculator.country(&survey)?;
    let context = render::results_context(
        &response.results,
        Some(country),
        &recommendations,
        sections,
        matches.get_flag("breakdown"),
        &settings.display,
    )?;
    Ok(Output::Render(context))
}

/// Handler for render command
fn render_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let settings = resolve_settings(matches)?;
    let result = read_results(file_arg(matches))?;

    if ctx.output_mode.is_structured() {
        let report = RenderReport {
            display: format_metrics_with(&result, &settings.display),
        };
        return Ok(Output::Render(serde_json::to_value(&report)?));
    }

    let context = render::results_context(
        &result,
        None,
        &[],
        Sections::none().with_results(true),
        matches.get_flag("breakdown"),
        &settings.display,
    )?;
    Ok(Output::Render(context))
}

/// Handler for recommend command
fn recommend_handler(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> HandlerResult<serde_json::Value> {
    resolve_settings(matches)?;
    let result = read_results(file_arg(matches))?;
    let recommendations = recommend(&result);

    if ctx.output_mode.is_structured() {
        let response = ApiResponse::Success(RecommendationsResponse { recommendations });
        return Ok(Output::Render(serde_json::to_value(&response)?));
    }
    Ok(Output::Render(render::recommendations_context(&recommendations)))
}

/// Handler for stats command
fn stats_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let settings = resolve_settings(matches)?;
    let stats = settings.catalog.statistics();

    if ctx.output_mode.is_structured() {
        let response = ApiResponse::Success(stats);
        return Ok(Output::Render(serde_json::to_value(&response)?));
    }
    let context = render::statistics_context(&settings.catalog, &stats, &settings.display);
    Ok(Output::Render(context))
}

/// Handler for countries command
fn countries_handler(
    matches: &ArgMatches,
    ctx: &CommandContext,
) -> HandlerResult<serde_json::Value> {
    let settings = resolve_settings(matches)?;
    let countries = settings.catalog.countries_by_name();

    if ctx.output_mode.is_structured() {
        let response = ApiResponse::Success(CountriesResponse { countries });
        return Ok(Output::Render(serde_json::to_value(&response)?));
    }
    let table = FootprintTable::countries(&countries, &settings.display.locale);
    Ok(Output::Render(render::single_table_context(&table)))
}

/// Handler for country command
fn country_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let settings = resolve_settings(matches)?;
    let code = matches
        .get_one::<String>("code")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_COUNTRY);
    let country = settings.catalog.require_country(code)?;

    if ctx.output_mode.is_structured() {
        let response = ApiResponse::Success(country);
        return Ok(Output::Render(serde_json::to_value(&response)?));
    }
    Ok(Output::Render(render::country_context(country, &settings.display)))
}

fn main() -> ExitCode {
    let cmd = build_command();
    let theme = render::create_theme();

    // Build the outstanding app with command handlers and run
    let result = App::builder()
        .theme(theme)
        .command("calculate", calculate_handler, RESULTS_TEMPLATE)
        .command("render", render_handler, RESULTS_TEMPLATE)
        .command("recommend", recommend_handler, RECOMMENDATIONS_TEMPLATE)
        .command("stats", stats_handler, STATISTICS_TEMPLATE)
        .command("countries", countries_handler, TABLE_TEMPLATE)
        .command("country", country_handler, COUNTRY_TEMPLATE)
        .run_to_string(cmd, std::env::args());

    match result {
        RunResult::Handled(output) => {
            if output.starts_with("Error:") {
                eprintln!("{}", output);
                return ExitCode::FAILURE;
            }
            print!("{}", output);
            ExitCode::SUCCESS
        }
        RunResult::Binary(_, _) => ExitCode::SUCCESS,
        RunResult::NoMatch(_) => {
            eprintln!("Error: no command given");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outstanding::OutputMode;

    fn sub_matches(args: &[&str]) -> ArgMatches {
        let matches = build_command().try_get_matches_from(args).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        sub.clone()
    }

    fn context(output_mode: OutputMode) -> CommandContext {
        CommandContext {
            output_mode,
            command_path: vec![],
        }
    }

    fn rendered(output: Output<serde_json::Value>) -> serde_json::Value {
        match output {
            Output::Render(value) => value,
            _ => panic!("expected rendered output"),
        }
    }

    #[test]
    fn test_command_is_consistent() {
        build_command().debug_assert();
    }

    #[test]
    fn test_build_survey_from_flags() {
        let matches = sub_matches(&[
            "footprint",
            "calculate",
            "--country",
            "DE",
            "--car-km",
            "120.5",
            "--meat-kg",
            "3",
        ]);
        let survey = build_survey(&matches, "FR").unwrap();
        assert_eq!(survey.country_code, "DE");
        assert_eq!(survey.car_km, 120.5);
        assert_eq!(survey.meat_kg, 3.0);
        assert_eq!(survey.bus_km, 0.0);
    }

    #[test]
    fn test_build_survey_default_country() {
        let matches = sub_matches(&["footprint", "calculate"]);
        let survey = build_survey(&matches, "SE").unwrap();
        assert_eq!(survey.country_code, "SE");
    }

    #[test]
    fn test_build_survey_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");
        std::fs::write(&path, r#"{"car_km": 100, "dairy_kg": 2}"#).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let matches = sub_matches(&["footprint", "calculate", "-i", &path_str, "--car-km", "5"]);
        let survey = build_survey(&matches, "NO").unwrap();
        assert_eq!(survey.country_code, "NO");
        assert_eq!(survey.car_km, 5.0);
        assert_eq!(survey.dairy_kg, 2.0);
    }

    #[test]
    fn test_resolve_settings_flags() {
        let matches = sub_matches(&["footprint", "stats", "--locale", "fr", "--zero-sign", "plus"]);
        let settings = resolve_settings(&matches).unwrap();
        assert_eq!(settings.display.locale, NumberLocale::french());
        assert_eq!(settings.display.zero_sign, ZeroSign::Plus);
        assert_eq!(settings.default_country, "FR");
    }

    #[test]
    fn test_calculate_json_report() {
        let matches = sub_matches(&["footprint", "calculate", "--car-km", "1000"]);
        let value = rendered(calculate_handler(&matches, &context(OutputMode::Json)).unwrap());

        assert_eq!(value["country_code"], "FR");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["results"]["totals"]["annual"], 2520.0);
        assert_eq!(value["display"]["annual_total"], "2.52");
        assert_eq!(value["display"]["transport_percent"], "100%");
        assert_eq!(value["recommendations"][0]["category"], "Transport");
    }

    #[test]
    fn test_calculate_sections() {
        let matches = sub_matches(&["footprint", "calculate", "--car-km", "1000", "--no-results"]);

        let value = rendered(calculate_handler(&matches, &context(OutputMode::Json)).unwrap());
        assert!(value.get("display").is_none());
        assert!(value["recommendations"].is_array());

        let value = rendered(calculate_handler(&matches, &context(OutputMode::Text)).unwrap());
        assert_eq!(value["show_results"], false);
        assert_eq!(value["recommendations"][0]["category"], "Transport");
    }

    #[test]
    fn test_text_context_for_template() {
        let matches = sub_matches(&["footprint", "country", "no"]);
        let value = rendered(country_handler(&matches, &context(OutputMode::Text)).unwrap());
        assert_eq!(value["name"], "Norway");
        assert_eq!(value["intensity"], "29 g CO₂/kWh");

        let value = rendered(country_handler(&matches, &context(OutputMode::Json)).unwrap());
        assert_eq!(value["success"], true);
        assert_eq!(value["code"], "NO");
    }
}
