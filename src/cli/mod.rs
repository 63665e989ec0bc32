use crate::{
    config::ExtractorConfig,
    core::{normalize, CostSummary, QuoteEdit, QuoteStore},
    error::QuoteError,
    format::{format_integer, format_number, parse_number},
    render::{export_file_name, render_quote_html},
    schemas::parse_record,
    types::TravelQuoteData,
    QuoteExtractor,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// CLI entry point for the travel-quote tool
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = command().get_matches();

    let outcome = match matches.subcommand() {
        Some(("extract", sub)) => extract(sub).await,
        Some(("normalize", sub)) => normalize_file(sub).await,
        Some(("summary", sub)) => summary(sub).await,
        Some(("render", sub)) => render(sub).await,
        _ => Ok(()),
    };

    if let Err(err) = &outcome {
        error!(code = err.error_code(), "command failed: {}", err);
        eprintln!("{}", err.user_message());
    }
    outcome.map_err(Into::into)
}

fn command() -> Command {
    Command::new("travel-quote")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract, edit and print travel quotes from agency documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("extract")
                .about("Extract a quote record from a spreadsheet, PDF, image or text file")
                .arg(
                    Arg::new("file")
                        .help("Source document")
                        .required(true)
                        .index(1),
                )
                .arg(output_arg("Write the record JSON here instead of stdout"))
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .value_name("MODEL")
                        .help("Chat model to use (or set QUOTE_MODEL)"),
                )
                .arg(
                    Arg::new("api-key")
                        .short('k')
                        .long("api-key")
                        .value_name("KEY")
                        .help("API key (or set OPENAI_API_KEY env var)"),
                )
                .arg(
                    Arg::new("base-url")
                        .short('u')
                        .long("base-url")
                        .value_name("URL")
                        .help("Chat completions base URL (or set OPENAI_BASE_URL)"),
                )
                .arg(
                    Arg::new("relay-url")
                        .short('r')
                        .long("relay-url")
                        .value_name("URL")
                        .help("Extraction relay endpoint (or set QUOTE_RELAY_URL)"),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("Request timeout in seconds"),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize a raw extraction payload into a quote record")
                .arg(record_arg("Raw extraction output (JSON, possibly wrapped in prose)"))
                .arg(output_arg("Write the record JSON here instead of stdout")),
        )
        .subcommand(
            Command::new("summary")
                .about("Print currency totals and KRW conversion for a record")
                .arg(record_arg("Quote record JSON"))
                .arg(rate_arg()),
        )
        .subcommand(
            Command::new("render")
                .about("Render a record as a printable HTML quote")
                .arg(record_arg("Quote record JSON"))
                .arg(rate_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory")
                        .default_value("."),
                )
                .arg(
                    Arg::new("details")
                        .short('d')
                        .long("details")
                        .action(ArgAction::SetTrue)
                        .help("Include the cost breakdown even if the record does not request it"),
                ),
        )
}

fn record_arg(help: &'static str) -> Arg {
    Arg::new("record").help(help).required(true).index(1)
}

fn rate_arg() -> Arg {
    Arg::new("rate")
        .long("rate")
        .value_name("CUR=KRW")
        .action(ArgAction::Append)
        .help("Override an exchange rate, e.g. --rate USD=1,350")
}

fn output_arg(help: &'static str) -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .help(help)
}

async fn extract(matches: &ArgMatches) -> Result<(), QuoteError> {
    let mut config = ExtractorConfig::from_env()?;
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    if let Some(key) = matches.get_one::<String>("api-key") {
        config = config.with_api_key(key.as_str());
    }
    if let Some(url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(url.as_str());
    }
    if let Some(url) = matches.get_one::<String>("relay-url") {
        config = config.with_relay_url(url.as_str());
    }
    if let Some(raw) = matches.get_one::<String>("timeout") {
        let secs: u64 = raw
            .parse()
            .map_err(|_| QuoteError::Config(format!("invalid timeout `{raw}`")))?;
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let extractor = QuoteExtractor::from_config(&config)?;
    let file = required_path(matches, "file");
    info!("Extracting {} via {}", file.display(), extractor.service_name());
    info!("Using model: {}", config.model());

    let record = extractor.extract_path(&file).await?;
    info!(
        code = %record.quote_info.code,
        details = record.cost.details.len(),
        days = record.itinerary.len(),
        "extraction completed"
    );
    write_json(&record, matches.get_one::<String>("output")).await
}

async fn normalize_file(matches: &ArgMatches) -> Result<(), QuoteError> {
    let raw = tokio::fs::read_to_string(required_path(matches, "record")).await?;
    let payload = crate::services::parse_recovered(&raw)?;
    let record = normalize(&payload);
    write_json(&record, matches.get_one::<String>("output")).await
}

async fn summary(matches: &ArgMatches) -> Result<(), QuoteError> {
    let record = load_with_rates(matches).await?;
    let summary = CostSummary::compute(&record);

    println!("견적 번호: {}", display_or(&record.quote_info.code, "-"));
    println!("원가: {}", summary.amount_totals);
    println!("수익: {}", summary.profit_totals);
    println!("총 합계: {}", summary.totals);
    for category in &summary.categories {
        println!(
            "  {} ({}건): {}",
            category.category.heading(),
            category.line_count,
            category.totals
        );
    }
    println!(
        "인원: 성인 {}명, 아동 {}명",
        summary.pax_adult, summary.pax_child
    );
    for (code, value) in summary.per_person_by_currency() {
        println!("1인당 {} {}", code, format_integer(value));
    }
    if summary.has_foreign_currency() {
        println!(
            "원화 환산: KRW {} (1인당 KRW {})",
            format_integer(summary.krw_total),
            format_integer(summary.per_person_krw)
        );
        for code in &summary.foreign_currencies {
            match summary.applied_rates.iter().find(|(rate_code, _)| rate_code == code) {
                Some((_, rate)) => {
                    println!("  1 {} = {}원", code, format_number(*rate))
                }
                None => println!("  {} 환율 미입력", code),
            }
        }
    }
    Ok(())
}

async fn render(matches: &ArgMatches) -> Result<(), QuoteError> {
    let record = load_with_rates(matches).await?;
    let show_details = matches.get_flag("details") || record.cost.show_details_in_quote;

    let html = render_quote_html(&record, show_details);
    let dir = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&dir).await?;
    let target = dir.join(export_file_name(&record));
    tokio::fs::write(&target, html).await?;

    info!("Quote written to {}", target.display());
    println!("{}", target.display());
    Ok(())
}

fn required_path(matches: &ArgMatches, name: &str) -> PathBuf {
    matches
        .get_one::<String>(name)
        .map(PathBuf::from)
        .unwrap_or_default()
}

/// Load the record and apply any `--rate` overrides as edits.
async fn load_with_rates(matches: &ArgMatches) -> Result<TravelQuoteData, QuoteError> {
    let record = load_record(&required_path(matches, "record")).await?;
    let mut store = QuoteStore::with_record(record);
    for raw in matches.get_many::<String>("rate").into_iter().flatten() {
        let (currency, rate) = parse_rate(raw)?;
        store.apply(QuoteEdit::SetExchangeRate { currency, rate })?;
    }
    store
        .snapshot()
        .map(|record| (*record).clone())
        .ok_or_else(|| QuoteError::invalid_edit("no quote is loaded"))
}

fn parse_rate(raw: &str) -> Result<(String, f64), QuoteError> {
    let (currency, rate) = raw
        .split_once('=')
        .ok_or_else(|| QuoteError::invalid_edit(format!("expected CUR=RATE, got `{raw}`")))?;
    let value = parse_number(rate).ok_or_else(|| {
        QuoteError::invalid_edit(format!(
            "exchange rate for `{}` is not a number: `{}`",
            currency.trim(),
            rate.trim()
        ))
    })?;
    Ok((currency.trim().to_string(), value))
}

/// Strict parse first; anything else goes through the lenient normalizer.
async fn load_record(path: &Path) -> Result<TravelQuoteData, QuoteError> {
    let raw = tokio::fs::read_to_string(path).await?;
    match parse_record(&raw) {
        Ok(record) => Ok(record),
        Err(err) => {
            warn!("{} is not a normalized record ({}), normalizing", path.display(), err);
            let payload = crate::services::parse_recovered(&raw)?;
            Ok(normalize(&payload))
        }
    }
}

async fn write_json(record: &TravelQuoteData, output: Option<&String>) -> Result<(), QuoteError> {
    let json = serde_json::to_string_pretty(record)?;
    match output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!("Record written to {}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
