//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::news_csv_adapter::{ArticleCache, NewsCsvAdapter};
use crate::domain::backtest::{
    self as backtest_engine, resolve_date_range, BacktestConfig, MAX_LOOKBACK_YEARS,
};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_data_config, validate_strategy_config,
};
use crate::domain::error::DcaError;
use crate::domain::sentiment::SentimentOrigin;
use crate::domain::strategy::sentiment_dca::DEFAULT_SELL_FRACTION;
use crate::domain::strategy::RsiDcaParams;
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "dcatrader", about = "Dollar-cost averaging strategy back-tester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run SIP, RSI-based DCA and sentiment DCA over one symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Lookback in years, fractions allowed
        #[arg(long)]
        years: Option<f64>,
        /// Report directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Seed for simulated sentiment
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        real_news: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub symbol: Option<String>,
    pub years: Option<f64>,
    pub seed: Option<u64>,
    pub real_news: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            years,
            output,
            seed,
            real_news,
            dry_run,
        } => {
            let overrides = Overrides {
                symbol,
                years,
                seed,
                real_news,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides, output.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    let level = adapter
        .get_string("logging", "level")
        .unwrap_or_else(|| "info".to_string());
    init_logging(&level);
    Ok(adapter)
}

fn validate_all(adapter: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_backtest_config(adapter)?;
    validate_strategy_config(adapter)?;
    validate_data_config(adapter)?;
    Ok(())
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, DcaError> {
    let defaults = BacktestConfig::default();

    let symbol = adapter
        .get_string("backtest", "symbol")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DcaError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?;

    let end_date = match adapter.get_string("backtest", "end_date") {
        Some(s) if !s.trim().is_empty() => Some(parse_date(&s, "end_date")?),
        _ => None,
    };

    let sentiment_seed = match adapter.get_string("backtest", "sentiment_seed") {
        Some(s) if !s.trim().is_empty() => {
            Some(s.trim().parse::<u64>().map_err(|_| DcaError::ConfigInvalid {
                section: "backtest".into(),
                key: "sentiment_seed".into(),
                reason: "sentiment_seed must be a non-negative integer".into(),
            })?)
        }
        _ => None,
    };

    let rsi_length = adapter.get_int("backtest", "rsi_length", defaults.rsi_length as i64);
    if rsi_length < 2 {
        return Err(DcaError::ConfigInvalid {
            section: "backtest".into(),
            key: "rsi_length".into(),
            reason: "rsi_length must be at least 2".into(),
        });
    }

    let default_rsi = RsiDcaParams::default();
    Ok(BacktestConfig {
        symbol,
        lookback_years: adapter.get_double("backtest", "lookback_years", defaults.lookback_years),
        rsi_length: rsi_length as usize,
        sip_amount: adapter.get_double("sip", "monthly_amount", defaults.sip_amount),
        rsi_dca: RsiDcaParams {
            buy_low: adapter.get_double("rsi_dca", "buy_low", default_rsi.buy_low),
            buy_mid: adapter.get_double("rsi_dca", "buy_mid", default_rsi.buy_mid),
        },
        sell_fraction: adapter.get_double("sentiment", "sell_fraction", DEFAULT_SELL_FRACTION),
        equal_monthly_budget: adapter.get_bool(
            "backtest",
            "equal_monthly_budget",
            defaults.equal_monthly_budget,
        ),
        include_sentiment: adapter.get_bool(
            "backtest",
            "include_sentiment",
            defaults.include_sentiment,
        ),
        use_real_news: adapter.get_bool("backtest", "use_real_news", defaults.use_real_news),
        include_news_body: adapter.get_bool(
            "sentiment",
            "include_body",
            defaults.include_news_body,
        ),
        sentiment_seed,
        end_date,
    })
}

pub fn apply_overrides(config: &mut BacktestConfig, overrides: &Overrides) -> Result<(), DcaError> {
    if let Some(ref symbol) = overrides.symbol {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(DcaError::ConfigInvalid {
                section: "backtest".into(),
                key: "symbol".into(),
                reason: "--symbol must not be empty".into(),
            });
        }
        config.symbol = symbol.to_string();
    }
    if let Some(years) = overrides.years {
        if years <= 0.0 || !years.is_finite() || years > MAX_LOOKBACK_YEARS {
            return Err(DcaError::ConfigInvalid {
                section: "backtest".into(),
                key: "lookback_years".into(),
                reason: format!("--years must be in (0, {}]", MAX_LOOKBACK_YEARS),
            });
        }
        config.lookback_years = years;
    }
    if overrides.seed.is_some() {
        config.sentiment_seed = overrides.seed;
    }
    if overrides.real_news {
        config.use_real_news = true;
    }
    Ok(())
}

/// One provider per `[news] feed_dirs` entry, all sharing `cache`.
pub fn build_news_providers(
    adapter: &dyn ConfigPort,
    cache: &Arc<ArticleCache>,
) -> Vec<NewsCsvAdapter> {
    adapter
        .get_list("news", "feed_dirs")
        .into_iter()
        .map(|dir| NewsCsvAdapter::new(PathBuf::from(dir), Arc::clone(cache)))
        .collect()
}

fn resolve_config(adapter: &dyn ConfigPort, overrides: &Overrides) -> Result<BacktestConfig, DcaError> {
    validate_all(adapter)?;
    let mut config = build_backtest_config(adapter)?;
    apply_overrides(&mut config, overrides)?;
    Ok(config)
}

fn run_backtest(config_path: &Path, overrides: &Overrides, output: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match resolve_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // validate_data_config guarantees price_dir
    let price_dir = adapter.get_string("data", "price_dir").unwrap_or_default();
    let data_port = CsvAdapter::new(PathBuf::from(price_dir.trim()));

    let cache = Arc::new(ArticleCache::new());
    let providers = build_news_providers(&adapter, &cache);
    let news: Vec<&dyn NewsPort> = providers.iter().map(|p| p as &dyn NewsPort).collect();

    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("report", "output_dir")
                .unwrap_or_else(|| "report".to_string()),
        )
    });

    run_backtest_pipeline(
        &data_port,
        &news,
        &bt_config,
        &CsvReportAdapter,
        &output_dir,
        Local::now().date_naive(),
    )
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    news: &[&dyn NewsPort],
    bt_config: &BacktestConfig,
    report: &dyn ReportPort,
    output_dir: &Path,
    today: NaiveDate,
) -> ExitCode {
    eprintln!(
        "Running backtest: {} over {} years",
        bt_config.symbol, bt_config.lookback_years
    );

    let result = match backtest_engine::run_backtest(data_port, news, bt_config, today) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "\n=== {} {} to {} ({} trading days) ===",
        result.symbol,
        result.start_date,
        result.end_date,
        result.series.len()
    );
    match result.sentiment_origin {
        Some(SentimentOrigin::News { articles }) => {
            eprintln!("Sentiment: news ({} articles)", articles)
        }
        Some(SentimentOrigin::Simulated) => eprintln!("Sentiment: simulated"),
        None => {}
    }
    eprintln!("\n{}", result.summary);

    match report.write(&result, output_dir) {
        Ok(files) => {
            for file in &files {
                eprintln!("Report written to: {}", file.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match resolve_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Config validated successfully");

    let end = config.end_date.unwrap_or_else(|| Local::now().date_naive());
    let (start_date, end_date) = match resolve_date_range(end, config.lookback_years) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nBacktest:");
    eprintln!("  symbol:        {}", config.symbol);
    eprintln!("  range:         {} to {}", start_date, end_date);
    eprintln!("  rsi length:    {}", config.rsi_length);
    eprintln!("\nStrategies:");
    eprintln!("  SIP:           {:.2} per month", config.sip_amount);
    eprintln!(
        "  RSI DCA:       {:.2} below 30, {:.2} from 30 to 40{}",
        config.rsi_dca.buy_low,
        config.rsi_dca.buy_mid,
        if config.equal_monthly_budget {
            ", normalized to the SIP budget"
        } else {
            ""
        }
    );
    if config.include_sentiment {
        eprintln!(
            "  Sentiment DCA: sell fraction {:.2}, {} sentiment",
            config.sell_fraction,
            if config.use_real_news { "news" } else { "simulated" }
        );
        let feeds = adapter.get_list("news", "feed_dirs");
        if config.use_real_news {
            if feeds.is_empty() {
                eprintln!("  news feeds:    none configured, will simulate");
            } else {
                eprintln!("  news feeds:    {}", feeds.join(", "));
            }
        }
    } else {
        eprintln!("  Sentiment DCA: disabled");
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&adapter).and_then(|_| build_backtest_config(&adapter)) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}
