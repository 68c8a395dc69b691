//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_novelty_store::CsvNoveltyStore;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::log_notify_adapter::LogNotifyAdapter;
use crate::adapters::memory_novelty_store::MemoryNoveltyStore;
use crate::adapters::sendmail_adapter::SendmailAdapter;
use crate::adapters::signal_export;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::analysis::{analyze, chart_title, signal_message, Analysis, NOTIFY_SUBJECT};
use crate::domain::config_validation::{validate_output_config, validate_signal_config};
use crate::domain::error::SigtraderError;
use crate::domain::novelty::{LatestSignal, NoveltyTracker};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal_config::{AppConfig, NotifyConfig, NotifyMethod, SignalConfig};
use crate::ports::chart_port::{ChartData, ChartPort};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::novelty_port::NoveltyStore;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Technical-indicator trading signals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute signals, simulate and notify on a new signal
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Use an in-memory novelty store and log notifications only
        #[arg(long)]
        dry_run: bool,
        /// Skip the novelty check and notification
        #[arg(long)]
        no_notify: bool,
        /// Write an SVG chart, overriding [chart] output
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write per-bar indicator, signal and portfolio values to CSV
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            dry_run,
            no_notify,
            chart,
        } => run_signals(&config, dry_run, no_notify, chart.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Export { config, output } => run_export(&config, &output),
    }
}

fn fail(err: &SigtraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Validates every section, then resolves the run configuration.
pub fn build_app_config(config: &dyn ConfigPort) -> Result<AppConfig, SigtraderError> {
    validate_signal_config(config)?;
    validate_output_config(config)?;
    AppConfig::from_config(config)
}

pub fn fetch_series(
    data_port: &dyn DataPort,
    config: &SignalConfig,
) -> Result<PriceSeries, SigtraderError> {
    let bars = data_port.fetch_ohlcv(&config.ticker_symbol, config.start_date)?;
    if bars.is_empty() {
        return Err(SigtraderError::NoData {
            ticker: config.ticker_symbol.clone(),
            start_date: config.start_date,
        });
    }
    PriceSeries::new(bars)
}

/// Result of one signal run.
pub struct RunOutcome {
    pub series: PriceSeries,
    pub analysis: Analysis,
    /// Signal that was new and handed to the notifier.
    pub notified: Option<LatestSignal>,
    pub notify_error: Option<SigtraderError>,
}

/// Where a new signal goes once the novelty check passes.
pub struct Notification<'a, S: NoveltyStore> {
    pub tracker: &'a mut NoveltyTracker<S>,
    pub notifier: &'a dyn NotifyPort,
    pub recipient: &'a str,
}

/// Fetch, analyse and, when a notification target is given, report a new
/// signal. Notification failures are logged and do not fail the run.
pub fn run_signal_pipeline<S: NoveltyStore>(
    data_port: &dyn DataPort,
    config: &SignalConfig,
    notification: Option<Notification<'_, S>>,
) -> Result<RunOutcome, SigtraderError> {
    let series = fetch_series(data_port, config)?;
    info!(
        ticker = %config.ticker_symbol,
        bars = series.len(),
        first = %series.first_date(),
        last = %series.last_date(),
        "price series loaded"
    );

    let analysis = analyze(&series, config.indicator, config.initial_shares)?;

    let mut notified = None;
    let mut notify_error = None;
    if let Some(target) = notification {
        notified = target.tracker.check(analysis.latest);
        if let Some(signal) = notified {
            let body = signal_message(&config.ticker_symbol, &signal);
            match target.notifier.send(NOTIFY_SUBJECT, &body, target.recipient) {
                Ok(()) => info!(kind = %signal.kind, date = %signal.date, "new signal notified"),
                Err(e) => {
                    warn!(error = %e, "notification failed");
                    notify_error = Some(e);
                }
            }
        }
    }

    Ok(RunOutcome {
        series,
        analysis,
        notified,
        notify_error,
    })
}

fn print_summary(config: &SignalConfig, outcome: &RunOutcome) {
    let analysis = &outcome.analysis;
    let sim = &analysis.simulation;
    eprintln!("\n=== {} / {} ===", config.ticker_symbol, config.indicator);
    eprintln!(
        "Bars:             {} ({} to {})",
        outcome.series.len(),
        outcome.series.first_date(),
        outcome.series.last_date()
    );
    eprintln!("Buy signals:      {}", analysis.signals.buy_count());
    eprintln!("Sell signals:     {}", analysis.signals.sell_count());
    eprintln!("Trades:           {}", sim.trades.len());
    eprintln!("Initial value:    {:.2}", sim.initial_value());
    eprintln!(
        "Final value:      {:.2} ({} shares, {:.2} cash)",
        sim.final_value(),
        sim.final_state.shares,
        sim.final_state.cash
    );
    match analysis.final_growth() {
        Some(g) => eprintln!("Growth:           {:+.2}%", g),
        None => eprintln!("Growth:           n/a"),
    }
    match analysis.latest {
        Some(latest) => eprintln!("Latest signal:    {} on {}", latest.kind, latest.date),
        None => eprintln!("Latest signal:    none"),
    }
    if let Some(signal) = outcome.notified {
        eprintln!("New signal:       {} on {}", signal.kind, signal.date);
    }
    if let Some(e) = &outcome.notify_error {
        eprintln!("Notification:     failed ({e})");
    }
}

fn notifier_for(notify: &NotifyConfig) -> Box<dyn NotifyPort> {
    match notify.method {
        NotifyMethod::Log => Box::new(LogNotifyAdapter::new()),
        NotifyMethod::Sendmail => Box::new(SendmailAdapter::new(
            notify.sendmail_path.clone(),
            notify.sender.clone(),
        )),
    }
}

fn run_with_store<S: NoveltyStore>(
    data_port: &dyn DataPort,
    app: &AppConfig,
    store: S,
    notifier: &dyn NotifyPort,
    notify: bool,
) -> Result<RunOutcome, SigtraderError> {
    let mut tracker = NoveltyTracker::new(store);
    let recipient = app.notify.recipient.clone().unwrap_or_default();
    let notification = if notify {
        Some(Notification {
            tracker: &mut tracker,
            notifier,
            recipient: &recipient,
        })
    } else {
        None
    };
    run_signal_pipeline(data_port, &app.signal, notification)
}

fn run_signals(
    config_path: &Path,
    dry_run: bool,
    no_notify: bool,
    chart_override: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(app.data_path.clone());
    let notify = app.notify.enabled && !no_notify;

    let result = if dry_run {
        info!("dry run: in-memory novelty store, log notifications");
        run_with_store(
            &data_port,
            &app,
            MemoryNoveltyStore::new(),
            &LogNotifyAdapter::new(),
            notify,
        )
    } else {
        let notifier = notifier_for(&app.notify);
        run_with_store(
            &data_port,
            &app,
            CsvNoveltyStore::new(app.notify.store_path.clone()),
            notifier.as_ref(),
            notify,
        )
    };

    let outcome = match result {
        Ok(o) => o,
        Err(e) => return fail(&e),
    };
    print_summary(&app.signal, &outcome);

    let chart_path = chart_override
        .map(Path::to_path_buf)
        .or_else(|| app.chart_output.clone());
    if let Some(path) = chart_path {
        let chart = ChartData {
            title: chart_title(
                &app.signal.ticker_symbol,
                app.signal.indicator,
                &outcome.series,
            ),
            series: &outcome.series,
            signals: &outcome.analysis.signals,
            equity_curve: &outcome.analysis.simulation.equity_curve,
        };
        if let Err(e) = SvgChartAdapter::new().render(&chart, &path) {
            return fail(&e);
        }
        eprintln!("\nChart written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    eprintln!("Configuration valid: {}", config_path.display());
    eprintln!("  Ticker:         {}", app.signal.ticker_symbol);
    eprintln!("  Start date:     {}", app.signal.start_date);
    eprintln!("  Indicator:      {}", app.signal.indicator);
    eprintln!("  Initial shares: {}", app.signal.initial_shares);
    eprintln!("  Data path:      {}", app.data_path.display());
    if app.notify.enabled {
        eprintln!(
            "  Notify:         {:?} -> {}",
            app.notify.method,
            app.notify.recipient.as_deref().unwrap_or("(log)")
        );
        eprintln!("  Store:          {}", app.notify.store_path.display());
    } else {
        eprintln!("  Notify:         disabled");
    }
    if let Some(chart) = &app.chart_output {
        eprintln!("  Chart:          {}", chart.display());
    }
    ExitCode::SUCCESS
}

fn run_export(config_path: &Path, output: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(app.data_path.clone());
    let outcome =
        match run_signal_pipeline::<MemoryNoveltyStore>(&data_port, &app.signal, None) {
            Ok(o) => o,
            Err(e) => return fail(&e),
        };

    if let Err(e) = signal_export::export_csv(output, &outcome.series, &outcome.analysis) {
        return fail(&e);
    }
    eprintln!("Export written to: {}", output.display());
    ExitCode::SUCCESS
}
