//! Run configuration resolved from a `ConfigPort`.
//!
//! Built once at startup and passed down explicitly; nothing reads the
//! config source after this point.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::IndicatorType;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "last_signal_date.csv";
pub const DEFAULT_SENDMAIL_PATH: &str = "/usr/sbin/sendmail";
pub const DEFAULT_DATA_PATH: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub ticker_symbol: String,
    pub start_date: NaiveDate,
    pub indicator: IndicatorType,
    pub initial_shares: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyMethod {
    Log,
    Sendmail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub method: NotifyMethod,
    pub recipient: Option<String>,
    pub sender: Option<String>,
    pub sendmail_path: PathBuf,
    pub store_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub signal: SignalConfig,
    pub notify: NotifyConfig,
    pub data_path: PathBuf,
    pub chart_output: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SigtraderError> {
        Ok(AppConfig {
            signal: SignalConfig::from_config(config)?,
            notify: NotifyConfig::from_config(config)?,
            data_path: config
                .get_nonempty("data", "path")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
                .into(),
            chart_output: config.get_nonempty("chart", "output").map(PathBuf::from),
        })
    }
}

impl SignalConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SigtraderError> {
        let ticker_symbol = config
            .get_nonempty("signal", "ticker_symbol")
            .ok_or_else(|| SigtraderError::config_missing("signal", "ticker_symbol"))?
            .to_uppercase();

        let start_date = parse_date(config, "signal", "start_date")?;
        let indicator = resolve_indicator(config)?;

        let initial_shares = match config.get_nonempty("signal", "initial_shares") {
            None => 0,
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                SigtraderError::config_invalid(
                    "signal",
                    "initial_shares",
                    format!("'{raw}' is not a non-negative integer"),
                )
            })?,
        };

        Ok(SignalConfig {
            ticker_symbol,
            start_date,
            indicator,
            initial_shares,
        })
    }
}

impl NotifyConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SigtraderError> {
        let method = match config.get_nonempty("notify", "method") {
            None => NotifyMethod::Log,
            Some(m) => match m.to_ascii_lowercase().as_str() {
                "log" => NotifyMethod::Log,
                "sendmail" => NotifyMethod::Sendmail,
                other => {
                    return Err(SigtraderError::config_invalid(
                        "notify",
                        "method",
                        format!("unknown method '{other}' (expected log or sendmail)"),
                    ));
                }
            },
        };

        let recipient = config.get_nonempty("notify", "recipient");
        if method == NotifyMethod::Sendmail && recipient.is_none() {
            return Err(SigtraderError::config_missing("notify", "recipient"));
        }

        Ok(NotifyConfig {
            enabled: config.get_bool("notify", "enabled", true),
            method,
            recipient,
            sender: config.get_nonempty("notify", "sender"),
            sendmail_path: config
                .get_nonempty("notify", "sendmail_path")
                .unwrap_or_else(|| DEFAULT_SENDMAIL_PATH.to_string())
                .into(),
            store_path: config
                .get_nonempty("notify", "store_path")
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string())
                .into(),
        })
    }
}

/// Resolves `[signal] indicator_choice` and applies `[indicator]` overrides.
pub fn resolve_indicator(config: &dyn ConfigPort) -> Result<IndicatorType, SigtraderError> {
    let choice = config
        .get_nonempty("signal", "indicator_choice")
        .ok_or_else(|| SigtraderError::config_missing("signal", "indicator_choice"))?;
    let base: IndicatorType = choice
        .parse()
        .map_err(|reason: String| SigtraderError::config_invalid("signal", "indicator_choice", reason))?;

    let indicator = match base {
        IndicatorType::Rsi { window } => IndicatorType::Rsi {
            window: parse_period(config, "rsi_window", window)?,
        },
        IndicatorType::Macd { fast, slow, signal } => IndicatorType::Macd {
            fast: parse_period(config, "macd_fast", fast)?,
            slow: parse_period(config, "macd_slow", slow)?,
            signal: parse_period(config, "macd_signal", signal)?,
        },
        IndicatorType::Stochastic { k_period, d_period } => IndicatorType::Stochastic {
            k_period: parse_period(config, "stoch_k", k_period)?,
            d_period: parse_period(config, "stoch_d", d_period)?,
        },
    };

    indicator
        .check_params()
        .map_err(|reason| SigtraderError::config_invalid("indicator", "parameters", reason))?;
    Ok(indicator)
}

fn parse_period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, SigtraderError> {
    match config.get_nonempty("indicator", key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(v) if v >= 1 => Ok(v),
            _ => Err(SigtraderError::config_invalid(
                "indicator",
                key,
                format!("'{raw}' is not a positive integer"),
            )),
        },
    }
}

pub(crate) fn parse_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, SigtraderError> {
    let raw = config
        .get_nonempty(section, key)
        .ok_or_else(|| SigtraderError::config_missing(section, key))?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        SigtraderError::config_invalid(
            section,
            key,
            format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const VALID: &str = r#"
[signal]
ticker_symbol = aapl
start_date = 2022-01-01
indicator_choice = MACD
initial_shares = 10

[indicator]
macd_fast = 5
macd_slow = 35
"#;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn builds_signal_config() {
        let cfg = SignalConfig::from_config(&adapter(VALID)).unwrap();
        assert_eq!(cfg.ticker_symbol, "AAPL");
        assert_eq!(cfg.start_date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(cfg.initial_shares, 10);
        assert_eq!(
            cfg.indicator,
            IndicatorType::Macd {
                fast: 5,
                slow: 35,
                signal: 9
            }
        );
    }

    #[test]
    fn overrides_only_apply_to_chosen_indicator() {
        let content = VALID.replace("indicator_choice = MACD", "indicator_choice = RSI");
        let cfg = SignalConfig::from_config(&adapter(&content)).unwrap();
        assert_eq!(cfg.indicator, IndicatorType::RSI_DEFAULT);
    }

    #[test]
    fn unknown_indicator_is_config_error() {
        let content = VALID.replace("indicator_choice = MACD", "indicator_choice = ADX");
        let err = SignalConfig::from_config(&adapter(&content)).unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::ConfigInvalid { ref key, .. } if key == "indicator_choice"
        ));
    }

    #[test]
    fn negative_shares_rejected() {
        let content = VALID.replace("initial_shares = 10", "initial_shares = -3");
        let err = SignalConfig::from_config(&adapter(&content)).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigInvalid { .. }));
    }

    #[test]
    fn zero_period_rejected() {
        let content = VALID.replace("macd_fast = 5", "macd_fast = 0");
        let err = SignalConfig::from_config(&adapter(&content)).unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::ConfigInvalid { ref key, .. } if key == "macd_fast"
        ));
    }

    #[test]
    fn fast_not_below_slow_rejected() {
        let content = VALID.replace("macd_slow = 35", "macd_slow = 5");
        assert!(SignalConfig::from_config(&adapter(&content)).is_err());
    }

    #[test]
    fn missing_ticker() {
        let content = VALID.replace("ticker_symbol = aapl", "");
        let err = SignalConfig::from_config(&adapter(&content)).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigMissing { .. }));
    }

    #[test]
    fn notify_defaults() {
        let cfg = NotifyConfig::from_config(&adapter(VALID)).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.method, NotifyMethod::Log);
        assert_eq!(cfg.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(cfg.recipient, None);
    }

    #[test]
    fn sendmail_requires_recipient() {
        let content = format!("{VALID}\n[notify]\nmethod = sendmail\n");
        let err = NotifyConfig::from_config(&adapter(&content)).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigMissing { .. }));
    }

    #[test]
    fn app_config_paths() {
        let content = format!("{VALID}\n[data]\npath = /srv/prices\n\n[chart]\noutput = out.svg\n");
        let cfg = AppConfig::from_config(&adapter(&content)).unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("/srv/prices"));
        assert_eq!(cfg.chart_output, Some(PathBuf::from("out.svg")));
    }
}
