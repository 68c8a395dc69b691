//! Configuration validation.
//!
//! Validates all config fields before any price data is fetched. Value
//! parsing itself lives in `signal_config`; these checks cover the rules that
//! parsing alone does not enforce.

use crate::domain::error::SigtraderError;
use crate::domain::signal_config::{parse_date, resolve_indicator, NotifyConfig};
use crate::ports::config_port::ConfigPort;

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_ticker(config)?;
    parse_date(config, "signal", "start_date")?;
    resolve_indicator(config)?;
    validate_initial_shares(config)?;
    Ok(())
}

pub fn validate_output_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    NotifyConfig::from_config(config)?;
    validate_recipient(config)?;
    validate_chart_output(config)?;
    Ok(())
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let ticker = config
        .get_nonempty("signal", "ticker_symbol")
        .ok_or_else(|| SigtraderError::config_missing("signal", "ticker_symbol"))?;
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_');
    if !ticker.chars().all(allowed) {
        return Err(SigtraderError::config_invalid(
            "signal",
            "ticker_symbol",
            format!("'{ticker}' contains characters not allowed in a ticker"),
        ));
    }
    Ok(())
}

fn validate_initial_shares(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(raw) = config.get_nonempty("signal", "initial_shares") {
        if raw.parse::<u64>().is_err() {
            return Err(SigtraderError::config_invalid(
                "signal",
                "initial_shares",
                "initial_shares must be a non-negative integer",
            ));
        }
    }
    Ok(())
}

fn validate_recipient(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(recipient) = config.get_nonempty("notify", "recipient") {
        let valid = recipient
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !valid {
            return Err(SigtraderError::config_invalid(
                "notify",
                "recipient",
                format!("'{recipient}' is not an e-mail address"),
            ));
        }
    }
    Ok(())
}

fn validate_chart_output(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(output) = config.get_nonempty("chart", "output") {
        if !output.to_ascii_lowercase().ends_with(".svg") {
            return Err(SigtraderError::config_invalid(
                "chart",
                "output",
                "chart output must be an .svg file",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = "[signal]\nticker_symbol = BRK-B\nstart_date = 2023-06-01\nindicator_choice = Stochastic\ninitial_shares = 3\n";

    #[test]
    fn valid_signal_section() {
        assert!(validate_signal_config(&adapter(VALID)).is_ok());
    }

    #[test]
    fn ticker_with_spaces_rejected() {
        let content = VALID.replace("BRK-B", "BRK B");
        let err = validate_signal_config(&adapter(&content)).unwrap_err();
        assert!(err.to_string().contains("ticker_symbol"));
    }

    #[test]
    fn bad_date_rejected() {
        let content = VALID.replace("2023-06-01", "06/01/2023");
        let err = validate_signal_config(&adapter(&content)).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn missing_indicator_rejected() {
        let content = VALID.replace("indicator_choice = Stochastic\n", "");
        let err = validate_signal_config(&adapter(&content)).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigMissing { .. }));
    }

    #[test]
    fn non_integer_shares_rejected() {
        let content = VALID.replace("initial_shares = 3", "initial_shares = 2.5");
        assert!(validate_signal_config(&adapter(&content)).is_err());
    }

    #[test]
    fn output_section_optional() {
        assert!(validate_output_config(&adapter(VALID)).is_ok());
    }

    #[test]
    fn bad_recipient_rejected() {
        let content = format!("{VALID}[notify]\nrecipient = nobody\n");
        let err = validate_output_config(&adapter(&content)).unwrap_err();
        assert!(err.to_string().contains("recipient"));
    }

    #[test]
    fn chart_must_be_svg() {
        let content = format!("{VALID}[chart]\noutput = chart.png\n");
        assert!(validate_output_config(&adapter(&content)).is_err());
    }
}
