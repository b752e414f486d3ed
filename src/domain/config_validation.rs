//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::backtest::MAX_LOOKBACK_YEARS;
use crate::domain::error::DcaError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_symbol(config)?;
    validate_lookback(config)?;
    validate_rsi_length(config)?;
    validate_end_date(config)?;
    validate_seed(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_sip_amount(config)?;
    validate_rsi_amounts(config)?;
    validate_sell_fraction(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("data", "price_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DcaError::ConfigMissing {
            section: "data".to_string(),
            key: "price_dir".to_string(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> DcaError {
    DcaError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DcaError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_double("backtest", "lookback_years", 10.0);
    if value <= 0.0 || !value.is_finite() || value > MAX_LOOKBACK_YEARS {
        return Err(invalid(
            "backtest",
            "lookback_years",
            &format!("lookback_years must be in (0, {}]", MAX_LOOKBACK_YEARS),
        ));
    }
    Ok(())
}

fn validate_rsi_length(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_int("backtest", "rsi_length", 14);
    if value < 2 {
        return Err(invalid(
            "backtest",
            "rsi_length",
            "rsi_length must be at least 2",
        ));
    }
    Ok(())
}

fn validate_end_date(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("backtest", "end_date") {
        Some(s) if !s.trim().is_empty() => parse_date(&s, "end_date").map(|_| ()),
        _ => Ok(()),
    }
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, DcaError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            field,
            &format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("backtest", "sentiment_seed") {
        Some(s) if !s.trim().is_empty() => s.trim().parse::<u64>().map(|_| ()).map_err(|_| {
            invalid(
                "backtest",
                "sentiment_seed",
                "sentiment_seed must be a non-negative integer",
            )
        }),
        _ => Ok(()),
    }
}

fn validate_sip_amount(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_double("sip", "monthly_amount", 100.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(invalid(
            "sip",
            "monthly_amount",
            "monthly_amount must be positive",
        ));
    }
    Ok(())
}

fn validate_rsi_amounts(config: &dyn ConfigPort) -> Result<(), DcaError> {
    for key in ["buy_low", "buy_mid"] {
        let value = config.get_double("rsi_dca", key, 0.0);
        if value < 0.0 || !value.is_finite() {
            return Err(invalid(
                "rsi_dca",
                key,
                &format!("{} must be a non-negative number", key),
            ));
        }
    }
    Ok(())
}

fn validate_sell_fraction(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_double("sentiment", "sell_fraction", 0.2);
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "sentiment",
            "sell_fraction",
            "sell_fraction must be between 0 and 1",
        ));
    }
    Ok(())
}
