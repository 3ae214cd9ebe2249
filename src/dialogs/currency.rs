//! Currency conversion dialog (rates relative to the provider's base, USD)

use super::Dialog;
use crate::clients::ExchangeRateProvider;
use crate::error::BotError;
use crate::models::{roles, ClassificationResult, ExchangeRates};
use crate::session::Session;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

pub struct CurrencyDialog {
    rates: Arc<dyn ExchangeRateProvider>,
}

impl CurrencyDialog {
    pub fn new(rates: Arc<dyn ExchangeRateProvider>) -> Self {
        Self { rates }
    }
}

/// `1,234,567` style grouping: 1-3 leading digits, then groups of exactly 3.
fn is_thousands_grouped(integer: &str) -> bool {
    let mut groups = integer.split(',');
    let lead_ok = groups
        .next()
        .map(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false);

    lead_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse the amount entity. Commas are only accepted as thousands separators;
/// decimal commas and negative amounts are rejected.
fn parse_amount(raw: &str) -> Result<f64> {
    let invalid = || BotError::InvalidEntities(format!("'{}' is not a valid amount", raw));
    let trimmed = raw.trim();

    let cleaned = if trimmed.contains(',') {
        let (integer, fraction) = match trimmed.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (trimmed, None),
        };
        if !is_thousands_grouped(integer) || fraction.is_some_and(|f| f.contains(',')) {
            return Err(invalid());
        }
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(invalid)
}

/// Two decimals, widened for small non-zero values so they never print as 0.00.
fn format_amount(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 || magnitude >= 0.01 {
        return format!("{:.2}", value);
    }
    let precision = (-magnitude.log10()).floor() as usize + 2;
    format!("{:.*}", precision, value)
}

/// `amount` in the base currency, expressed in `code`.
pub fn convert(rates: &ExchangeRates, code: &str, amount: f64) -> Result<f64> {
    let code = code.trim().to_uppercase();
    let rate = rates.rates.get(&code).ok_or_else(|| {
        BotError::InvalidEntities(format!("unknown currency code '{}'", code))
    })?;
    Ok(amount * rate)
}

#[async_trait::async_trait]
impl Dialog for CurrencyDialog {
    fn name(&self) -> &'static str {
        "CurrencyDialog"
    }

    async fn run(&self, session: &mut Session, args: &ClassificationResult) -> Result<()> {
        let code = args.require(roles::CURRENCY_CODE)?;
        let amount = parse_amount(args.require(roles::CURRENCY_AMOUNT)?)?;

        let rates = self.rates.latest().await?;
        let converted = convert(&rates, code, amount)?;

        debug!(code, amount, converted, "Converted currency");

        session.send(format!(
            "{} to {} = {}",
            rates.base,
            code.trim().to_uppercase(),
            format_amount(converted)
        ));
        Ok(())
    }
}
