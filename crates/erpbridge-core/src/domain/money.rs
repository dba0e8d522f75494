use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Exact monetary amount with its ISO-4217 currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            amount,
            currency: validate_currency_code(currency.as_ref())?,
        })
    }

    /// Subtracts `other` when both amounts share a currency.
    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money {
            amount: self.amount.checked_sub(other.amount)?,
            currency: self.currency.clone(),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Decimal read from a vendor string, with the currency marker found next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAmount {
    pub amount: Decimal,
    pub currency: Option<String>,
}

/// Parses vendor amount strings.
///
/// Handles `.` or `,` decimal separators, `.` `,` space and apostrophe
/// thousands separators, and a currency code or symbol on either side
/// (`"EUR 1.234,56"`, `"1,234.56 USD"`, `"€ 12,50"`). A lone comma is read as
/// the decimal separator; repeated separators of one kind are thousands marks.
pub fn parse_amount(input: &str) -> Option<ParsedAmount> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (currency_prefix, rest) = split_currency_prefix(trimmed)?;
    let (number, currency_suffix) = split_currency_suffix(rest.trim())?;
    let currency = match (currency_prefix, currency_suffix) {
        (Some(prefix), Some(suffix)) if prefix != suffix => return None,
        (Some(code), _) | (None, Some(code)) => Some(code),
        (None, None) => None,
    };

    let mut cleaned: String = number
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '\'' | '\u{a0}' | '\u{202f}'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');
    cleaned = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches(',').count() > 1 => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;

    Some(ParsedAmount { amount, currency })
}

fn symbol_currency(ch: char) -> Option<&'static str> {
    match ch {
        '€' => Some("EUR"),
        '$' => Some("USD"),
        '£' => Some("GBP"),
        '¥' => Some("JPY"),
        _ => None,
    }
}

fn split_currency_prefix(input: &str) -> Option<(Option<String>, &str)> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if let Some(code) = symbol_currency(first) {
        return Some((Some(code.to_owned()), chars.as_str()));
    }

    let alpha_len = input
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .count();
    match alpha_len {
        0 => Some((None, input)),
        3 => Some((Some(input[..3].to_ascii_uppercase()), &input[3..])),
        _ => None,
    }
}

fn split_currency_suffix(input: &str) -> Option<(&str, Option<String>)> {
    let last = input.chars().next_back()?;
    if let Some(code) = symbol_currency(last) {
        return Some((&input[..input.len() - last.len_utf8()], Some(code.to_owned())));
    }

    let alpha_len = input
        .chars()
        .rev()
        .take_while(char::is_ascii_alphabetic)
        .count();
    match alpha_len {
        0 => Some((input, None)),
        3 => {
            let split = input.len() - 3;
            Some((&input[..split], Some(input[split..].to_ascii_uppercase())))
        }
        _ => None,
    }
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(input: &str) -> Decimal {
        parse_amount(input)
            .unwrap_or_else(|| panic!("'{input}' should parse"))
            .amount
    }

    fn dec(input: &str) -> Decimal {
        Decimal::from_str(input).expect("literal decimal")
    }

    #[test]
    fn validates_currency() {
        assert_eq!(validate_currency_code("usd").expect("must normalize"), "USD");
        assert!(matches!(
            validate_currency_code("USDT"),
            Err(ValidationError::InvalidCurrency { .. })
        ));
    }

    #[test]
    fn parses_separator_styles() {
        assert_eq!(amount("1234.56"), dec("1234.56"));
        assert_eq!(amount("1.234,56"), dec("1234.56"));
        assert_eq!(amount("1,234.56"), dec("1234.56"));
        assert_eq!(amount("1 234,56"), dec("1234.56"));
        assert_eq!(amount("1'234.56"), dec("1234.56"));
        assert_eq!(amount("12,5"), dec("12.5"));
        assert_eq!(amount("1.234.567"), dec("1234567"));
        assert_eq!(amount("-42,10"), dec("-42.10"));
    }

    #[test]
    fn splits_currency_markers() {
        let parsed = parse_amount("EUR 1.234,56").expect("parses");
        assert_eq!(parsed.amount, dec("1234.56"));
        assert_eq!(parsed.currency.as_deref(), Some("EUR"));

        let parsed = parse_amount("99.90 usd").expect("parses");
        assert_eq!(parsed.currency.as_deref(), Some("USD"));

        let parsed = parse_amount("€ 12,50").expect("parses");
        assert_eq!(parsed.amount, dec("12.50"));
        assert_eq!(parsed.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn rejects_unparseable_amounts() {
        assert!(parse_amount("").is_none());
        assert!(parse_amount("n/a").is_none());
        assert!(parse_amount("EURO 12").is_none());
        assert!(parse_amount("EUR 12 USD").is_none());
    }

    #[test]
    fn subtracts_same_currency_only() {
        let total = Money::new(dec("100"), "EUR").expect("valid");
        let paid = Money::new(dec("40"), "eur").expect("valid");
        assert_eq!(total.checked_sub(&paid).map(|m| m.amount), Some(dec("60")));

        let other = Money::new(dec("40"), "USD").expect("valid");
        assert!(total.checked_sub(&other).is_none());
    }
}
