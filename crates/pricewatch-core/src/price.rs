//! Price normalization.
//!
//! Turns a retailer's price text (`"R$ 1.299,90"`, `"US$1,299.90 à vista"`)
//! into a canonical [`Decimal`]. The function is pure and safe to call from
//! any number of adapters at once.

use crate::error::NormalizationError;
use crate::locale::LocaleSpec;
use crate::types::PriceReplacement;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse locale-formatted price text into a canonical decimal.
///
/// The optional `replacement` runs first, then every character other than
/// ASCII digits, `-`, `.` and `,` is discarded, and the remainder is read
/// with the locale's grouping and decimal separators.
///
/// # Errors
/// Fails when no digits survive cleaning, when the separators do not form a
/// number under `locale`, or when the value is negative.
pub fn normalize(
    price_text: &str,
    locale: &LocaleSpec,
    replacement: Option<&PriceReplacement>,
) -> Result<Decimal, NormalizationError> {
    let cleaned = clean_price_text(price_text, replacement);
    parse_decimal(&cleaned, locale)
}

/// Apply the replacement rule and strip everything except `[-0-9.,]`.
#[must_use]
pub fn clean_price_text(price_text: &str, replacement: Option<&PriceReplacement>) -> String {
    let replaced = match replacement {
        Some(rule) if !rule.from.is_empty() => price_text.replace(&rule.from, &rule.to),
        _ => price_text.to_string(),
    };

    replaced
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '.' | ','))
        .collect()
}

/// Read already-cleaned text under a locale.
///
/// Grouping marks are dropped wherever they appear; the decimal mark then
/// becomes `.`. Anything left that is not a plain decimal is rejected.
pub fn parse_decimal(cleaned: &str, locale: &LocaleSpec) -> Result<Decimal, NormalizationError> {
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(NormalizationError::NoDigits {
            text: cleaned.to_string(),
        });
    }

    let canonical: String = cleaned
        .chars()
        .filter(|c| *c != locale.grouping())
        .map(|c| if c == locale.decimal() { '.' } else { c })
        .collect();

    let value = Decimal::from_str(&canonical).map_err(|e| NormalizationError::Invalid {
        text: cleaned.to_string(),
        locale: locale.tag().to_string(),
        reason: e.to_string(),
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(NormalizationError::Negative {
            text: cleaned.to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    #[test]
    fn test_brazilian_price_with_currency() {
        let price = normalize("R$ 1.299,90", &LocaleSpec::pt_br(), None).expect("parse price");
        assert_eq!(price, dec("1299.90"));
    }

    #[test]
    fn test_locale_decides_separators() {
        let pt = normalize("1.234,56", &LocaleSpec::pt_br(), None).expect("pt_BR parse");
        assert_eq!(pt, dec("1234.56"));

        // Same literal under a comma-grouping locale reads the comma as grouping.
        let us = normalize("1.234,56", &LocaleSpec::en_us(), None).expect("en_US parse");
        assert_eq!(us, dec("1.23456"));
    }

    #[test]
    fn test_replacement_runs_before_cleaning() {
        let rule = PriceReplacement::new("\n", ",");
        let price =
            normalize("R$ 1.299\n00", &LocaleSpec::pt_br(), Some(&rule)).expect("parse price");
        assert_eq!(price, dec("1299.00"));
    }

    #[test]
    fn test_no_digits_fails() {
        let err = normalize("Indisponível", &LocaleSpec::pt_br(), None).unwrap_err();
        assert!(matches!(err, NormalizationError::NoDigits { .. }));

        let err = normalize("R$ ,", &LocaleSpec::pt_br(), None).unwrap_err();
        assert!(matches!(err, NormalizationError::NoDigits { .. }));
    }

    #[test]
    fn test_two_decimal_marks_fail() {
        let err = normalize("1,234,56", &LocaleSpec::pt_br(), None).unwrap_err();
        assert!(matches!(err, NormalizationError::Invalid { .. }));
    }

    #[test]
    fn test_price_range_fails() {
        let err = normalize("R$ 10,00 - R$ 20,00", &LocaleSpec::pt_br(), None).unwrap_err();
        assert!(matches!(err, NormalizationError::Invalid { .. }));
    }

    #[test]
    fn test_negative_price_fails() {
        let err = normalize("-15,00", &LocaleSpec::pt_br(), None).unwrap_err();
        assert!(matches!(err, NormalizationError::Negative { .. }));
    }

    #[test]
    fn test_fraction_digits_preserved() {
        let price = normalize("US$ 19.990", &LocaleSpec::en_us(), None).expect("parse price");
        assert_eq!(price.scale(), 3);
        assert_eq!(price.to_string(), "19.990");
    }

    #[test]
    fn test_round_trip_through_locale_format() {
        let values = ["0.99", "12.5", "1234.56", "1000000.00", "87"];
        let locales = [
            LocaleSpec::pt_br(),
            LocaleSpec::en_us(),
            LocaleSpec::from_tag("fr_FR").expect("known locale"),
        ];

        for locale in &locales {
            for raw in values {
                let value = dec(raw);
                let text = locale.format(&value);
                let parsed = normalize(&text, locale, None).expect("round trip parse");
                assert_eq!(parsed, value, "{raw} via {text} in {locale}");
            }
        }
    }
}
