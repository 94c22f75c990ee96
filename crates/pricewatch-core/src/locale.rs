//! Number-format conventions used to read price text.
//!
//! A [`LocaleSpec`] is always declared explicitly by a source definition.
//! Nothing in the workspace guesses a locale from the text being parsed.

use crate::error::{ConfigResult, ConfigurationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrow no-break space, the grouping mark of French and Russian numbers.
const NARROW_NBSP: char = '\u{202F}';

/// Known locale tags with their `(decimal, grouping)` separators.
const KNOWN_LOCALES: &[(&str, char, char)] = &[
    ("pt_BR", ',', '.'),
    ("pt_PT", ',', '.'),
    ("de_DE", ',', '.'),
    ("es_ES", ',', '.'),
    ("it_IT", ',', '.'),
    ("nl_NL", ',', '.'),
    ("id_ID", ',', '.'),
    ("en_US", '.', ','),
    ("en_GB", '.', ','),
    ("es_MX", '.', ','),
    ("ja_JP", '.', ','),
    ("zh_CN", '.', ','),
    ("fr_FR", ',', NARROW_NBSP),
    ("ru_RU", ',', NARROW_NBSP),
    ("sv_SE", ',', NARROW_NBSP),
];

/// Decimal and thousands separator convention for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleSpec {
    tag: String,
    decimal: char,
    grouping: char,
}

impl LocaleSpec {
    /// Look up a known locale tag such as `pt_BR` or `en-US`.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownLocale`] for tags outside the
    /// built-in table.
    pub fn from_tag(tag: &str) -> ConfigResult<Self> {
        let wanted = tag.trim().replace('-', "_");

        KNOWN_LOCALES
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(&wanted))
            .map(|(known, decimal, grouping)| Self {
                tag: (*known).to_string(),
                decimal: *decimal,
                grouping: *grouping,
            })
            .ok_or_else(|| ConfigurationError::UnknownLocale(tag.to_string()))
    }

    /// Build a locale with explicit separators.
    ///
    /// # Errors
    /// The decimal mark must be `.` or `,` and must differ from the grouping mark.
    pub fn custom(tag: impl Into<String>, decimal: char, grouping: char) -> ConfigResult<Self> {
        let tag = tag.into();

        if decimal != '.' && decimal != ',' {
            return Err(ConfigurationError::InvalidValue {
                field: format!("locale {tag}"),
                reason: format!("decimal separator must be '.' or ',', got '{decimal}'"),
            });
        }

        if decimal == grouping {
            return Err(ConfigurationError::InvalidValue {
                field: format!("locale {tag}"),
                reason: "decimal and grouping separators must differ".to_string(),
            });
        }

        Ok(Self {
            tag,
            decimal,
            grouping,
        })
    }

    /// Brazilian Portuguese, the convention of every bundled source.
    #[must_use]
    pub fn pt_br() -> Self {
        Self {
            tag: "pt_BR".to_string(),
            decimal: ',',
            grouping: '.',
        }
    }

    /// United States English.
    #[must_use]
    pub fn en_us() -> Self {
        Self {
            tag: "en_US".to_string(),
            decimal: '.',
            grouping: ',',
        }
    }

    /// The locale tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Decimal separator.
    #[must_use]
    pub fn decimal(&self) -> char {
        self.decimal
    }

    /// Thousands separator.
    #[must_use]
    pub fn grouping(&self) -> char {
        self.grouping
    }

    /// Render a decimal the way this locale writes numbers, with grouping.
    #[must_use]
    pub fn format(&self, value: &Decimal) -> String {
        let plain = value.abs().to_string();
        let (integer, fraction) = match plain.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (plain.as_str(), None),
        };

        let mut out = String::with_capacity(plain.len() + integer.len() / 3 + 1);
        if value.is_sign_negative() && !value.is_zero() {
            out.push('-');
        }

        for (i, digit) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                out.push(self.grouping);
            }
            out.push(digit);
        }

        if let Some(fraction) = fraction {
            out.push(self.decimal);
            out.push_str(fraction);
        }

        out
    }
}

impl FromStr for LocaleSpec {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl TryFrom<String> for LocaleSpec {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_tag(&value)
    }
}

impl From<LocaleSpec> for String {
    fn from(locale: LocaleSpec) -> Self {
        locale.tag
    }
}

impl fmt::Display for LocaleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}
