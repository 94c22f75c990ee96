#![allow(clippy::must_use_candidate)]

use crate::similarity::token_set_ratio;
use pricewatch_core::{ConfigurationError, MatchMode, NormalizedRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum similarity a description must *exceed* to be relevant.
pub const RELEVANCE_THRESHOLD: u8 = 90;

/// One matching request: the product and the term constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    target: String,
    exclude_terms: BTreeSet<String>,
    include_terms: BTreeSet<String>,
    match_mode: MatchMode,
}

impl FilterQuery {
    /// Build a query, normalizing terms to lowercase tokens.
    ///
    /// # Errors
    /// A blank target, or a term that is blank or holds more than one word.
    /// Multi-word terms are rejected because descriptions are compared word
    /// by word and such a term could never match.
    pub fn new<E, I>(
        target: &str,
        exclude_terms: E,
        include_terms: I,
        match_mode: MatchMode,
    ) -> Result<Self, ConfigurationError>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let target = target.trim();
        if target.is_empty() {
            return Err(ConfigurationError::EmptyQuery);
        }

        Ok(Self {
            target: target.to_string(),
            exclude_terms: normalize_terms(exclude_terms)?,
            include_terms: normalize_terms(include_terms)?,
            match_mode,
        })
    }

    /// Query with no term constraints.
    pub fn target_only(target: &str) -> Result<Self, ConfigurationError> {
        Self::new(target, [""; 0], [""; 0], MatchMode::All)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn exclude_terms(&self) -> &BTreeSet<String> {
        &self.exclude_terms
    }

    pub fn include_terms(&self) -> &BTreeSet<String> {
        &self.include_terms
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
}

fn normalize_terms<T>(terms: T) -> Result<BTreeSet<String>, ConfigurationError>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| {
            let raw = term.as_ref();
            let token = normalize_token(raw);
            if token.is_empty() {
                return Err(ConfigurationError::InvalidTerm {
                    term: raw.to_string(),
                    reason: "term is blank".to_string(),
                });
            }
            if token.chars().any(char::is_whitespace) {
                return Err(ConfigurationError::InvalidTerm {
                    term: raw.to_string(),
                    reason: "term must be a single word".to_string(),
                });
            }
            Ok(token)
        })
        .collect()
}

/// Lowercase a word and strip the punctuation around it.
fn normalize_token(word: &str) -> String {
    word.trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Lowercase word set of a description.
pub fn description_tokens(description: &str) -> BTreeSet<String> {
    description
        .split_whitespace()
        .map(normalize_token)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Decides which records are relevant to a [`FilterQuery`].
///
/// Stateless; one instance can serve any number of concurrent scans.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceFilter;

impl RelevanceFilter {
    /// Strict threshold check: exactly [`RELEVANCE_THRESHOLD`] fails.
    pub fn passes_threshold(score: u8) -> bool {
        score > RELEVANCE_THRESHOLD
    }

    /// Whether one description satisfies the query.
    pub fn matches(query: &FilterQuery, description: &str) -> bool {
        if !Self::passes_threshold(token_set_ratio(query.target(), description)) {
            return false;
        }

        let tokens = description_tokens(description);

        if query.exclude_terms.iter().any(|term| tokens.contains(term)) {
            return false;
        }

        if query.include_terms.is_empty() {
            return true;
        }

        match query.match_mode {
            MatchMode::All => query.include_terms.iter().all(|term| tokens.contains(term)),
            MatchMode::Any => query.include_terms.iter().any(|term| tokens.contains(term)),
        }
    }

    /// Keep the matching records, in input order.
    pub fn filter(query: &FilterQuery, candidates: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
        candidates
            .into_iter()
            .filter(|record| Self::matches(query, record.description()))
            .collect()
    }
}
