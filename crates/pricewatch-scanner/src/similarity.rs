//! Token-set fuzzy similarity.
//!
//! Compares two texts as sorted, de-duplicated word sets, so word order and
//! repetition don't matter and extra words on one side only cost a little.

use std::collections::BTreeSet;

/// Score two texts 0..=100 by token-set similarity.
///
/// Both sides are lower-cased and every non-alphanumeric character is
/// treated as a separator. The score is the best indel ratio among the
/// shared tokens and the shared tokens plus each side's leftovers. A text
/// with no tokens scores 0 against anything.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).map(String::as_str).collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).map(String::as_str).collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).map(String::as_str).collect();

    let sorted_sect = intersection.join(" ");
    let combined_a = join_nonempty(&sorted_sect, &only_a.join(" "));
    let combined_b = join_nonempty(&sorted_sect, &only_b.join(" "));

    [
        ratio(&sorted_sect, &combined_a),
        ratio(&sorted_sect, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

fn token_set(text: &str) -> BTreeSet<String> {
    let processed: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    processed.split_whitespace().map(str::to_string).collect()
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Indel similarity `2 * lcs / (len_a + len_b)` scaled to 0..=100.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let total = a.len() + b.len();

    let lcs = longest_common_subsequence(&a, &b);
    (200.0 * lcs as f64 / total as f64).round() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
