//! Column name normalization.
//!
//! Data sources name columns in whatever convention the schema author liked
//! (`CUSTOMER_ID`, `customer_id`, `CustomerID`, `Customer Id`). Members are
//! declared in code casing. [`to_camel_case`] turns a column name into a
//! single camel-case candidate so the resolver can retry a failed lookup.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

/// A trailing upper-case `ID` glued to a lower-case word, digit, or separator.
static UPPER_ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9 _]ID$").expect("Invalid ID suffix regex"));

static ALL_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9 ]+$").expect("Invalid upper-case regex"));

static ALL_LOWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("Invalid lower-case regex"));

/// Converts a column name into a camel-case member name candidate.
///
/// Empty input (or input with no word characters at all) produces a random
/// placeholder such as `a3f2...`, which never matches a declared member.
///
/// ```
/// use rowmap_map::to_camel_case;
///
/// assert_eq!(to_camel_case("CUSTOMER_ID"), "customerId");
/// assert_eq!(to_camel_case("customerID"), "customerId");
/// assert_eq!(to_camel_case("Customer_Id"), "customerId");
/// ```
pub fn to_camel_case(name: &str) -> String {
    if name.is_empty() {
        return placeholder();
    }

    let ends_with_id = UPPER_ID_SUFFIX.is_match(name);
    let stem = if ends_with_id {
        &name[..name.len() - 2]
    } else {
        name
    };

    let mut pascal = make_pascal_case(stem);
    if ends_with_id {
        pascal.push_str("Id");
    }

    let word: String = pascal
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => placeholder(),
    }
}

fn placeholder() -> String {
    format!("a{}", Uuid::new_v4().simple())
}

fn make_pascal_case(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if matches!(c, '_' | '$' | '#') { ' ' } else { c })
        .collect();

    let spaced = if ALL_UPPER.is_match(&spaced) {
        spaced.to_lowercase()
    } else {
        spaced
    };

    // Mixed case without separators is already cased by its author.
    if !spaced.contains(' ') && !ALL_LOWER.is_match(&spaced) {
        return spaced;
    }

    title_case(&spaced)
}

/// Upper-cases the first letter of each space-separated word and lower-cases
/// the rest. Words written entirely in capitals are kept as they are.
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(title_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_word(word: &str) -> String {
    let has_letters = word.chars().any(char::is_alphabetic);
    if has_letters && !word.chars().any(char::is_lowercase) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Compares two names ignoring case.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
