//! Quick-add parsing: structured expense fields from free text
//!
//! "coffee $5.50" or "uber ride 25" become amount, description, and
//! category. The amount rule and the keyword priority table are module
//! data so each stage can be tested on its own.

use regex::Regex;

use crate::error::{Error, Result};

/// Matches a numeric token, optionally preceded by a currency symbol.
/// The first match is the amount; every match is stripped from the
/// description.
const AMOUNT_PATTERN: &str = r"\$?(\d+\.?\d*)";

/// Category keyword sets, tested in order against the lower-cased
/// description; the first set with a substring hit wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Food",
        &["coffee", "lunch", "dinner", "food", "restaurant", "eat", "pizza", "burger"],
    ),
    (
        "Transport",
        &["uber", "taxi", "gas", "fuel", "parking", "bus", "train", "transport"],
    ),
    (
        "Entertainment",
        &["movie", "cinema", "game", "entertainment", "concert", "show"],
    ),
    (
        "Groceries",
        &["grocery", "supermarket", "shopping", "store", "market"],
    ),
    (
        "Bills",
        &["bill", "electric", "water", "internet", "phone", "utility"],
    ),
    (
        "Health",
        &["medicine", "doctor", "hospital", "pharmacy", "health"],
    ),
];

/// Fallback when no keyword set matches
pub const FALLBACK_CATEGORY: &str = "Other";

/// Outcome of parsing a quick-add string
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuickAdd {
    pub amount: f64,
    pub description: String,
    pub category: &'static str,
}

/// Extract the first numeric token as the amount
pub fn extract_amount(text: &str) -> Result<Option<f64>> {
    let re = Regex::new(AMOUNT_PATTERN)?;
    let amount = re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());
    Ok(amount)
}

/// Remove every numeric token from the text
pub fn strip_amounts(text: &str) -> Result<String> {
    let re = Regex::new(AMOUNT_PATTERN)?;
    Ok(re.replace_all(text, "").trim().to_string())
}

/// Classify a description against the keyword table
pub fn classify_category(description: &str) -> &'static str {
    let lowered = description.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return category;
        }
    }
    FALLBACK_CATEGORY
}

/// Parse a quick-add string; fails with `NoAmountFound` when no numeric
/// token is present
pub fn parse(text: &str) -> Result<ParsedQuickAdd> {
    let amount = extract_amount(text)?.ok_or(Error::NoAmountFound)?;

    let mut description = strip_amounts(text)?;
    if description.is_empty() {
        description = format!("Expense for ${}", amount);
    }

    let category = classify_category(&description);

    Ok(ParsedQuickAdd {
        amount,
        description,
        category,
    })
}
