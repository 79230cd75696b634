//! Quote data model — records, seed data, category filters, and views.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sentinel filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// A text/category pair, the only domain record.
///
/// Fields are read leniently: imported files are taken as-is, without shape
/// validation (see [`lenient_text`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub category: String,
}

/// Text of an arbitrary JSON field: strings as-is, null or absent as `""`,
/// anything else as its JSON text.
pub fn lenient_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn deserialize_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_text(value.as_ref()))
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Build a quote from any JSON value. Non-object values yield an empty
    /// quote.
    pub fn from_json(value: &Value) -> Self {
        Self {
            text: lenient_text(value.get("text")),
            category: lenient_text(value.get("category")),
        }
    }

    /// One-line display form, `Category: text`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.category, self.text)
    }
}

/// Built-in quotes used when nothing readable is stored yet.
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        Quote::new(
            "Don\u{2019}t let yesterday take up too much of today.",
            "Inspiration",
        ),
        Quote::new(
            "It\u{2019}s not whether you get knocked down, it\u{2019}s whether you get up.",
            "Perseverance",
        ),
    ]
}

/// Distinct categories in first-appearance order.
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c| *c == quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// The selected category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied filter. Empty means `All`; matching is
    /// exact, so no trimming or case folding happens here.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(name) => name,
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => quote.category == *name,
        }
    }

    /// Apply the filter, preserving relative order.
    pub fn apply(&self, quotes: &[Quote]) -> Vec<Quote> {
        quotes.iter().filter(|q| self.matches(q)).cloned().collect()
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The quotes visible under a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub filter: CategoryFilter,
    pub quotes: Vec<Quote>,
}

impl FilterView {
    pub fn new(filter: CategoryFilter, all: &[Quote]) -> Self {
        let quotes = filter.apply(all);
        Self { filter, quotes }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Display lines; an empty view renders a single empty-state line.
    pub fn render(&self) -> Vec<String> {
        if self.is_empty() {
            return vec!["No quotes found for this category.".to_string()];
        }
        self.quotes.iter().map(Quote::render).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Quote> {
        vec![
            Quote::new("a", "Motivation"),
            Quote::new("b", "Humor"),
            Quote::new("c", "Motivation"),
            Quote::new("d", "motivation"),
        ]
    }

    #[test]
    fn seeds_have_three_categories() {
        let seeds = seed_quotes();
        assert_eq!(seeds.len(), 3);
        assert_eq!(
            categories(&seeds),
            vec!["Motivation", "Inspiration", "Perseverance"]
        );
    }

    #[test]
    fn categories_are_distinct_in_first_appearance_order() {
        assert_eq!(
            categories(&sample()),
            vec!["Motivation", "Humor", "motivation"]
        );
        assert!(categories(&[]).is_empty());
    }

    #[test]
    fn filter_all_returns_everything_in_order() {
        let quotes = sample();
        assert_eq!(CategoryFilter::All.apply(&quotes), quotes);
    }

    #[test]
    fn filter_category_is_exact_and_case_sensitive() {
        let filtered = CategoryFilter::parse("Motivation").apply(&sample());
        let texts: Vec<&str> = filtered.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn filter_does_not_trim() {
        let filtered = CategoryFilter::parse(" Humor").apply(&sample());
        assert!(filtered.is_empty());
    }

    #[test]
    fn parse_sentinel_and_empty() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("All"),
            CategoryFilter::Category("All".into())
        );
        assert_eq!(CategoryFilter::All.as_str(), "all");
    }

    #[test]
    fn empty_view_renders_empty_state() {
        let view = FilterView::new(CategoryFilter::parse("Nope"), &sample());
        assert!(view.is_empty());
        assert_eq!(view.render(), vec!["No quotes found for this category."]);
    }

    #[test]
    fn view_renders_category_and_text() {
        let view = FilterView::new(CategoryFilter::parse("Humor"), &sample());
        assert_eq!(view.render(), vec!["Humor: b"]);
    }

    #[test]
    fn lenient_deserialization() {
        let quotes: Vec<Quote> =
            serde_json::from_str(r#"[{"text": "only text"}, {"category": "X", "extra": 1}]"#)
                .unwrap();
        assert_eq!(quotes[0], Quote::new("only text", ""));
        assert_eq!(quotes[1], Quote::new("", "X"));
    }

    #[test]
    fn mistyped_fields_are_stringified() {
        let quotes: Vec<Quote> = serde_json::from_str(
            r#"[{"text": 42, "category": null}, {"text": true, "category": ["a"]}]"#,
        )
        .unwrap();
        assert_eq!(quotes[0], Quote::new("42", ""));
        assert_eq!(quotes[1], Quote::new("true", r#"["a"]"#));
    }

    #[test]
    fn from_json_accepts_any_value() {
        let value = serde_json::json!({"text": "ok", "category": 7});
        assert_eq!(Quote::from_json(&value), Quote::new("ok", "7"));
        assert_eq!(Quote::from_json(&serde_json::json!(5)), Quote::default());
        assert_eq!(lenient_text(None), "");
    }
}
