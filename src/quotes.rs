use core::fmt;

use serde::{Deserialize, Serialize};

/// Built-in rotation catalog shown before the user supplies a custom
/// quote.
pub const BUILTIN_QUOTES: &[(&str, &str)] = &[
    (
        "The only limit to our realization of tomorrow is our doubts of today.",
        "Franklin D. Roosevelt",
    ),
    (
        "In the middle of every difficulty lies opportunity.",
        "Albert Einstein",
    ),
    ("It always seems impossible until it's done.", "Nelson Mandela"),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    (
        "Do not watch the clock. Do what it does. Keep going.",
        "Sam Levenson",
    ),
    ("What we think, we become.", "Buddha"),
    (
        "Whether you think you can, or you think you can't\u{2014}you're right.",
        "Henry Ford",
    ),
    (
        "The best way to predict the future is to create it.",
        "Peter Drucker",
    ),
    ("Quality is not an act, it is a habit.", "Aristotle"),
    ("Simplicity is the ultimate sophistication.", "Leonardo da Vinci"),
];

/// A quote with attribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    /// Build a quote, trimming surrounding whitespace.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            author: author.into().trim().to_string(),
        }
    }

    /// Validate a user-supplied custom quote; both fields are required.
    pub fn custom(text: &str, author: &str) -> Result<Self, CustomQuoteError> {
        let text = text.trim();
        let author = author.trim();
        if text.is_empty() {
            return Err(CustomQuoteError::EmptyText);
        }
        if author.is_empty() {
            return Err(CustomQuoteError::EmptyAuthor);
        }
        Ok(Self::new(text, author))
    }

    /// Quote body as displayed on the card, wrapped in double quotes.
    pub fn display_text(&self) -> String {
        format!("\"{}\"", self.text)
    }

    /// Attribution as displayed on the card, with a leading dash.
    pub fn display_author(&self) -> String {
        format!("\u{2014} {}", self.author)
    }
}

/// Rejection reason for a custom quote submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomQuoteError {
    EmptyText,
    EmptyAuthor,
}

impl fmt::Display for CustomQuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::EmptyAuthor => write!(f, "quote author must not be empty"),
        }
    }
}

impl std::error::Error for CustomQuoteError {}

/// All built-in quotes as owned values.
pub fn builtin_quotes() -> Vec<Quote> {
    BUILTIN_QUOTES
        .iter()
        .map(|(text, author)| Quote::new(*text, *author))
        .collect()
}

/// Built-in quote by index, wrapping past the end of the catalog.
///
/// Callers supply their own randomness; keeping selection index-based
/// makes rotation deterministic under test.
pub fn builtin_quote(index: usize) -> Quote {
    let (text, author) = BUILTIN_QUOTES[index % BUILTIN_QUOTES.len()];
    Quote::new(text, author)
}
