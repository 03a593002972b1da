//! Token counting - the seam between the aggregation core and a model's tokenizer
//!
//! A [`TokenCounter`] returns token and billable-character counts for a text
//! under a given model. Two implementations exist:
//! - `backends::vertex::VertexTokenCounter` asks the Vertex AI `countTokens`
//!   endpoint and reports the model's exact numbers
//! - [`LocalTokenCounter`] estimates offline with tiktoken (cl100k_base by
//!   default) or a fast heuristic
//!
//! Usage:
//! ```rust,ignore
//! let counter = LocalTokenCounter::new(Encoding::default());
//! let counts = counter.count_tokens("gemini-1.5-flash", "Hello world")?;
//! ```

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

use crate::core::error::TokenizerError;
use crate::core::model::TokenCounts;

/// Models the metrics step accepts
pub const SUPPORTED_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro"];

/// The fast model used when none is given
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Check a model identifier against the allow-list
pub fn is_supported_model(model: &str) -> bool {
    SUPPORTED_MODELS.contains(&model)
}

/// Counts tokens and billable characters of a text for a model
pub trait TokenCounter {
    fn count_tokens(&self, model: &str, text: &str) -> Result<TokenCounts, TokenizerError>;
}

/// Local encodings for offline estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// cl100k_base encoding
    #[default]
    Cl100k,
    /// o200k_base encoding
    O200k,
    /// Fast heuristic estimation (no BPE encoding)
    Heuristic,
}

impl Encoding {
    /// Get the underlying BPE encoding
    fn get_bpe(&self) -> Option<Result<&'static CoreBPE, &'static String>> {
        match self {
            Encoding::Cl100k => Some((*CL100K_BPE).as_ref()),
            Encoding::O200k => Some((*O200K_BPE).as_ref()),
            Encoding::Heuristic => None,
        }
    }

    /// List all available encodings
    pub fn available() -> &'static [&'static str] {
        &["cl100k", "o200k", "heuristic"]
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Cl100k => "cl100k",
            Encoding::O200k => "o200k",
            Encoding::Heuristic => "heuristic",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "default" => Ok(Encoding::Cl100k),
            "o200k" | "o200k_base" => Ok(Encoding::O200k),
            "heuristic" | "fast" | "estimate" => Ok(Encoding::Heuristic),
            _ => Err(format!(
                "Unknown encoding: {}. Available: {}",
                s,
                Encoding::available().join(", ")
            )),
        }
    }
}

// Lazy-initialized BPE encodings (loaded once on first use)
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

/// Offline estimate of the counts a remote tokenizer would report
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenCounter {
    encoding: Encoding,
}

impl LocalTokenCounter {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }
}

impl TokenCounter for LocalTokenCounter {
    fn count_tokens(&self, _model: &str, text: &str) -> Result<TokenCounts, TokenizerError> {
        let total_tokens = match self.encoding.get_bpe() {
            Some(Ok(bpe)) => bpe.encode_with_special_tokens(text).len(),
            Some(Err(e)) => return Err(TokenizerError::Encoding(e.clone())),
            None => estimate_tokens_heuristic(text),
        };

        Ok(TokenCounts {
            total_tokens: total_tokens as u64,
            total_billable_characters: count_billable_characters(text),
        })
    }
}

/// Billable characters: every character except whitespace
pub fn count_billable_characters(text: &str) -> u64 {
    text.chars().filter(|c| !c.is_whitespace()).count() as u64
}

/// Estimate tokens using a fast heuristic (no BPE encoding)
///
/// The heuristic accounts for:
/// - ASCII text: ~4 characters per token
/// - Code symbols: ~2 characters per token
/// - CJK characters: ~1.5 characters per token
/// - Other Unicode: ~2 characters per token
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let mut ascii_chars = 0usize;
    let mut cjk_chars = 0usize;
    let mut other_unicode = 0usize;
    let mut whitespace = 0usize;
    let mut code_symbols = 0usize;

    for c in text.chars() {
        if c.is_ascii_whitespace() {
            whitespace += 1;
        } else if c.is_ascii() {
            if is_code_symbol(c) {
                code_symbols += 1;
            } else {
                ascii_chars += 1;
            }
        } else if is_cjk_char(c) {
            cjk_chars += 1;
        } else {
            other_unicode += 1;
        }
    }

    let ascii_tokens = (ascii_chars + whitespace).div_ceil(4);
    let symbol_tokens = code_symbols.div_ceil(2);
    let cjk_tokens = (cjk_chars * 2).div_ceil(3);
    let other_tokens = other_unicode.div_ceil(2);

    ascii_tokens + symbol_tokens + cjk_tokens + other_tokens
}

#[inline]
fn is_code_symbol(c: char) -> bool {
    c.is_ascii_punctuation() && c != '_'
}

#[inline]
fn is_cjk_char(c: char) -> bool {
    let cp = c as u32;
    (0x4E00..=0x9FFF).contains(&cp)      // CJK Unified Ideographs
        || (0x3400..=0x4DBF).contains(&cp)  // CJK Extension A
        || (0x3000..=0x303F).contains(&cp)  // CJK Symbols and Punctuation
        || (0x3040..=0x309F).contains(&cp)  // Hiragana
        || (0x30A0..=0x30FF).contains(&cp)  // Katakana
        || (0xAC00..=0xD7AF).contains(&cp)  // Hangul Syllables
        || (0xFF00..=0xFFEF).contains(&cp) // Fullwidth Forms
}
