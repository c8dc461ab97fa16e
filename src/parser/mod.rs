//! Tokenizer for question text with embedded LaTeX math.

mod lexer;
mod segment;

pub use lexer::Token;
pub use segment::{
    has_bare_keywords, has_environment, has_explicit_delimiters, tokenize, Tokenizer,
    BARE_KEYWORDS,
};
