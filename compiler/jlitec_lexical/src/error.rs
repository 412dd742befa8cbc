//! Contains all kinds of lexical errors that can occur while tokenizing a
//! signature.

use enum_as_inner::EnumAsInner;
use jlitec_diagnostic::{Diagnostic, Report, Severity};

/// A character that can't start any token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnexpectedCharacter {
    /// The byte offset of the character.
    pub offset: usize,

    /// The offending character.
    pub character: char,
}

/// A string or character literal is not closed before the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnterminatedLiteral {
    /// The byte offset of the opening quote.
    pub offset: usize,

    /// The opening quote, either `'` or `"`.
    pub quote: char,
}

/// The escape sequence inside a literal is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvalidEscapeSequence {
    /// The byte offset of the backslash.
    pub offset: usize,

    /// The character following the backslash.
    pub character: char,
}

/// An enumeration of all lexical errors.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
    derive_more::From,
    thiserror::Error,
)]
#[allow(missing_docs)]
pub enum Error {
    #[error("unexpected character `{}` at offset {}", .0.character, .0.offset)]
    UnexpectedCharacter(UnexpectedCharacter),

    #[error("unterminated literal starting at offset {}", .0.offset)]
    UnterminatedLiteral(UnterminatedLiteral),

    #[error("invalid escape sequence `\\{}` at offset {}", .0.character, .0.offset)]
    InvalidEscapeSequence(InvalidEscapeSequence),
}

impl Report<&str> for Error {
    fn report(&self, source: &str) -> Diagnostic {
        Diagnostic {
            message: self.to_string(),
            severity: Severity::Error,
            signature: Some(source.to_owned()),
            help_message: match self {
                Self::UnterminatedLiteral(literal) => {
                    Some(format!("close the literal with `{}`", literal.quote))
                }
                Self::UnexpectedCharacter(_)
                | Self::InvalidEscapeSequence(_) => None,
            },
        }
    }
}
