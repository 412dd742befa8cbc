//! Is a module containing the [`Token`] type and all of its related types.

use enum_as_inner::EnumAsInner;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Is an enumeration of all keywords recognized in a signature.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum Keyword {
    Class,
    Interface,
    Enum,
    Extends,
    Implements,
    Super,
    Public,
    Private,
    Protected,
    Abstract,
    Static,
    Final,
    Transient,
}

/// Represents a single classified token of a signature.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Token {
    /// A name such as `ArrayList`, `int` or `message`.
    Identifier(String),

    /// One of the [`Keyword`]s.
    Keyword(Keyword),

    /// A single punctuation character, e.g. `<`, `,` or `&`.
    Punctuation(char),

    /// The variadic marker `...`.
    Ellipsis,

    /// An integral literal; a trailing `L` is consumed.
    Integer(i64),

    /// A floating-point literal; a trailing `f` or `d` is consumed.
    FloatingPoint(f64),

    /// `true` or `false`.
    Boolean(bool),

    /// A double-quoted literal with escapes decoded.
    String(String),

    /// A single-quoted literal with escapes decoded.
    Character(char),

    /// A run of spaces or tabs.
    Whitespace,

    /// A line break.
    NewLine,

    /// A character that doesn't start any token.
    Unknown(char),

    /// Marks the end of the signature; always the last token of a stream.
    EndOfInput,
}

impl Token {
    /// Returns `true` for the tokens that carry no meaning for the parser.
    #[must_use]
    pub const fn is_insignificant(&self) -> bool {
        matches!(self, Self::Whitespace | Self::NewLine | Self::EndOfInput)
    }

    /// Returns `true` if the token is the given punctuation.
    #[must_use]
    pub fn is_punctuation_char(&self, punctuation: char) -> bool {
        matches!(self, Self::Punctuation(found) if *found == punctuation)
    }

    /// Returns `true` if the token is the given keyword.
    #[must_use]
    pub fn is_keyword_of(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(found) if *found == keyword)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Keyword(keyword) => write!(f, "{keyword}"),
            Self::Punctuation(punctuation) | Self::Unknown(punctuation) => {
                write!(f, "{punctuation}")
            }
            Self::Ellipsis => write!(f, "..."),
            Self::Integer(value) => write!(f, "{value}"),
            Self::FloatingPoint(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Character(value) => write!(f, "{value:?}"),
            Self::Whitespace => write!(f, " "),
            Self::NewLine => writeln!(f),
            Self::EndOfInput => write!(f, "end of signature"),
        }
    }
}
