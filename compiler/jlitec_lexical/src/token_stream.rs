//! Contains the [`TokenStream`] struct and the [`tokenize`] entry point.

use std::{
    iter::Peekable,
    str::{CharIndices, FromStr},
};

use bimap::BiHashMap;
use derive_more::Deref;
use jlitec_handler::Handler;
use lazy_static::lazy_static;

use crate::{
    error::{
        self, InvalidEscapeSequence, UnexpectedCharacter, UnterminatedLiteral,
    },
    token::{Keyword, Token},
};

lazy_static! {
    /// A bidirectional map that maps an escape sequence (on the left) to its
    /// representation (on the right).
    static ref ESCAPE_SEQUENCE_BY_REPRESENTATION: BiHashMap<char, char> = {
        let mut map = BiHashMap::new();

        map.insert('\'', '\'');
        map.insert('"', '"');
        map.insert('\\', '\\');
        map.insert('t', '\t');
        map.insert('n', '\n');
        map.insert('r', '\r');
        map.insert('0', '\0');

        map
    };
}

/// Is an ordered list of tokens produced from a single signature.
///
/// The last token is always [`Token::EndOfInput`].
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Returns the tokens without whitespace, newlines and the end marker.
    #[must_use]
    pub fn significant(&self) -> Vec<Token> {
        self.tokens.iter().filter(|x| !x.is_insignificant()).cloned().collect()
    }

    /// Consumes the stream and returns all tokens.
    #[must_use]
    pub fn into_vec(self) -> Vec<Token> { self.tokens }
}

/// Tokenizes the given signature.
///
/// Lexical errors are reported to the `handler`; the offending character
/// becomes a [`Token::Unknown`] so the stream stays complete.
#[must_use]
pub fn tokenize(
    source: &str,
    handler: &dyn Handler<error::Error>,
) -> TokenStream {
    let mut tokenizer =
        Tokenizer { iter: source.char_indices().peekable(), handler };
    let mut tokens = Vec::new();

    while let Some(token) = tokenizer.next_token() {
        tokens.push(token);
    }

    tokens.push(Token::EndOfInput);

    TokenStream { tokens }
}

struct Tokenizer<'a, 'h> {
    iter: Peekable<CharIndices<'a>>,
    handler: &'h dyn Handler<error::Error>,
}

fn is_whitespace(character: char) -> bool {
    character.is_whitespace() && character != '\n' && character != '\r'
}

fn is_first_identifier_character(character: char) -> bool {
    character == '_' || character == '$' || character.is_alphabetic()
}

fn is_identifier_character(character: char) -> bool {
    is_first_identifier_character(character) || character.is_ascii_digit()
}

impl Tokenizer<'_, '_> {
    fn walk(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();

        while let Some((_, character)) = self.iter.peek().copied() {
            if !predicate(character) {
                break;
            }

            taken.push(character);
            self.iter.next();
        }

        taken
    }

    fn next_token(&mut self) -> Option<Token> {
        let (offset, character) = self.iter.next()?;

        let token = match character {
            '\r' | '\n' => {
                if character == '\r'
                    && matches!(self.iter.peek(), Some((_, '\n')))
                {
                    self.iter.next();
                }

                Token::NewLine
            }

            character if is_whitespace(character) => {
                self.walk(is_whitespace);
                Token::Whitespace
            }

            character if is_first_identifier_character(character) => {
                let mut word = character.to_string();
                word.push_str(&self.walk(is_identifier_character));

                match word.as_str() {
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    _ => Keyword::from_str(&word)
                        .map_or(Token::Identifier(word), Token::Keyword),
                }
            }

            character if character.is_ascii_digit() => {
                self.handle_numeric_literal(character)
            }

            '.' => {
                let mut lookahead = self.iter.clone();

                if matches!(lookahead.next(), Some((_, '.')))
                    && matches!(lookahead.next(), Some((_, '.')))
                {
                    self.iter.next();
                    self.iter.next();
                    Token::Ellipsis
                } else {
                    Token::Punctuation('.')
                }
            }

            '"' => self.handle_string_literal(offset),

            '\'' => self.handle_character_literal(offset),

            '<' | '>' | ',' | '(' | ')' | '[' | ']' | '&' | ';' | '{' | '}'
            | '=' => Token::Punctuation(character),

            character => {
                self.handler.receive(error::Error::UnexpectedCharacter(
                    UnexpectedCharacter { offset, character },
                ));

                Token::Unknown(character)
            }
        };

        Some(token)
    }

    fn handle_numeric_literal(&mut self, first: char) -> Token {
        let mut digits = first.to_string();
        digits.push_str(&self.walk(|x| x.is_ascii_digit() || x == '_'));

        let mut is_floating = false;
        let mut lookahead = self.iter.clone();

        if matches!(lookahead.next(), Some((_, '.')))
            && matches!(lookahead.peek(), Some((_, x)) if x.is_ascii_digit())
        {
            self.iter.next();
            digits.push('.');
            digits.push_str(&self.walk(|x| x.is_ascii_digit()));
            is_floating = true;
        }

        let digits = digits.replace('_', "");

        match self.iter.peek().map(|(_, x)| *x) {
            Some('L' | 'l') if !is_floating => {
                self.iter.next();
            }
            Some('f' | 'F' | 'd' | 'D') => {
                self.iter.next();
                is_floating = true;
            }
            _ => {}
        }

        if is_floating {
            Token::FloatingPoint(digits.parse().unwrap_or_default())
        } else {
            Token::Integer(digits.parse().unwrap_or(i64::MAX))
        }
    }

    /// Reads one (possibly escaped) character of a literal body.
    fn literal_character(&mut self) -> Option<char> {
        let (offset, character) = self.iter.next()?;

        if character != '\\' {
            return Some(character);
        }

        let (_, escaped) = self.iter.next()?;

        if let Some(value) =
            ESCAPE_SEQUENCE_BY_REPRESENTATION.get_by_left(&escaped).copied()
        {
            Some(value)
        } else {
            self.handler.receive(error::Error::InvalidEscapeSequence(
                InvalidEscapeSequence { offset, character: escaped },
            ));

            Some(escaped)
        }
    }

    fn handle_string_literal(&mut self, offset: usize) -> Token {
        let mut value = String::new();

        loop {
            if matches!(self.iter.peek(), Some((_, '"'))) {
                self.iter.next();
                return Token::String(value);
            }

            if matches!(self.iter.peek(), None | Some((_, '\n' | '\r'))) {
                self.handler.receive(error::Error::UnterminatedLiteral(
                    UnterminatedLiteral { offset, quote: '"' },
                ));

                return Token::String(value);
            }

            if let Some(character) = self.literal_character() {
                value.push(character);
            }
        }
    }

    fn handle_character_literal(&mut self, offset: usize) -> Token {
        let character = if matches!(self.iter.peek(), None | Some((_, '\''))) {
            None
        } else {
            self.literal_character()
        };

        if matches!(self.iter.peek(), Some((_, '\''))) {
            self.iter.next();
        } else {
            self.handler.receive(error::Error::UnterminatedLiteral(
                UnterminatedLiteral { offset, quote: '\'' },
            ));
        }

        Token::Character(character.unwrap_or('\0'))
    }
}
