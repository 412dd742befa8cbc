//! A cursor over the significant tokens of one signature.

use jlitec_lexical::token::{Keyword, Token};
use jlitec_term::class_like::Visibility;

/// The modifiers preceding a declaration, attribute or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct Modifiers {
    pub(crate) visibility: Visibility,
    pub(crate) is_abstract: bool,
    pub(crate) is_static: bool,
    pub(crate) is_final: bool,
    pub(crate) is_transient: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Parser {
    signature: String,
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    pub(crate) fn new(signature: &str, tokens: Vec<Token>) -> Self {
        Self { signature: signature.to_owned(), tokens, cursor: 0 }
    }

    pub(crate) fn signature(&self) -> &str { &self.signature }

    pub(crate) fn peek(&self) -> Option<&Token> { self.tokens.get(self.cursor) }

    pub(crate) fn peek_nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + offset)
    }

    pub(crate) fn peek_identifier(&self) -> Option<&str> {
        self.peek().and_then(|x| x.as_identifier()).map(String::as_str)
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;

        Some(token)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Describes the next token for diagnostics.
    pub(crate) fn found(&self) -> String {
        self.peek().unwrap_or(&Token::EndOfInput).to_string()
    }

    /// The tokens that haven't been consumed yet.
    pub(crate) fn remaining(&self) -> Vec<Token> {
        self.tokens[self.cursor.min(self.tokens.len())..].to_vec()
    }

    pub(crate) fn eat_punctuation(&mut self, punctuation: char) -> bool {
        self.eat_if(|x| x.is_punctuation_char(punctuation))
    }

    pub(crate) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        self.eat_if(|x| x.is_keyword_of(keyword))
    }

    pub(crate) fn eat_ellipsis(&mut self) -> bool {
        self.eat_if(|x| matches!(x, Token::Ellipsis))
    }

    fn eat_if(&mut self, predicate: impl FnOnce(&Token) -> bool) -> bool {
        if self.peek().is_some_and(predicate) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Consumes modifier keywords in any order. The last visibility keyword
    /// wins; without one, the visibility is public.
    pub(crate) fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();

        while let Some(Token::Keyword(keyword)) = self.peek() {
            match keyword {
                Keyword::Public => modifiers.visibility = Visibility::Public,
                Keyword::Protected => {
                    modifiers.visibility = Visibility::Protected;
                }
                Keyword::Private => modifiers.visibility = Visibility::Private,
                Keyword::Abstract => modifiers.is_abstract = true,
                Keyword::Static => modifiers.is_static = true,
                Keyword::Final => modifiers.is_final = true,
                Keyword::Transient => modifiers.is_transient = true,
                _ => break,
            }

            self.cursor += 1;
        }

        modifiers
    }
}
