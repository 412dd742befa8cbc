//! This crate provides the token stream consumed by the signature parser.
//!
//! Signatures are short one-line fragments such as
//! `public static Integer valueOf(int i)`; the tokenizer classifies them into
//! identifiers, keywords, punctuation and literals. Whitespace, newlines and
//! the end-of-input marker are kept in the [`token_stream::TokenStream`] so
//! that the stream stays lossless; consumers drop them with
//! [`token_stream::TokenStream::significant`].

pub mod error;
pub mod token;
pub mod token_stream;

pub use token_stream::tokenize;
