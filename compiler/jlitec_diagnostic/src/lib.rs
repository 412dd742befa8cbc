//! Contains the definition of the [`Diagnostic`] struct and related types.

use std::fmt;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Implement this trait for a type that can report a diagnostic.
///
/// This trait is typically implemented by the structs that encode a single
/// error or warning condition. The struct stays small and data-only; the
/// rendering happens here with the help of `Param`.
pub trait Report<Param> {
    /// Creates a diagnostic.
    fn report(&self, parameter: Param) -> Diagnostic;
}

/// Enumeration of the severity levels of a diagnostic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Severity {
    /// An error that makes the produced model approximate.
    Error,

    /// A warning that does not affect the produced model.
    Warning,

    /// An informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "{}", "[error]".bright_red().bold()),
            Self::Warning => write!(f, "{}", "[warning]".bright_yellow().bold()),
            Self::Info => write!(f, "{}", "[info]".bright_green().bold()),
        }
    }
}

/// A struct containing all the information required to display the
/// diagnostic to the user.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_new::new,
)]
pub struct Diagnostic {
    /// The message to display to the user.
    pub message: String,

    /// The severity of the diagnostic.
    pub severity: Severity,

    /// The signature fragment that was being compiled when the diagnostic
    /// occurred, if any.
    pub signature: Option<String>,

    /// The optional help message to display alongside the main message.
    pub help_message: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity, self.message.bold())?;

        if let Some(signature) = &self.signature {
            write!(f, "\n  {} `{signature}`", "-->".bright_blue().bold())?;
        }

        if let Some(help_message) = &self.help_message {
            write!(f, "\n  {} {help_message}", "help:".bold())?;
        }

        Ok(())
    }
}
