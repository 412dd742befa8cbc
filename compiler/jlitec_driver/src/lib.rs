//! Contains the main `run()` function of the library compiler.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use jlitec_builder::{diagnostic::Diagnostic, Options};
use jlitec_diagnostic::{Diagnostic as DiagnosticReport, Severity};
use jlitec_handler::Storage;
use jlitec_reflection::LibraryClass;
use jlitec_term::library::Library;
use ron::ser::PrettyConfig;

pub use crate::summary::{ClassLikeSummary, LibrarySummary};

mod summary;

/// The set of native classes to compile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum,
)]
pub enum LibraryKind {
    /// `Object`, `String` and the boxed wrappers only.
    #[clap(name = "prelude")]
    Prelude,

    /// The prelude plus the standard exception hierarchy.
    #[clap(name = "standard")]
    Standard,
}

impl LibraryKind {
    /// The declarations compiled on top of the prelude.
    #[must_use]
    pub fn declarations(self) -> Vec<Arc<dyn LibraryClass>> {
        match self {
            Self::Prelude => Vec::new(),
            Self::Standard => jlitec_library::standard_library(),
        }
    }
}

/// How the compiled library is printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum,
)]
pub enum OutputFormat {
    /// A human readable listing.
    #[clap(name = "summary")]
    Summary,

    /// The [`LibrarySummary`] in pretty-printed RON.
    #[clap(name = "ron")]
    Ron,
}

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "jlitec",
    about = "Compiles the jlite native library classes into a type model"
)]
pub struct Arguments {
    /// A TOML file with the compilation options.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// The library to compile.
    #[clap(short, long, default_value = "standard")]
    pub library: LibraryKind,

    /// The output format of the compiled library.
    #[clap(short, long, default_value = "summary")]
    pub format: OutputFormat,

    /// Logs the compilation passes. `RUST_LOG` takes precedence.
    #[clap(short, long)]
    pub verbose: bool,
}

/// The options file couldn't be loaded.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid options in `{}`: {source}", path.display())]
    Toml { path: PathBuf, source: toml::de::Error },
}

/// Loads the compilation options; without a path, the defaults are used.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn load_options(path: Option<&Path>) -> Result<Options, ConfigError> {
    let Some(path) = path else {
        return Ok(Options::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;

    toml::from_str(&content)
        .map_err(|source| ConfigError::Toml { path: path.to_owned(), source })
}

/// Renders the summary in the requested format.
///
/// # Errors
///
/// Returns the serialisation error of the RON format.
pub fn render(
    summary: &LibrarySummary,
    format: OutputFormat,
) -> Result<String, ron::Error> {
    match format {
        OutputFormat::Summary => Ok(summary.to_string()),
        OutputFormat::Ron => {
            ron::ser::to_string_pretty(summary, PrettyConfig::default())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };

    // a logger may already be installed when running inside tests
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(filter),
    )
    .try_init();
}

fn print_error(message: impl Into<String>) {
    eprintln!(
        "{}",
        DiagnosticReport::new(message.into(), Severity::Error, None, None)
    );
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(arguments: Arguments) -> ExitCode {
    init_logging(arguments.verbose);

    let options = match load_options(arguments.config.as_deref()) {
        Ok(options) => options,
        Err(error) => {
            print_error(error.to_string());
            return ExitCode::FAILURE;
        }
    };

    log::debug!("compiling with {options:?}");

    let storage = Storage::<Box<dyn Diagnostic>>::new();
    let result = jlitec_builder::compile(
        &arguments.library.declarations(),
        &options,
        &storage,
    );

    // diagnostics of an aborted compilation render without class-like names
    let fallback = Library::new();
    let library = result.as_ref().unwrap_or(&fallback);

    let mut has_error = false;
    for diagnostic in storage.into_vec() {
        let report = diagnostic.report(library);
        has_error |= report.severity == Severity::Error;

        eprintln!("{report}\n");
    }

    let library = match result {
        Ok(library) => library,
        Err(error) => {
            print_error(error.to_string());
            return ExitCode::FAILURE;
        }
    };

    match render(&LibrarySummary::new(&library), arguments.format) {
        Ok(output) => println!("{output}"),
        Err(error) => {
            print_error(format!("failed to serialize the library: {error}"));
            return ExitCode::FAILURE;
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod test;
