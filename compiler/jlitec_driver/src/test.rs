use std::{fs, path::PathBuf};

use clap::Parser;
use jlitec_builder::Options;
use jlitec_handler::Panic;

use crate::{
    load_options, render, Arguments, ConfigError, LibraryKind, LibrarySummary,
    OutputFormat,
};

fn summary_of(kind: LibraryKind) -> LibrarySummary {
    let library =
        jlitec_builder::compile(&kind.declarations(), &Options::default(), &Panic)
            .unwrap();

    LibrarySummary::new(&library)
}

#[test]
fn default_arguments() {
    let arguments = Arguments::parse_from(["jlitec"]);

    assert_eq!(arguments, Arguments {
        config: None,
        library: LibraryKind::Standard,
        format: OutputFormat::Summary,
        verbose: false,
    });

    let arguments = Arguments::parse_from([
        "jlitec",
        "--library",
        "prelude",
        "--format",
        "ron",
        "--config",
        "jlitec.toml",
        "-v",
    ]);

    assert_eq!(arguments, Arguments {
        config: Some(PathBuf::from("jlitec.toml")),
        library: LibraryKind::Prelude,
        format: OutputFormat::Ron,
        verbose: true,
    });
}

#[test]
fn options_without_config_are_default() {
    assert_eq!(load_options(None).unwrap(), Options::default());
}

#[test]
fn options_from_config_file() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("jlitec.toml");
    fs::write(&path, "strict = true\nmax-specialization-depth = 3\n").unwrap();

    let options = load_options(Some(&path)).unwrap();

    assert!(options.strict);
    assert_eq!(options.max_specialization_depth, 3);
}

#[test]
fn invalid_config_file() {
    let directory = tempfile::tempdir().unwrap();

    let missing = directory.path().join("missing.toml");
    assert!(matches!(load_options(Some(&missing)), Err(ConfigError::Io { .. })));

    let malformed = directory.path().join("malformed.toml");
    fs::write(&malformed, "strict = \"yes\"\n").unwrap();

    let error = load_options(Some(&malformed)).unwrap_err();
    assert!(matches!(error, ConfigError::Toml { .. }));
    assert!(error.to_string().contains("malformed.toml"));
}

#[test]
fn prelude_summary() {
    let summary = summary_of(LibraryKind::Prelude);

    let identifiers = summary
        .class_likes
        .iter()
        .map(|x| x.identifier.as_str())
        .collect::<Vec<_>>();

    assert_eq!(identifiers.first(), Some(&"Object"));
    assert!(identifiers.contains(&"String"));
    assert!(!identifiers.contains(&"Exception"));
}

#[test]
fn standard_library_summary() {
    let summary = summary_of(LibraryKind::Standard);

    let throwable = summary
        .class_likes
        .iter()
        .find(|x| x.identifier == "Throwable")
        .unwrap();

    assert_eq!(throwable.keyword, "class");
    assert_eq!(throwable.supertypes, ["Object"]);
    assert_eq!(throwable.first_attribute_index, 0);
    assert_eq!(throwable.attributes, ["private String message @0"]);
    assert!(throwable
        .methods
        .contains(&"public String getMessage()".to_owned()));

    let exception = summary
        .class_likes
        .iter()
        .find(|x| x.identifier == "Exception")
        .unwrap();

    assert_eq!(exception.supertypes, ["Throwable"]);
    assert_eq!(exception.first_attribute_index, 1);
    assert!(exception.attributes.is_empty());

    let text = summary.to_string();
    assert!(text.contains("class Exception : Throwable [first slot 1]"));
}

#[test]
fn ron_output_deserializes_back() {
    let summary = summary_of(LibraryKind::Standard);

    let output = render(&summary, OutputFormat::Ron).unwrap();
    let parsed = ron::from_str::<LibrarySummary>(&output).unwrap();

    assert_eq!(parsed, summary);
}
