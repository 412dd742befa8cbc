//! The executable of the jlite library compiler.

use std::process::ExitCode;

use clap::Parser;
use jlitec_driver::Arguments;

fn main() -> ExitCode { jlitec_driver::run(Arguments::parse()) }
