// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

mod cfn_yaml;
mod extract;
mod key_path;
mod yaml_utils;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Error};
use clap::{value_parser, Arg, Command};
use tracing_subscriber::EnvFilter;

use crate::extract::extract_parameters_file;

fn main() -> Result<(), Error> {
    init_logging();

    let matches = cli().get_matches();
    let template_path = matches
        .get_one::<PathBuf>("template")
        .ok_or_else(|| anyhow!("--template is required"))?;

    let output = extract_parameters_file(template_path)?;

    // Nothing reaches stdout unless the whole document was produced.
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn cli() -> Command {
    Command::new("cfn-params")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prints the parameter interface (groups, labels and parameters) of a CloudFormation template")
        .arg(
            Arg::new("template")
                .long("template")
                .value_name("path")
                .help("path to template")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn template_is_required() {
        let err = cli().try_get_matches_from(["cfn-params"]).unwrap_err();
        assert_eq!(clap::error::ErrorKind::MissingRequiredArgument, err.kind());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = cli()
            .try_get_matches_from(["cfn-params", "--template", "a.yaml", "--output", "b.yaml"])
            .unwrap_err();
        assert_eq!(clap::error::ErrorKind::UnknownArgument, err.kind());
    }

    #[test]
    fn template_path() {
        let matches = cli()
            .try_get_matches_from(["cfn-params", "--template", "stack.yaml"])
            .unwrap();
        assert_eq!(Some(&PathBuf::from("stack.yaml")), matches.get_one::<PathBuf>("template"));
    }
}
