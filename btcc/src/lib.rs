//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! btcc - bpftrace extension compiler.
//!
//! Extends bpftrace scripts with constants and function-like macros:
//!
//! ```text
//! %define HELLO 0x1000
//! %define MESSAGE "hello, world"
//!
//! %macro NAME($a, $b)
//! // macro body
//! %end
//!
//! %call NAME($x, $y)
//! ```
//!
//! A macro returns a value by assigning to the variable named after it, `$NAME = 10;`.

use std::ffi::OsStr;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use clap::builder::{TypedValueParser, ValueParserFactory};

pub use compiler::{compile, Compiler};
pub use error::{Error, Result};

mod compiler;
pub mod defines;
mod directive;
pub mod error;
pub mod macros;
mod params;
#[cfg(test)]
mod test_utils;

pub const DEFAULT_OUTPUT_FILE: &str = "out.bt";

/// A `NAME=VALUE` constant given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreDefine {
    pub name: String,
    pub value: String,
}

#[derive(Clone)]
pub struct PreDefineParser;

impl TypedValueParser for PreDefineParser {
    type Value = PreDefine;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> std::result::Result<Self::Value, clap::Error> {
        let invalid = || {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("invalid pre-define {value:?}, expected NAME=VALUE\n"),
            )
            .with_cmd(cmd)
        };
        let value_str = value.to_str().ok_or_else(invalid)?;
        // Surrounding whitespace and empty sides are dealt with when the table is seeded.
        let (name, define_value) = value_str.split_once('=').ok_or_else(invalid)?;
        let trimmed = name.trim();
        if !trimmed.is_empty() && !params::is_identifier(trimmed) {
            return Err(clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("invalid pre-define name {trimmed:?}, expected [_a-zA-Z][_a-zA-Z0-9]*\n"),
            )
            .with_cmd(cmd));
        }
        Ok(PreDefine {
            name: name.to_owned(),
            value: define_value.to_owned(),
        })
    }
}

impl ValueParserFactory for PreDefine {
    type Parser = PreDefineParser;

    fn value_parser() -> Self::Parser {
        PreDefineParser
    }
}

/// btcc - bpftrace extension compiler
#[derive(Debug, clap::Parser, Clone)]
#[command(version, about)]
pub struct Args {
    /// Output file.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub out: PathBuf,
    /// Source extended bpftrace script to compile.
    #[arg(short, long)]
    pub file: PathBuf,
    /// Show macro expanding info in comments.
    #[arg(short, long)]
    pub verbose: bool,
    /// `NAME=VALUE`
    ///
    /// Pre-define the constant `NAME` to `VALUE`.
    pub defines: Vec<PreDefine>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            out: PathBuf::from(DEFAULT_OUTPUT_FILE),
            file: PathBuf::new(),
            verbose: false,
            defines: Vec::default(),
        }
    }
}

/// Report a non-fatal problem, compilation carries on.
pub(crate) fn warning(warnings: &mut dyn Write, message: fmt::Arguments) -> std::io::Result<()> {
    log::warn!("{message}");
    writeln!(warnings, "Warning: {message}")
}

/// Compile `args.file` into `args.out`. Fatal errors are reported on `stderr` as
/// `Error: <message>` and returned.
pub fn run<STDOUT: Write, STDERR: Write>(
    stdout: STDOUT,
    mut stderr: STDERR,
    args: Args,
) -> crate::error::Result<()> {
    match run_impl(stdout, &mut stderr, args) {
        Ok(_) => Ok(()),
        Err(error) => {
            if let Err(error) = writeln!(stderr, "Error: {error}") {
                return Err(error.into());
            }
            Err(error)
        }
    }
}

pub fn run_impl<STDOUT: Write, STDERR: Write>(
    mut stdout: STDOUT,
    mut stderr: STDERR,
    args: Args,
) -> crate::error::Result<()> {
    let source = std::fs::read_to_string(&args.file).map_err(|source| Error::File {
        path: args.file.clone(),
        source,
    })?;
    log::debug!(
        "Compiling {:?} ({} bytes) into {:?}",
        args.file,
        source.len(),
        args.out
    );

    let script = compile(&source, &args.defines, args.verbose, &mut stderr)?;

    // Nothing is written unless the whole script compiled.
    std::fs::write(&args.out, script).map_err(|source| Error::File {
        path: args.out.clone(),
        source,
    })?;

    writeln!(
        stdout,
        "[Success] new compiled script {} has been generated!",
        args.out.display()
    )?;
    Ok(())
}
