//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

/// Fatal compilation errors. Every variant raised while reading the script names the line it was
/// raised on.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid parameter name ({name}) at line: {line}")]
    InvalidParameter { name: String, line: usize },
    #[error("duplicated parameter name ({name}) at line: {line}")]
    DuplicateParameter { name: String, line: usize },
    #[error("invalid macro argument list ({args}) at line: {line}")]
    InvalidArgument { args: String, line: usize },
    #[error("define nested macro ({name}) in macro ({outer}) at line: {line}")]
    NestedMacro {
        name: String,
        outer: String,
        line: usize,
    },
    #[error("macro end is mismatched macro start at line: {line}")]
    UnmatchedEnd { line: usize },
    #[error("found duplicated macro ({name}) at line: {line}")]
    DuplicateMacro { name: String, line: usize },
    #[error("call an unknown macro ({name}) at line: {line}")]
    UnknownMacro { name: String, line: usize },
    #[error(
        "macro ({name}) expand arguments mismatched, expected {expected} but got {found} at line: {line}"
    )]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("forbidden to call function macro ({name}) recursively at line: {line}")]
    RecursiveCall { name: String, line: usize },
    #[error("macro ({name}) started at line: {line} is never ended")]
    UnterminatedMacro { name: String, line: usize },
    #[error("{}: {source}", .path.display())]
    File {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait GetExitCode {
    fn get_exit_code(&self) -> i32;
}

impl<T> GetExitCode for Result<T> {
    fn get_exit_code(&self) -> i32 {
        match self {
            Ok(_) => 0,
            Err(_) => 1,
        }
    }
}
