//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Line classification.
//!
//! Every input line is exactly one [`Directive`]. The patterns are tried in a fixed order
//! (`%macro`, `%end`, `%call`, `%define`) and anything that matches none of them is
//! [`Directive::Plain`] script text. Parameter and argument lists are captured verbatim and
//! validated later by [`crate::params`].

use regex::Regex;
use std::sync::LazyLock;

static MACRO_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*%macro\s+([_a-zA-Z][_a-zA-Z0-9]*)\s*\(([^()]*)\)$").expect("invalid regex")
});

static MACRO_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*%end$").expect("invalid regex"));

static MACRO_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)%call\s+([_a-zA-Z][_a-zA-Z0-9]*)\s*\((.*)\)\s*;?$").expect("invalid regex")
});

static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*%define\s+([_a-zA-Z][_a-zA-Z0-9]*)\s+(.+)$").expect("invalid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `%macro NAME(params)`
    MacroStart { name: &'a str, params: &'a str },
    /// `%end`
    MacroEnd,
    /// `%call NAME(args)`, with the whitespace in front of it.
    MacroCall {
        indent: &'a str,
        name: &'a str,
        args: &'a str,
    },
    /// `%define NAME VALUE`
    Define { name: &'a str, value: &'a str },
    Plain,
}

impl<'a> Directive<'a> {
    /// Classify `line`, which must already have its trailing whitespace (including the line
    /// terminator) removed.
    pub fn classify(line: &'a str) -> Self {
        if let Some(c) = MACRO_START_RE.captures(line) {
            return Directive::MacroStart {
                name: group(&c, 1),
                params: group(&c, 2),
            };
        }
        if MACRO_END_RE.is_match(line) {
            return Directive::MacroEnd;
        }
        if let Some(c) = MACRO_CALL_RE.captures(line) {
            return Directive::MacroCall {
                indent: group(&c, 1),
                name: group(&c, 2),
                args: group(&c, 3),
            };
        }
        if let Some(c) = DEFINE_RE.captures(line) {
            return Directive::Define {
                name: group(&c, 1),
                value: group(&c, 2),
            };
        }
        Directive::Plain
    }
}

fn group<'a>(captures: &regex::Captures<'a>, i: usize) -> &'a str {
    captures.get(i).map_or("", |m| m.as_str())
}
