//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Parsing of the parenthesised lists in `%macro NAME(...)` and `%call NAME(...)`.

use nom::IResult;

use crate::error::{Error, Result};

fn is_word_char_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char_end(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `[_a-zA-Z][_a-zA-Z0-9]*`
pub(crate) fn parse_identifier(input: &str) -> IResult<&str, &str> {
    nom::combinator::recognize(nom::sequence::pair(
        nom::bytes::complete::take_while_m_n(1, 1, is_word_char_start),
        nom::bytes::complete::take_while(is_word_char_end),
    ))(input)
}

/// A formal parameter, `$` followed by an identifier.
pub(crate) fn parse_parameter(input: &str) -> IResult<&str, &str> {
    nom::combinator::recognize(nom::sequence::preceded(
        nom::character::complete::char('$'),
        parse_identifier,
    ))(input)
}

/// Whether the whole of `name` is an identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    nom::combinator::all_consuming(parse_identifier)(name).is_ok()
}

fn is_parameter(entry: &str) -> bool {
    nom::combinator::all_consuming(parse_parameter)(entry).is_ok()
}

/// Parse the formal parameter list of a `%macro` line.
///
/// Entries are comma separated and surrounding whitespace is ignored. Every entry must be a
/// `$identifier` and appear only once.
pub fn parse_params(text: &str, line: usize) -> Result<Vec<String>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut params: Vec<String> = Vec::new();
    for entry in text.split(',').map(str::trim) {
        if !is_parameter(entry) {
            return Err(Error::InvalidParameter {
                name: entry.to_owned(),
                line,
            });
        }
        if params.iter().any(|p| p == entry) {
            return Err(Error::DuplicateParameter {
                name: entry.to_owned(),
                line,
            });
        }
        params.push(entry.to_owned());
    }

    Ok(params)
}

/// Parse the argument list of a `%call` line.
///
/// Arguments are free text. They are split on commas that are not nested inside `()`, `[]` or
/// `{}` and not inside a string literal, so `%call f(str($a, 8), "a,b")` binds two arguments.
pub fn parse_args(text: &str, line: usize) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(text[start..i].trim().to_owned());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(text[start..].trim().to_owned());

    if args.iter().any(String::is_empty) {
        return Err(Error::InvalidArgument {
            args: text.trim().to_owned(),
            line,
        });
    }

    Ok(args)
}
