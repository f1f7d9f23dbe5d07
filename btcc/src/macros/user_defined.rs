//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::error::{Error, Result};

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([_a-zA-Z][_a-zA-Z0-9]*)").expect("invalid regex"));

/// A function-like macro collected between `%macro NAME($a, ...)` and `%end`.
///
/// Every expansion renames each `$variable` in the body to `$__m<N>_variable`, where `N` is the
/// number of times this macro has been expanded before. The renaming is not limited to the
/// parameters, locals declared inside the body are namespaced too. The only exception is
/// `$NAME`, which the body assigns to hand a return value back to the caller.
#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub params: Vec<String>,
    body: Vec<String>,
    expand_count: usize,
}

impl Macro {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
            body: Vec::new(),
            expand_count: 0,
        }
    }

    /// Append a fragment of body text. Fragments keep their line terminators.
    pub fn push(&mut self, text: impl Into<String>) {
        self.body.push(text.into());
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// How many times [`Macro::expand`] has succeeded.
    #[cfg(test)]
    pub(crate) fn expand_count(&self) -> usize {
        self.expand_count
    }

    fn prefix(&self) -> String {
        format!("__m{}_", self.expand_count)
    }

    /// Expand the macro for one `%call`.
    ///
    /// `call_site` is the `%call` line as written, `indent` its leading whitespace and `line` its
    /// line number. The result binds each argument to its renamed parameter and is followed by
    /// the renamed body. With `verbose` the block is wrapped in `// BEGIN:` and `// END:`
    /// comments quoting the call.
    pub fn expand(
        &mut self,
        args: &[String],
        call_site: &str,
        indent: &str,
        line: usize,
        verbose: bool,
    ) -> Result<String> {
        if args.len() != self.params.len() {
            return Err(Error::ArgumentCount {
                name: self.name.clone(),
                expected: self.params.len(),
                found: args.len(),
                line,
            });
        }

        let prefix = self.prefix();
        log::debug!(
            "Macro::expand() expanding {:?} at line {line} with prefix {prefix:?} args:{args:?}",
            self.name,
        );

        let mut expansion = String::new();
        if verbose {
            expansion.push_str(&format!("\n{indent}// BEGIN: {}\n", call_site.trim()));
        }

        for (param, arg) in self.params.iter().zip(args) {
            let var = param.strip_prefix('$').unwrap_or(param);
            expansion.push_str(&format!("{indent}${prefix}{var} = {arg};\n"));
        }

        for text in &self.body {
            expansion.push_str(&self.rename(text, &prefix));
        }

        if verbose {
            expansion.push_str(&format!("{indent}// END: {}\n", call_site.trim()));
        }

        self.expand_count += 1;
        Ok(expansion)
    }

    fn rename(&self, text: &str, prefix: &str) -> String {
        VARIABLE_RE
            .replace_all(text, |c: &Captures| {
                let var = &c[1];
                if var == self.name {
                    c[0].to_owned()
                } else {
                    format!("${prefix}{var}")
                }
            })
            .into_owned()
    }
}
