//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::Write;

use crate::defines::ConstantTable;
use crate::directive::Directive;
use crate::error::{Error, Result};
use crate::macros::{Macro, MacroRegistry};
use crate::params::{parse_args, parse_params};
use crate::PreDefine;

/// Where lines currently go.
#[derive(Debug)]
enum Scope {
    TopLevel,
    /// Between `%macro` (on `line`) and its `%end`.
    InMacroBody { pending: Macro, line: usize },
}

/// The driver: one instance per compiled script.
///
/// Lines are fed in order with [`Compiler::feed`]. Directives update the constant table, the
/// macro registry or the macro being collected. Everything else is script text, which is
/// appended to the output or to the pending macro body after constant substitution.
#[derive(Debug)]
pub struct Compiler {
    scope: Scope,
    output: Vec<String>,
    defines: ConstantTable,
    macros: MacroRegistry,
    verbose: bool,
}

impl Compiler {
    pub fn new(verbose: bool) -> Self {
        Self {
            scope: Scope::TopLevel,
            output: Vec::new(),
            defines: ConstantTable::new(),
            macros: MacroRegistry::new(),
            verbose,
        }
    }

    /// See [`ConstantTable::seed`].
    pub fn predefine(&mut self, predefines: &[PreDefine], warnings: &mut dyn Write) -> Result<()> {
        self.defines.seed(predefines, warnings)
    }

    #[cfg(test)]
    fn macros(&self) -> &MacroRegistry {
        &self.macros
    }

    /// Name of the macro currently being collected.
    pub fn pending_macro(&self) -> Option<&str> {
        match &self.scope {
            Scope::TopLevel => None,
            Scope::InMacroBody { pending, .. } => Some(&pending.name),
        }
    }

    /// Process one raw input line, `line` being its 1-based number. `raw` may include its line
    /// terminator, which is kept for script text.
    pub fn feed(&mut self, line: usize, raw: &str, warnings: &mut dyn Write) -> Result<()> {
        let stripped = raw.trim_end();
        let directive = Directive::classify(stripped);
        log::trace!("line {line}: {directive:?}");

        match directive {
            Directive::MacroStart { name, params } => {
                if let Scope::InMacroBody { pending, .. } = &self.scope {
                    return Err(Error::NestedMacro {
                        name: name.to_owned(),
                        outer: pending.name.clone(),
                        line,
                    });
                }
                let params = parse_params(params, line)?;
                log::debug!("Collecting macro {name:?} from line {line}");
                self.scope = Scope::InMacroBody {
                    pending: Macro::new(name, params),
                    line,
                };
            }
            Directive::MacroEnd => match std::mem::replace(&mut self.scope, Scope::TopLevel) {
                Scope::TopLevel => return Err(Error::UnmatchedEnd { line }),
                Scope::InMacroBody { pending, .. } => self.macros.register(pending, line)?,
            },
            Directive::MacroCall { indent, name, args } => {
                let args: Vec<String> = parse_args(args, line)?
                    .iter()
                    .map(|arg| self.defines.substitute(arg))
                    .collect();
                if self.pending_macro() == Some(name) {
                    return Err(Error::RecursiveCall {
                        name: name.to_owned(),
                        line,
                    });
                }
                let definition = self
                    .macros
                    .get_mut(name)
                    .ok_or_else(|| Error::UnknownMacro {
                        name: name.to_owned(),
                        line,
                    })?;
                let expansion = definition.expand(&args, stripped, indent, line, self.verbose)?;
                // A call inside a macro body is expanded now, once, and becomes part of that body.
                match &mut self.scope {
                    Scope::TopLevel => self.output.push(expansion),
                    Scope::InMacroBody { pending, .. } => pending.push(expansion),
                }
            }
            Directive::Define { name, value } => {
                if self.defines.define(name, value).is_some() {
                    crate::warning(
                        warnings,
                        format_args!("redefine item ({name}) will be overwritten at line: {line}"),
                    )?;
                }
            }
            Directive::Plain => {
                let text = self.defines.substitute(raw);
                match &mut self.scope {
                    Scope::TopLevel => {
                        if !text.trim().is_empty() {
                            self.output.push(text);
                        }
                    }
                    Scope::InMacroBody { pending, .. } => pending.push(text),
                }
            }
        }

        Ok(())
    }

    /// End of input. Returns the compiled script.
    pub fn finish(self) -> Result<String> {
        if let Scope::InMacroBody { pending, line } = self.scope {
            return Err(Error::UnterminatedMacro {
                name: pending.name,
                line,
            });
        }
        Ok(self.output.concat())
    }
}

/// Compile a whole script. Warnings are written to `warnings`, the first fatal error stops the
/// compilation.
pub fn compile(
    source: &str,
    predefines: &[PreDefine],
    verbose: bool,
    warnings: &mut dyn Write,
) -> Result<String> {
    let mut compiler = Compiler::new(verbose);
    compiler.predefine(predefines, warnings)?;
    for (i, raw) in source.split_inclusive('\n').enumerate() {
        compiler.feed(i + 1, raw, warnings)?;
    }
    compiler.finish()
}
