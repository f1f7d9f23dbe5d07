//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::Write;

use crate::PreDefine;

/// A `%define NAME VALUE` constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: String,
}

/// Pre-processor constants, kept in the order they were first defined.
///
/// Substitution walks the constants in that order and replaces each name once, so a value that
/// contains the name of another constant is not expanded again.
#[derive(Debug, Default)]
pub struct ConstantTable {
    constants: Vec<Constant>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name`, or overwrite it in place. Returns the previous value on overwrite.
    pub fn define(&mut self, name: &str, value: &str) -> Option<String> {
        match self.constants.iter_mut().find(|c| c.name == name) {
            Some(constant) => Some(std::mem::replace(&mut constant.value, value.to_owned())),
            None => {
                self.constants.push(Constant {
                    name: name.to_owned(),
                    value: value.to_owned(),
                });
                None
            }
        }
    }

    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&str> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Literal textual replacement of every known constant in `line`.
    ///
    /// NOTE: this is not aware of identifier boundaries, `SIZE` is also replaced inside
    /// `MAX_SIZE`.
    pub fn substitute(&self, line: &str) -> String {
        let mut s = line.to_owned();
        for constant in &self.constants {
            if s.contains(&constant.name) {
                s = s.replace(&constant.name, &constant.value);
            }
        }
        s
    }

    /// Seed the table from command line `NAME=VALUE` pairs. Entries with an empty name or value
    /// are skipped.
    pub fn seed(
        &mut self,
        predefines: &[PreDefine],
        warnings: &mut dyn Write,
    ) -> crate::Result<()> {
        for predefine in predefines {
            let name = predefine.name.trim();
            let value = predefine.value.trim();
            if name.is_empty() || value.is_empty() {
                log::debug!("Skipping empty pre-define {predefine:?}");
                continue;
            }
            if self.define(name, value).is_some() {
                crate::warning(
                    warnings,
                    format_args!("overwrite pre-define {name} to value {value}"),
                )?;
            }
        }
        Ok(())
    }
}
