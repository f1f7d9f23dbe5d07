//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

mod user_defined;

use std::collections::HashMap;

pub use user_defined::Macro;

use crate::error::{Error, Result};

/// Macros sealed by a matching `%end`. A macro can only be called once it is registered here.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Macro>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition`, sealed at `line`. Names are unique.
    pub fn register(&mut self, definition: Macro, line: usize) -> Result<()> {
        if self.macros.contains_key(&definition.name) {
            return Err(Error::DuplicateMacro {
                name: definition.name,
                line,
            });
        }
        log::debug!(
            "MacroRegistry::register() {:?} params:{:?} body lines:{}",
            definition.name,
            definition.params,
            definition.body().len()
        );
        self.macros.insert(definition.name.clone(), definition);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    /// Mutable lookup, expansion advances the macro's hygiene counter.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Macro> {
        self.macros.get_mut(name)
    }
}
