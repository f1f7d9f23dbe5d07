//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::macros::Macro;
use crate::PreDefine;

pub fn args(input: &[&str]) -> Vec<String> {
    input.iter().map(|s| (*s).to_owned()).collect()
}

/// `%macro inc($a)` with the body `$a = $a + 1;`.
pub fn inc_macro() -> Macro {
    let mut m = Macro::new("inc", args(&["$a"]));
    m.push("$a = $a + 1;\n");
    m
}

pub fn predefine(name: &str, value: &str) -> PreDefine {
    PreDefine {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}

pub fn compile_ok(source: &str) -> String {
    crate::compile(source, &[], false, &mut Vec::<u8>::new()).unwrap()
}
