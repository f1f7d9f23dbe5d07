//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use btcc::error::GetExitCode;
use clap::Parser;

fn main() {
    env_logger::init();
    let args = btcc::Args::parse();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let result = btcc::run(stdout, stderr, args);
    std::process::exit(result.get_exit_code())
}
