/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use clap::Parser;

fn run() -> eyre::Result<()> {
    switchdev::init_logging()?;
    let cli = switchdev::cmd::Cli::parse();
    switchdev::cmd::run_cli(cli)?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}: {err:#}", switchdev::PROG_NAME);
        std::process::exit(1);
    }
}
