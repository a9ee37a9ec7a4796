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

use clap::{Parser, Subcommand};

// Cli is the top-level command spec.
#[derive(Parser)]
#[command(name = crate::PROG_NAME)]
#[command(about = "Switch Mellanox switchdev capable adapters into switchdev mode")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

// Commands are the available CLI subcommands.
#[derive(Subcommand)]
pub enum Commands {
    // show prints details of all installed network adapters.
    #[command(about = "Show details of installed network adapters.")]
    Show,
    // switch moves capable adapters into switchdev mode.
    #[command(about = "Switch switchdev capable network adapters to switchdev mode.")]
    Switch {
        // rebind binds VFs back to their driver after a successful
        // mode change.
        #[arg(long)]
        rebind: bool,
        // warn_on_no_sriov fails on PFs whose eswitch query the
        // kernel rejects instead of skipping them.
        #[arg(long)]
        warn_on_no_sriov: bool,
    },
}
