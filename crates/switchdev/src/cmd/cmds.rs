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

use std::io;

use switchdev_devlink::DevlinkRunner;
use switchdev_sysfs::HostSysfs;
use tracing::{debug, info};

use crate::cmd::args::{Cli, Commands};
use crate::error::SwitchdevResult;
use crate::switch::SwitchOptions;

// run_cli dispatches the parsed command against the live host.
pub fn run_cli(cli: Cli) -> SwitchdevResult<()> {
    let sysfs = HostSysfs;
    match cli.command {
        Commands::Show => {
            let mut stdout = io::stdout().lock();
            crate::show(&sysfs, &mut stdout)?;
        }
        Commands::Switch {
            rebind,
            warn_on_no_sriov,
        } => {
            let devlink = DevlinkRunner::new();
            let opts = SwitchOptions {
                rebind,
                warn_on_no_sriov,
            };
            let report = crate::switch(&sysfs, &devlink, opts)?;
            debug!(report = %report.to_json()?, "transition report");
            info!(
                considered = report.devices.len(),
                switched = report.switched(),
                "switchdev transition finished"
            );
        }
    }
    Ok(())
}
