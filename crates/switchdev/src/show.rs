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

use std::io::Write;

use switchdev_sysfs::{NetDevice, Sysfs, pci_to_netdev_map};

use crate::error::{SwitchdevError, SwitchdevResult};

// show prints one tab-separated record per PCI-backed netdev, sorted
// by PCI address: address, interface name, driver and a role suffix
// (PF, "VF of <pf netdev>", or empty). Read-only.
pub fn show(sysfs: &dyn Sysfs, out: &mut dyn Write) -> SwitchdevResult<()> {
    let pci_to_netdev = pci_to_netdev_map(sysfs)?;
    for (pci_addr, name) in &pci_to_netdev {
        let netdev = NetDevice::new(sysfs, name.clone());
        let suffix = if netdev.is_pf() {
            "PF".to_string()
        } else if netdev.is_vf() {
            let pf_addr = netdev.pf_addr()?;
            let pf_name = pci_to_netdev.get(&pf_addr).ok_or_else(|| {
                SwitchdevError::UnresolvedPhysicalFunction {
                    netdev: name.clone(),
                    pci_addr: pf_addr.clone(),
                }
            })?;
            format!("VF of {pf_name}")
        } else {
            String::new()
        };
        let driver = netdev.driver()?.unwrap_or_default();
        writeln!(out, "{pci_addr}\t{name}\t{driver}\t{suffix}")?;
    }
    Ok(())
}
