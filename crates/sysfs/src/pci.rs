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

use std::path::{Path, PathBuf};

use crate::error::SysfsResult;
use crate::provider::Sysfs;

// PCI_DEVICES is the sysfs PCI device tree.
pub const PCI_DEVICES: &str = "/sys/bus/pci/devices";

// list_pci_devices enumerates every entry under the PCI device tree,
// sorted by address for deterministic iteration.
pub fn list_pci_devices(sysfs: &dyn Sysfs) -> SysfsResult<Vec<PciDevice<'_>>> {
    let mut addrs = sysfs.list_dir(Path::new(PCI_DEVICES))?;
    addrs.sort();
    Ok(addrs
        .into_iter()
        .map(|addr| PciDevice::new(sysfs, addr))
        .collect())
}

/// A PCI device identified by its bus address (`DDDD:BB:DD.F`).
///
/// Every attribute is derived from sysfs on demand; nothing is cached,
/// so the answers always reflect live kernel state.
pub struct PciDevice<'a> {
    sysfs: &'a dyn Sysfs,
    addr: String,
}

impl<'a> PciDevice<'a> {
    pub fn new(sysfs: &'a dyn Sysfs, addr: impl Into<String>) -> Self {
        Self {
            sysfs,
            addr: addr.into(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn subpath(&self, leaf: &str) -> PathBuf {
        Path::new(PCI_DEVICES).join(&self.addr).join(leaf)
    }

    // driver returns the name of the bound kernel driver, or None when
    // the device is unbound.
    pub fn driver(&self) -> SysfsResult<Option<String>> {
        self.sysfs.read_link_name(&self.subpath("driver"))
    }

    // bound reports whether a driver link exists.
    pub fn bound(&self) -> bool {
        self.sysfs.exists(&self.subpath("driver"))
    }

    // is_pf reports whether the device is a physical function, marked
    // by the sriov_numvfs attribute.
    pub fn is_pf(&self) -> bool {
        self.sysfs.exists(&self.subpath("sriov_numvfs"))
    }

    // is_vf reports whether the device is a virtual function, marked
    // by the physfn link back to its parent.
    pub fn is_vf(&self) -> bool {
        self.sysfs.exists(&self.subpath("physfn"))
    }

    /// Child VF addresses in virtfn index order.
    ///
    /// Probes `virtfn0`, `virtfn1`, ... and stops at the first missing
    /// index. The order is significant; it drives unbind/rebind order.
    pub fn vf_addresses(&self) -> SysfsResult<Vec<String>> {
        let mut addrs = Vec::new();
        for index in 0.. {
            match self
                .sysfs
                .read_link_name(&self.subpath(&format!("virtfn{index}")))?
            {
                Some(addr) => addrs.push(addr),
                None => break,
            }
        }
        Ok(addrs)
    }

    // vfs realizes vf_addresses as child devices.
    pub fn vfs(&self) -> SysfsResult<Vec<PciDevice<'a>>> {
        Ok(self
            .vf_addresses()?
            .into_iter()
            .map(|addr| PciDevice::new(self.sysfs, addr))
            .collect())
    }
}
