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

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{SysfsError, SysfsResult};
use crate::provider::Sysfs;

// NET_CLASS is the sysfs network interface tree.
pub const NET_CLASS: &str = "/sys/class/net";

// list_netdevices enumerates every entry under /sys/class/net.
pub fn list_netdevices(sysfs: &dyn Sysfs) -> SysfsResult<Vec<NetDevice<'_>>> {
    let mut names = sysfs.list_dir(Path::new(NET_CLASS))?;
    names.sort();
    Ok(names
        .into_iter()
        .map(|name| NetDevice::new(sysfs, name))
        .collect())
}

// pci_to_netdev_map resolves each netdev's backing PCI device link
// into an address -> interface name mapping. Interfaces without a
// backing PCI device (loopback, bridges, vxlan, ...) are skipped.
// Should two interfaces ever report the same address, the later entry
// wins.
pub fn pci_to_netdev_map(sysfs: &dyn Sysfs) -> SysfsResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for netdev in list_netdevices(sysfs)? {
        if let Some(addr) = netdev.pci_addr()? {
            map.insert(addr, netdev.name().to_string());
        }
    }
    Ok(map)
}

/// A network interface, reaching its PCI facts through the
/// `/sys/class/net/<name>/device` link.
pub struct NetDevice<'a> {
    sysfs: &'a dyn Sysfs,
    name: String,
}

impl<'a> NetDevice<'a> {
    pub fn new(sysfs: &'a dyn Sysfs, name: impl Into<String>) -> Self {
        Self {
            sysfs,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn subpath(&self, leaf: &str) -> PathBuf {
        Path::new(NET_CLASS).join(&self.name).join(leaf)
    }

    // pci_addr returns the backing PCI device address, or None for
    // purely virtual interfaces.
    pub fn pci_addr(&self) -> SysfsResult<Option<String>> {
        self.sysfs.read_link_name(&self.subpath("device"))
    }

    // driver returns the backing device's kernel driver name, or None
    // when there is no driver link.
    pub fn driver(&self) -> SysfsResult<Option<String>> {
        self.sysfs.read_link_name(&self.subpath("device/driver"))
    }

    pub fn is_pf(&self) -> bool {
        self.sysfs.exists(&self.subpath("device/sriov_numvfs"))
    }

    pub fn is_vf(&self) -> bool {
        self.sysfs.exists(&self.subpath("device/physfn"))
    }

    // pf_addr returns the PCI address of this VF's parent physical
    // function. Calling it on anything that is not a VF is a caller
    // logic bug and fails loudly.
    pub fn pf_addr(&self) -> SysfsResult<String> {
        self.sysfs
            .read_link_name(&self.subpath("device/physfn"))?
            .ok_or_else(|| SysfsError::NotAVirtualFunction {
                netdev: self.name.clone(),
            })
    }
}
