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

use tracing::debug;

use crate::error::SysfsResult;
use crate::provider::Sysfs;

// PCI_DRIVERS is the sysfs PCI driver tree.
pub const PCI_DRIVERS: &str = "/sys/bus/pci/drivers";

// DriverBinding wraps one kernel driver's bind/unbind control files.
// Each call is a single scoped write of the PCI address; the handle is
// closed before the call returns.
pub struct DriverBinding<'a> {
    sysfs: &'a dyn Sysfs,
    driver: String,
}

impl<'a> DriverBinding<'a> {
    pub fn new(sysfs: &'a dyn Sysfs, driver: impl Into<String>) -> Self {
        Self {
            sysfs,
            driver: driver.into(),
        }
    }

    fn control_file(&self, leaf: &str) -> PathBuf {
        Path::new(PCI_DRIVERS).join(&self.driver).join(leaf)
    }

    // unbind detaches the device at addr from this driver.
    pub fn unbind(&self, addr: &str) -> SysfsResult<()> {
        debug!(driver = %self.driver, device = %addr, "unbinding device");
        self.sysfs.write(&self.control_file("unbind"), addr)
    }

    // bind attaches the device at addr to this driver.
    pub fn bind(&self, addr: &str) -> SysfsResult<()> {
        debug!(driver = %self.driver, device = %addr, "binding device");
        self.sysfs.write(&self.control_file("bind"), addr)
    }
}
