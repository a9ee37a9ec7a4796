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

use thiserror::Error;

// SwitchdevError is the top-level error type. Everything not
// downgraded to a negative result below propagates through here to
// the command dispatcher unmodified.
#[derive(Error, Debug)]
pub enum SwitchdevError {
    #[error(transparent)]
    Sysfs(#[from] switchdev_sysfs::SysfsError),

    #[error(transparent)]
    Devlink(#[from] switchdev_devlink::DevlinkError),

    // SriovNotEnabled surfaces only in strict (--warn-on-no-sriov)
    // runs; the lenient default skips such PFs.
    #[error("SR-IOV mode not enabled on physical function {pci_addr}")]
    SriovNotEnabled { pci_addr: String },

    // UnresolvedPhysicalFunction means a VF's physfn link names a PCI
    // address no netdev maps to, which breaks a kernel invariant.
    #[error("Virtual function {netdev} names physical function {pci_addr}, which has no netdev")]
    UnresolvedPhysicalFunction { netdev: String, pci_addr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// SwitchdevResult is the result alias for this crate.
pub type SwitchdevResult<T> = Result<T, SwitchdevError>;
