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

// DevlinkError is the error type for devlink tool invocations.
#[derive(Error, Debug)]
pub enum DevlinkError {
    // EswitchUnavailable means the kernel rejected the eswitch query
    // for this device, which is how a PF without SR-IOV enabled
    // answers. Callers decide whether this is fatal.
    #[error("Device pci/{pci_addr} has no eswitch (SR-IOV mode not enabled): {detail}")]
    EswitchUnavailable { pci_addr: String, detail: String },

    #[error("devlink command failed: {0}")]
    CommandFailed(String),

    #[error("devlink output is missing device pci/{pci_addr}")]
    DeviceMissing { pci_addr: String },

    // ModeMissing means the device entry came back without the mode
    // field the eswitch object always carries.
    #[error("devlink output for pci/{pci_addr} is missing the mode field")]
    ModeMissing { pci_addr: String },

    #[error("Failed to parse devlink JSON output: {0}")]
    Parse(#[from] serde_json::Error),
}

// DevlinkResult is the result alias for devlink operations.
pub type DevlinkResult<T> = Result<T, DevlinkError>;
