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

use std::path::PathBuf;

use thiserror::Error;

// SysfsError covers genuine failures while reading or writing sysfs.
// A missing link or file is never an error here; the accessors report
// absence as a negative result instead.
#[derive(Error, Debug)]
pub enum SysfsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Symlink {path} resolves to a target with no final path segment")]
    BadLinkTarget { path: PathBuf },

    #[error("Network device {netdev} is not a virtual function")]
    NotAVirtualFunction { netdev: String },
}

// SysfsResult is the result alias for sysfs operations.
pub type SysfsResult<T> = Result<T, SysfsError>;
