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

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{SysfsError, SysfsResult};

// Sysfs is the seam between the device model and the kernel's
// pseudo-filesystem. Production code uses HostSysfs; tests use the
// in-memory fake. Absence of a path is a normal negative result, not
// an error.
pub trait Sysfs {
    // exists reports whether the path is present at all.
    fn exists(&self, path: &Path) -> bool;

    // read_link_name resolves a symlink and returns the final path
    // segment of its target. Ok(None) when the link does not exist.
    fn read_link_name(&self, path: &Path) -> SysfsResult<Option<String>>;

    // list_dir returns the entry names of a directory.
    fn list_dir(&self, path: &Path) -> SysfsResult<Vec<String>>;

    // write opens the file, writes the full payload once and closes
    // the handle before returning.
    fn write(&self, path: &Path, contents: &str) -> SysfsResult<()>;
}

// HostSysfs reads and writes the real /sys tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostSysfs;

impl Sysfs for HostSysfs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_link_name(&self, path: &Path) -> SysfsResult<Option<String>> {
        let target = match fs::read_link(path) {
            Ok(target) => target,
            // NotADirectory shows up when a path component is a
            // regular file, which sysfs walks can legitimately hit.
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Ok(None);
            }
            Err(err) => {
                return Err(SysfsError::Io {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        let name = target
            .file_name()
            .ok_or_else(|| SysfsError::BadLinkTarget {
                path: path.to_path_buf(),
            })?;
        Ok(Some(name.to_string_lossy().into_owned()))
    }

    fn list_dir(&self, path: &Path) -> SysfsResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|err| SysfsError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SysfsError::Io {
                path: path.to_path_buf(),
                source: err,
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn write(&self, path: &Path, contents: &str) -> SysfsResult<()> {
        // fs::write opens, writes and closes in one call, so the
        // payload reaches the kernel before anything that follows.
        fs::write(path, contents).map_err(|err| SysfsError::Io {
            path: path.to_path_buf(),
            source: err,
        })
    }
}
