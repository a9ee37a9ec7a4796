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

//! In-memory sysfs double. Fixtures register links, files and
//! directories up front; control-file writes are recorded for
//! assertion instead of touching anything.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::error::SysfsResult;
use crate::provider::Sysfs;

// FakeSysfs maps paths to link targets and plain files and records
// every write issued through it.
#[derive(Debug, Default)]
pub struct FakeSysfs {
    links: HashMap<PathBuf, PathBuf>,
    files: BTreeSet<PathBuf>,
    dirs: HashMap<PathBuf, BTreeSet<String>>,
    writes: RefCell<Vec<(PathBuf, String)>>,
}

impl FakeSysfs {
    pub fn new() -> Self {
        Self::default()
    }

    // add_link registers a symlink whose read_link_name result is the
    // final segment of target.
    pub fn add_link(&mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        let path = path.into();
        self.register_entry(&path);
        self.links.insert(path, target.into());
    }

    // add_file registers a plain file so that exists() is true.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.register_entry(&path);
        self.files.insert(path);
    }

    // add_dir registers a (possibly empty) directory.
    pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.register_entry(&path);
        self.dirs.entry(path).or_default();
    }

    // writes returns every (path, payload) written so far, in order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.borrow().clone()
    }

    // writes_to returns the payloads written to one control file.
    pub fn writes_to(&self, path: impl AsRef<Path>) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter(|(p, _)| p.as_path() == path.as_ref())
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    // Every ancestor becomes a listable directory so that fixtures
    // only need to register leaves.
    fn register_entry(&mut self, path: &Path) {
        let mut current = path.to_path_buf();
        while let (Some(parent), Some(name)) = (
            current.parent().map(Path::to_path_buf),
            current.file_name().map(|n| n.to_string_lossy().into_owned()),
        ) {
            if parent.as_os_str().is_empty() {
                break;
            }
            self.dirs.entry(parent.clone()).or_default().insert(name);
            current = parent;
        }
    }
}

impl Sysfs for FakeSysfs {
    fn exists(&self, path: &Path) -> bool {
        self.links.contains_key(path) || self.files.contains(path) || self.dirs.contains_key(path)
    }

    fn read_link_name(&self, path: &Path) -> SysfsResult<Option<String>> {
        Ok(self.links.get(path).and_then(|target| {
            target
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }))
    }

    fn list_dir(&self, path: &Path) -> SysfsResult<Vec<String>> {
        Ok(self
            .dirs
            .get(path)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn write(&self, path: &Path, contents: &str) -> SysfsResult<()> {
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}
