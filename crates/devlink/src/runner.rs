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

use std::collections::HashMap;
use std::fmt;
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::{DevlinkError, DevlinkResult};

const DEFAULT_DEVLINK_PATH: &str = "/sbin/devlink";

// Stderr phrasings the kernel uses when a device has no eswitch to
// show, across devlink/kernel generations.
const NO_ESWITCH_MARKERS: [&str; 2] = ["Operation not supported", "doesn't support"];

// Devlink is the injected collaborator interface over the device
// management tool, swappable for a fake in tests.
pub trait Devlink {
    // dev_get shows one object of a device and returns its parsed
    // info, e.g. dev_get("eswitch", "0000:03:00.0").
    fn dev_get(&self, obj: &str, pci_addr: &str) -> DevlinkResult<DevInfo>;

    // dev_set applies one prop/value pair to an object of a device,
    // e.g. dev_set("eswitch", "0000:03:00.0", "mode", "switchdev").
    fn dev_set(&self, obj: &str, pci_addr: &str, prop: &str, value: &str) -> DevlinkResult<()>;
}

// EswitchMode is the embedded switch mode reported by the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EswitchMode {
    Legacy,
    Switchdev,
    Other(String),
}

impl EswitchMode {
    pub fn parse(mode: &str) -> Self {
        match mode {
            "legacy" => EswitchMode::Legacy,
            "switchdev" => EswitchMode::Switchdev,
            other => EswitchMode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EswitchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EswitchMode::Legacy => write!(f, "legacy"),
            EswitchMode::Switchdev => write!(f, "switchdev"),
            EswitchMode::Other(mode) => write!(f, "{mode}"),
        }
    }
}

// DevInfo is the per-device mapping under devlink's "dev" key. There
// are more fields in the output but mode is the only one used here.
#[derive(Deserialize, Debug, Clone)]
pub struct DevInfo {
    pub mode: Option<String>,
}

impl DevInfo {
    pub fn eswitch_mode(&self) -> Option<EswitchMode> {
        self.mode.as_deref().map(EswitchMode::parse)
    }
}

// DevShowOutput is the top-level shape of `devlink dev <obj> show
// pci/<addr> --json`: a "dev" mapping keyed by "pci/<addr>".
#[derive(Deserialize, Debug)]
struct DevShowOutput {
    dev: HashMap<String, DevInfo>,
}

// DevlinkRunner invokes the real devlink CLI tool.
pub struct DevlinkRunner {
    devlink_path: String,
}

impl DevlinkRunner {
    // new creates a runner using the stock tool location.
    pub fn new() -> Self {
        Self::with_path(DEFAULT_DEVLINK_PATH)
    }

    // with_path creates a runner with a custom devlink path.
    pub fn with_path<P: Into<String>>(path: P) -> Self {
        Self {
            devlink_path: path.into(),
        }
    }

    fn run(&self, args: &[&str]) -> DevlinkResult<std::process::Output> {
        debug!(devlink = %self.devlink_path, ?args, "invoking devlink");
        Command::new(&self.devlink_path)
            .args(args)
            .output()
            .map_err(|e| DevlinkError::CommandFailed(format!("Failed to execute devlink: {e}")))
    }
}

impl Default for DevlinkRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Devlink for DevlinkRunner {
    fn dev_get(&self, obj: &str, pci_addr: &str) -> DevlinkResult<DevInfo> {
        let handle = format!("pci/{pci_addr}");
        let output = self.run(&["dev", obj, "show", &handle, "--json"])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if NO_ESWITCH_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(DevlinkError::EswitchUnavailable {
                    pci_addr: pci_addr.to_string(),
                    detail: stderr.trim().to_string(),
                });
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(DevlinkError::CommandFailed(format!(
                "stdout: {}\nstderr: {}",
                stdout.trim(),
                stderr.trim()
            )));
        }

        parse_dev_show(&String::from_utf8_lossy(&output.stdout), pci_addr)
    }

    fn dev_set(&self, obj: &str, pci_addr: &str, prop: &str, value: &str) -> DevlinkResult<()> {
        let handle = format!("pci/{pci_addr}");
        let output = self.run(&["dev", obj, "set", &handle, prop, value])?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DevlinkError::CommandFailed(format!(
                "stdout: {}\nstderr: {}",
                stdout.trim(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

// parse_dev_show extracts the one device entry the query asked for.
fn parse_dev_show(stdout: &str, pci_addr: &str) -> DevlinkResult<DevInfo> {
    let mut parsed: DevShowOutput = serde_json::from_str(stdout)?;
    parsed
        .dev
        .remove(&format!("pci/{pci_addr}"))
        .ok_or_else(|| DevlinkError::DeviceMissing {
            pci_addr: pci_addr.to_string(),
        })
}
