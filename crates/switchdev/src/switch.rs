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

//! The legacy -> switchdev transition. This is the only mutating path
//! in the repository: it unbinds VFs from their driver, flips the
//! eswitch mode through devlink, and guarantees that VFs it unbound
//! are rebound if the mode change fails.

use serde::Serialize;
use switchdev_devlink::{Devlink, DevlinkError, EswitchMode};
use switchdev_sysfs::{DriverBinding, PciDevice, Sysfs, list_pci_devices};
use tracing::{error, info, warn};

use crate::error::{SwitchdevError, SwitchdevResult};

// MLX5_DRIVER is the only driver whose PFs this tool will touch.
pub const MLX5_DRIVER: &str = "mlx5_core";

const ESWITCH_OBJ: &str = "eswitch";
const MODE_PROP: &str = "mode";
const SWITCHDEV_MODE: &str = "switchdev";

// SwitchOptions controls the transition run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwitchOptions {
    // rebind requests that VFs unbound for the mode change are bound
    // back to their driver once the change succeeds. On failure the
    // rebind happens regardless.
    pub rebind: bool,
    // warn_on_no_sriov makes a PF whose eswitch query is rejected by
    // the kernel a hard error instead of a silent skip.
    pub warn_on_no_sriov: bool,
}

// PfOutcome is what happened to one candidate physical function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PfOutcome {
    // NoVfs: nothing configured to switch.
    NoVfs,
    // NoEswitch: the kernel rejected the eswitch query (SR-IOV mode
    // not enabled) and the run is lenient.
    NoEswitch,
    // AlreadySwitchdev: idempotent skip.
    AlreadySwitchdev,
    // UnexpectedMode: an eswitch mode this tool does not transition.
    UnexpectedMode { mode: String },
    // Switched: the transition ran; unbound counts only VFs that were
    // bound beforehand.
    Switched { unbound: usize, rebound: bool },
}

// SwitchReport records the outcome for every candidate PF, in the
// order they were visited.
#[derive(Debug, Default, Serialize)]
pub struct SwitchReport {
    pub devices: Vec<(String, PfOutcome)>,
}

impl SwitchReport {
    fn record(&mut self, pci_addr: &str, outcome: PfOutcome) {
        self.devices.push((pci_addr.to_string(), outcome));
    }

    // to_json renders the report for log shipping or scripting.
    pub fn to_json(&self) -> SwitchdevResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // switched returns how many PFs actually changed mode.
    pub fn switched(&self) -> usize {
        self.devices
            .iter()
            .filter(|(_, outcome)| matches!(outcome, PfOutcome::Switched { .. }))
            .count()
    }
}

// switch walks all PCI devices and moves every switchdev-capable
// mlx5_core physical function that still runs a legacy eswitch into
// switchdev mode.
pub fn switch(
    sysfs: &dyn Sysfs,
    devlink: &dyn Devlink,
    opts: SwitchOptions,
) -> SwitchdevResult<SwitchReport> {
    let mut report = SwitchReport::default();
    for dev in list_pci_devices(sysfs)? {
        if !dev.is_pf() || dev.driver()?.as_deref() != Some(MLX5_DRIVER) {
            continue;
        }

        let vf_addrs = dev.vf_addresses()?;
        info!(pf = %dev.addr(), vfs = ?vf_addrs, "inspecting physical function");
        if vf_addrs.is_empty() {
            report.record(dev.addr(), PfOutcome::NoVfs);
            continue;
        }

        let mode = match devlink.dev_get(ESWITCH_OBJ, dev.addr()) {
            // A response without a mode is a malformed answer from the
            // tool, not a mode this tool declines to transition.
            Ok(dev_info) => dev_info.eswitch_mode().ok_or_else(|| {
                DevlinkError::ModeMissing {
                    pci_addr: dev.addr().to_string(),
                }
            })?,
            Err(DevlinkError::EswitchUnavailable { pci_addr, detail }) => {
                if opts.warn_on_no_sriov {
                    return Err(SwitchdevError::SriovNotEnabled { pci_addr });
                }
                info!(pf = %pci_addr, %detail, "no eswitch on this function, skipping");
                report.record(dev.addr(), PfOutcome::NoEswitch);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        match mode {
            EswitchMode::Legacy => {
                let unbound = transition(sysfs, devlink, &dev, opts.rebind)?;
                info!(pf = %dev.addr(), unbound, "switched eswitch to switchdev mode");
                report.record(
                    dev.addr(),
                    PfOutcome::Switched {
                        unbound,
                        rebound: opts.rebind,
                    },
                );
            }
            EswitchMode::Switchdev => {
                info!(pf = %dev.addr(), "already in switchdev mode");
                report.record(dev.addr(), PfOutcome::AlreadySwitchdev);
            }
            EswitchMode::Other(mode) => {
                warn!(pf = %dev.addr(), %mode, "unexpected eswitch mode, leaving untouched");
                report.record(dev.addr(), PfOutcome::UnexpectedMode { mode });
            }
        }
    }
    Ok(report)
}

// transition unbinds the PF's bound VFs, sets the eswitch mode and
// rebinds on request. Returns how many VFs it unbound.
//
// Unbinding is the acquisition of a degraded state and the mode-set is
// the risky step: if the set fails, every VF unbound here is rebound
// before the error propagates, so the host is never left with VFs
// stranded by a failed mode change. VFs that were already unbound are
// never touched.
fn transition(
    sysfs: &dyn Sysfs,
    devlink: &dyn Devlink,
    pf: &PciDevice<'_>,
    rebind: bool,
) -> SwitchdevResult<usize> {
    let binding = DriverBinding::new(sysfs, MLX5_DRIVER);
    let mut unbound = Vec::new();
    for vf in pf.vfs()? {
        if vf.bound() {
            binding.unbind(vf.addr())?;
            unbound.push(vf.addr().to_string());
        }
    }

    match devlink.dev_set(ESWITCH_OBJ, pf.addr(), MODE_PROP, SWITCHDEV_MODE) {
        Ok(()) => {
            if rebind {
                for addr in &unbound {
                    binding.bind(addr)?;
                }
            }
            Ok(unbound.len())
        }
        Err(err) => {
            // Best effort: every VF gets its bind attempt before the
            // original failure surfaces.
            for addr in &unbound {
                if let Err(bind_err) = binding.bind(addr) {
                    error!(vf = %addr, error = %bind_err, "rebind after failed mode change also failed");
                }
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use switchdev_devlink::{DevInfo, DevlinkResult};
    use switchdev_sysfs::fake::FakeSysfs;
    use switchdev_sysfs::pci::PCI_DEVICES;

    use super::*;

    const UNBIND: &str = "/sys/bus/pci/drivers/mlx5_core/unbind";
    const BIND: &str = "/sys/bus/pci/drivers/mlx5_core/bind";

    // DevlinkCall is one recorded invocation against the fake.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum DevlinkCall {
        Get(String),
        Set(String, String, String),
    }

    // FakeDevlink serves scripted eswitch modes and can be told to
    // fail the set call.
    #[derive(Default)]
    struct FakeDevlink {
        modes: Vec<(String, String)>,
        fail_set: bool,
        unavailable: Vec<String>,
        calls: RefCell<Vec<DevlinkCall>>,
    }

    impl FakeDevlink {
        fn with_mode(pci_addr: &str, mode: &str) -> Self {
            Self {
                modes: vec![(pci_addr.to_string(), mode.to_string())],
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<DevlinkCall> {
            self.calls.borrow().clone()
        }

        fn set_calls(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, DevlinkCall::Set(..)))
                .count()
        }
    }

    impl Devlink for FakeDevlink {
        fn dev_get(&self, _obj: &str, pci_addr: &str) -> DevlinkResult<DevInfo> {
            self.calls
                .borrow_mut()
                .push(DevlinkCall::Get(pci_addr.to_string()));
            if self.unavailable.iter().any(|a| a == pci_addr) {
                return Err(DevlinkError::EswitchUnavailable {
                    pci_addr: pci_addr.to_string(),
                    detail: "kernel answers: Operation not supported".to_string(),
                });
            }
            let mode = self
                .modes
                .iter()
                .find(|(addr, _)| addr == pci_addr)
                .map(|(_, mode)| mode.clone());
            Ok(DevInfo { mode })
        }

        fn dev_set(
            &self,
            _obj: &str,
            pci_addr: &str,
            prop: &str,
            value: &str,
        ) -> DevlinkResult<()> {
            self.calls.borrow_mut().push(DevlinkCall::Set(
                pci_addr.to_string(),
                prop.to_string(),
                value.to_string(),
            ));
            if self.fail_set {
                return Err(DevlinkError::CommandFailed(
                    "stdout: \nstderr: kernel answers: Invalid argument".to_string(),
                ));
            }
            Ok(())
        }
    }

    fn pci(leaf: &str) -> String {
        format!("{PCI_DEVICES}/{leaf}")
    }

    // A legacy-mode mlx5 PF 0000:03:00.1 with VFs .2 and .4, both
    // bound, plus a non-Mellanox NIC that must be ignored.
    fn legacy_pf_fixture() -> FakeSysfs {
        let mut fs = FakeSysfs::new();
        fs.add_file(pci("0000:03:00.1/sriov_numvfs"));
        fs.add_link(pci("0000:03:00.1/driver"), "/sys/bus/pci/drivers/mlx5_core");
        fs.add_link(pci("0000:03:00.1/virtfn0"), pci("0000:03:00.2"));
        fs.add_link(pci("0000:03:00.1/virtfn1"), pci("0000:03:00.4"));
        fs.add_link(pci("0000:03:00.2/driver"), "/sys/bus/pci/drivers/mlx5_core");
        fs.add_link(pci("0000:03:00.2/physfn"), pci("0000:03:00.1"));
        fs.add_link(pci("0000:03:00.4/driver"), "/sys/bus/pci/drivers/mlx5_core");
        fs.add_link(pci("0000:03:00.4/physfn"), pci("0000:03:00.1"));
        fs.add_file(pci("0000:05:00.0/sriov_numvfs"));
        fs.add_link(pci("0000:05:00.0/driver"), "/sys/bus/pci/drivers/ixgbe");
        fs
    }

    #[test]
    fn test_legacy_pf_is_switched_without_rebind() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "legacy");

        let report = switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        // VFs unbound in virtfn index order, then exactly one set
        // call, and no binds since rebind defaults off.
        assert_eq!(
            fs.writes_to(UNBIND),
            vec!["0000:03:00.2", "0000:03:00.4"]
        );
        assert!(fs.writes_to(BIND).is_empty());
        assert_eq!(
            devlink.calls(),
            vec![
                DevlinkCall::Get("0000:03:00.1".to_string()),
                DevlinkCall::Set(
                    "0000:03:00.1".to_string(),
                    "mode".to_string(),
                    "switchdev".to_string()
                ),
            ]
        );
        assert_eq!(report.switched(), 1);
        assert_eq!(
            report.devices,
            vec![(
                "0000:03:00.1".to_string(),
                PfOutcome::Switched {
                    unbound: 2,
                    rebound: false
                }
            )]
        );
    }

    #[test]
    fn test_rebind_flag_rebinds_what_was_unbound() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "legacy");

        let opts = SwitchOptions {
            rebind: true,
            ..SwitchOptions::default()
        };
        switch(&fs, &devlink, opts).unwrap();

        assert_eq!(fs.writes_to(BIND), vec!["0000:03:00.2", "0000:03:00.4"]);
    }

    #[test]
    fn test_switchdev_pf_is_idempotent() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "switchdev");

        let report = switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        assert!(fs.writes().is_empty());
        assert_eq!(devlink.set_calls(), 0);
        assert_eq!(
            report.devices,
            vec![("0000:03:00.1".to_string(), PfOutcome::AlreadySwitchdev)]
        );
    }

    #[test]
    fn test_failed_mode_set_rebinds_every_unbound_vf() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink {
            fail_set: true,
            ..FakeDevlink::with_mode("0000:03:00.1", "legacy")
        };

        let err = switch(&fs, &devlink, SwitchOptions::default()).unwrap_err();

        assert!(matches!(err, SwitchdevError::Devlink(_)));
        assert_eq!(
            fs.writes_to(UNBIND),
            vec!["0000:03:00.2", "0000:03:00.4"]
        );
        // Exactly one bind per previously-unbound VF before the error
        // surfaced.
        assert_eq!(fs.writes_to(BIND), vec!["0000:03:00.2", "0000:03:00.4"]);
    }

    #[test]
    fn test_already_unbound_vf_is_left_alone() {
        // Same layout as legacy_pf_fixture but VF .2 has no driver
        // link: it was already unbound before the run.
        let mut fs = FakeSysfs::new();
        fs.add_file(pci("0000:03:00.1/sriov_numvfs"));
        fs.add_link(pci("0000:03:00.1/driver"), "/sys/bus/pci/drivers/mlx5_core");
        fs.add_link(pci("0000:03:00.1/virtfn0"), pci("0000:03:00.2"));
        fs.add_link(pci("0000:03:00.1/virtfn1"), pci("0000:03:00.4"));
        fs.add_link(pci("0000:03:00.2/physfn"), pci("0000:03:00.1"));
        fs.add_link(pci("0000:03:00.4/driver"), "/sys/bus/pci/drivers/mlx5_core");
        fs.add_link(pci("0000:03:00.4/physfn"), pci("0000:03:00.1"));
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "legacy");

        let opts = SwitchOptions {
            rebind: true,
            ..SwitchOptions::default()
        };
        switch(&fs, &devlink, opts).unwrap();

        // Only the bound VF shows up on either control file.
        assert_eq!(fs.writes_to(UNBIND), vec!["0000:03:00.4"]);
        assert_eq!(fs.writes_to(BIND), vec!["0000:03:00.4"]);
    }

    #[test]
    fn test_pf_without_vfs_is_skipped() {
        let mut fs = FakeSysfs::new();
        fs.add_file(pci("0000:03:00.0/sriov_numvfs"));
        fs.add_link(pci("0000:03:00.0/driver"), "/sys/bus/pci/drivers/mlx5_core");
        let devlink = FakeDevlink::with_mode("0000:03:00.0", "legacy");

        let report = switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        assert!(devlink.calls().is_empty());
        assert_eq!(
            report.devices,
            vec![("0000:03:00.0".to_string(), PfOutcome::NoVfs)]
        );
    }

    #[test]
    fn test_no_eswitch_skipped_by_default() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink {
            unavailable: vec!["0000:03:00.1".to_string()],
            ..FakeDevlink::default()
        };

        let report = switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        assert!(fs.writes().is_empty());
        assert_eq!(
            report.devices,
            vec![("0000:03:00.1".to_string(), PfOutcome::NoEswitch)]
        );
    }

    #[test]
    fn test_no_eswitch_raises_in_strict_mode() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink {
            unavailable: vec!["0000:03:00.1".to_string()],
            ..FakeDevlink::default()
        };

        let opts = SwitchOptions {
            warn_on_no_sriov: true,
            ..SwitchOptions::default()
        };
        let err = switch(&fs, &devlink, opts).unwrap_err();
        assert!(matches!(
            err,
            SwitchdevError::SriovNotEnabled { pci_addr } if pci_addr == "0000:03:00.1"
        ));
    }

    #[test]
    fn test_missing_mode_is_a_fatal_devlink_error() {
        let fs = legacy_pf_fixture();
        // The fake answers the query but its device entry carries no
        // mode field at all.
        let devlink = FakeDevlink::default();

        let err = switch(&fs, &devlink, SwitchOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            SwitchdevError::Devlink(DevlinkError::ModeMissing { ref pci_addr })
                if pci_addr == "0000:03:00.1"
        ));
        assert!(fs.writes().is_empty());
    }

    #[test]
    fn test_unknown_mode_string_is_skipped_not_fatal() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "smfs");

        let report = switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        assert!(fs.writes().is_empty());
        assert_eq!(devlink.set_calls(), 0);
        assert_eq!(
            report.devices,
            vec![(
                "0000:03:00.1".to_string(),
                PfOutcome::UnexpectedMode {
                    mode: "smfs".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_report_serializes_outcomes() {
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "legacy");
        let report = switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        let json = report.to_json().unwrap();
        assert!(json.contains("\"outcome\": \"switched\""));
        assert!(json.contains("0000:03:00.1"));
    }

    #[test]
    fn test_second_run_after_switch_does_nothing() {
        // Run once against legacy, then simulate the post-switch state
        // and assert the second run is a pure no-op.
        let fs = legacy_pf_fixture();
        let devlink = FakeDevlink::with_mode("0000:03:00.1", "legacy");
        switch(&fs, &devlink, SwitchOptions::default()).unwrap();

        let fs2 = legacy_pf_fixture();
        let devlink2 = FakeDevlink::with_mode("0000:03:00.1", "switchdev");
        switch(&fs2, &devlink2, SwitchOptions::default()).unwrap();

        assert!(fs2.writes().is_empty());
        assert_eq!(devlink2.set_calls(), 0);
    }
}
