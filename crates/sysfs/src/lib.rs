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

//! Read-mostly inventory of PCI devices and network interfaces as the
//! kernel exposes them under sysfs, plus the driver bind/unbind control
//! files. All entities are ephemeral views over live kernel state.

// binding module wraps the per-driver bind/unbind control files.
pub mod binding;
// error module defines the crate error type.
pub mod error;
// fake module provides an in-memory sysfs for tests.
pub mod fake;
// net module models /sys/class/net entries.
pub mod net;
// pci module models /sys/bus/pci/devices entries.
pub mod pci;
// provider module defines the Sysfs trait and the real /sys backend.
pub mod provider;

pub use binding::DriverBinding;
pub use error::{SysfsError, SysfsResult};
pub use net::{NetDevice, list_netdevices, pci_to_netdev_map};
pub use pci::{PciDevice, list_pci_devices};
pub use provider::{HostSysfs, Sysfs};
