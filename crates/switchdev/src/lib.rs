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

//! Reconfigures SR-IOV capable Mellanox ConnectX NICs (mlx5_core) from
//! legacy SR-IOV mode into switchdev mode, unbinding and optionally
//! rebinding VFs around the eswitch mode change.

// cmd module contains the CLI argument spec and command handlers.
pub mod cmd;
// error module defines the crate error type.
pub mod error;
// logging module sets up the global tracing subscriber.
pub mod logging;
// show module prints the read-only adapter inventory.
pub mod show;
// switch module drives the legacy -> switchdev transition.
pub mod switch;

pub use error::{SwitchdevError, SwitchdevResult};
pub use logging::init_logging;
pub use show::show;
pub use switch::{PfOutcome, SwitchOptions, SwitchReport, switch};

// PROG_NAME prefixes every top-level error message.
pub const PROG_NAME: &str = "mlnx-switchdev-mode";
