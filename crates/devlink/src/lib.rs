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

//! Subprocess boundary to the kernel's device management tool
//! (`devlink`). Queries go through `--json` output; mutations are
//! plain invocations judged by exit status.

// error module defines the crate error type.
pub mod error;
// runner module implements the Devlink trait over the real CLI tool.
pub mod runner;

pub use error::{DevlinkError, DevlinkResult};
pub use runner::{DevInfo, Devlink, DevlinkRunner, EswitchMode};
