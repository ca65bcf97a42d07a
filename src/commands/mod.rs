// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! CLI subcommands, one module per command.

pub mod analyze;
pub mod capacity;
pub mod conceal;
pub mod info;
pub mod keys;
pub mod reveal;
pub mod verify;
