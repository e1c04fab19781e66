// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU-independent building blocks: operands, sinks, errors, image output.

pub mod error;
pub mod expr;
pub mod imagestore;
pub mod operand;
pub mod sink;
