// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound peer communication: HTTP client and fan-out aggregator.

pub mod aggregator;
pub mod client;
