// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad: stateful diagram render/retry core (syntax KB, Kroki client, MCP).
//!
//! The crate serves the render/validate/retry loop to an external generation
//! agent: look up a syntax ruleset, submit diagram source to a Kroki-compatible
//! backend, fold the classified outcome into per-session state, repeat.

pub mod config;
pub mod kroki;
pub mod mcp;
pub mod model;
pub mod proxy;
pub mod syntax;
