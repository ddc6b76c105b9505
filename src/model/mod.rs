// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! One [`DiagramSession`] per active caller session, mutated exclusively through
//! its two transitions (submit, apply-outcome).

pub mod session;

pub use session::{DiagramSession, RenderTicket};
