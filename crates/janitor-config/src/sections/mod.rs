// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod logging;
mod retention;
mod watch;

pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use retention::{ParseRetentionError, RetentionConfig, RetentionConfigLayer, RetentionPeriod};
pub use watch::{WatchConfig, WatchConfigLayer};
