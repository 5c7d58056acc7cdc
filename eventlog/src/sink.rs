//! Diagnostic mirror.
//!
//! Every recorded entry is echoed to `tracing` so it also shows up in the
//! process diagnostics. Errors map to `error!`, warnings to `warn!`, and all
//! other levels to `info!`.

use crate::models::{LogEntry, LogLevel};

/// Echoes an entry to the `tracing` subscriber at its mapped severity.
pub fn mirror(entry: &LogEntry) {
    let data = serde_json::Value::Object(entry.data().clone());

    match entry.level() {
        LogLevel::Error => tracing::error!(
            entry_id = %entry.id(),
            level = entry.level().label(),
            %data,
            "[{}] {}",
            entry.level().label(),
            entry.message()
        ),
        LogLevel::Warning => tracing::warn!(
            entry_id = %entry.id(),
            level = entry.level().label(),
            %data,
            "[{}] {}",
            entry.level().label(),
            entry.message()
        ),
        LogLevel::Info | LogLevel::Success => tracing::info!(
            entry_id = %entry.id(),
            level = entry.level().label(),
            %data,
            "[{}] {}",
            entry.level().label(),
            entry.message()
        ),
    }
}
