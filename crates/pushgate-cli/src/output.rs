use serde::Serialize;
use std::io::Write;

/// Pretty JSON on stdout. A closed pipe is reported as an error, not a panic.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}
