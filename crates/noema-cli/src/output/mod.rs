pub mod console;

use serde::Serialize;

/// Print one pretty-printed JSON result object on stdout. Every command
/// emits exactly one of these.
pub fn emit<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Structured error object on stdout, mirroring the success path.
pub fn emit_error(err: &anyhow::Error) {
    let body = serde_json::json!({ "error": format!("{err:#}") });
    println!(
        "{}",
        serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
    );
}
