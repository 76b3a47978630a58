//! `classgen fragments` command.

use std::path::Path;

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::fragments::{parser, GAP};

/// Execute the `fragments` command.
///
/// # Errors
///
/// Returns an error string if the file does not exist or cannot be read.
pub fn run(file: &Path) -> Result<(), String> {
    let ctx = ServiceContext::live(Settings::default()).map_err(|e| e.to_string())?;
    println!("{}", run_with_context(&ctx, file)?);
    Ok(())
}

/// Lists every non-gap fragment of `file` with the line it starts on.
///
/// # Errors
///
/// Returns an error string if the file does not exist or cannot be read.
pub fn run_with_context(ctx: &ServiceContext, file: &Path) -> Result<String, String> {
    if !ctx.fs.exists(file) {
        return Err(format!("no such file: {}", file.display()));
    }
    let map = parser::parse_file(ctx, file).map_err(|e| e.to_string())?;

    let mut line = 1;
    let mut rows = Vec::new();
    for fragment in map.fragments() {
        if fragment.key != GAP && !fragment.text.is_empty() {
            rows.push(format!("{line:>5}  {}", fragment.key));
        }
        line += fragment.text.matches('\n').count();
    }
    Ok(rows.join("\n"))
}
