use crate::cli::RenderArgs;
use crate::commands::ReportInputs;
use anyhow::{Context, Result};
use plarix::signals::scan_diff;
use std::io::Read;

/// Execute the render command: scan a local diff and print the report
pub fn execute(args: RenderArgs) -> Result<()> {
    let inputs = ReportInputs::load(&args.inputs)?;

    let diff = if args.diff == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read diff from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.diff)
            .with_context(|| format!("Failed to read diff {}", args.diff))?
    };

    let signals = scan_diff(&diff);
    println!("{}", inputs.render(&signals));
    Ok(())
}
