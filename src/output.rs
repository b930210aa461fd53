//! CLI output formatting.
//!
//! Every command produces a [`Report`]. Plain output prints the result first
//! (so `$(imgstamp url foo.png)` works in scripts) and indented context after
//! it only when there is some; `--json` prints the whole report as one JSON
//! object.
//!
//! ```text
//! $ imgstamp path --request-path /images/foo bar?a=1
//! /images/foo/bar?modify=1700000000&a=1
//!
//! $ imgstamp resize /images/hero.jpg --width 800
//! /images/hero.jpg → 800x533
//!     File: public/images/hero.jpg
//! ```

use crate::imaging::Dimensions;
use serde::Serialize;
use std::path::PathBuf;

/// Result of one CLI command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Report {
    Rewrite {
        reference: String,
        request_path: String,
        output: String,
    },
    Transform {
        public_path: String,
        file: PathBuf,
        dimensions: Dimensions,
    },
    Identify {
        public_path: String,
        file: PathBuf,
        dimensions: Dimensions,
    },
}

fn size(d: &Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

/// Plain-text lines for a report.
pub fn format_report(report: &Report) -> Vec<String> {
    match report {
        Report::Rewrite { output, .. } => vec![output.clone()],
        Report::Transform {
            public_path,
            file,
            dimensions,
        } => vec![
            format!("{public_path} → {}", size(dimensions)),
            format!("    File: {}", file.display()),
        ],
        Report::Identify { dimensions, .. } => vec![size(dimensions)],
    }
}

/// Render a report as plain text or JSON.
pub fn render(report: &Report, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(report)
    } else {
        Ok(format_report(report).join("\n"))
    }
}

/// Print a report to stdout.
pub fn print_report(report: &Report, json: bool) -> Result<(), serde_json::Error> {
    println!("{}", render(report, json)?);
    Ok(())
}
