//! Report line formatting
//!
//! One line per URL: `found: <url> "<body>"` or `not found: <url>`.

use crate::state::VisitRecord;
use std::io::{self, Write};

/// Formats the report line for `url` given its record
///
/// A missing record, a failed fetch and a claim whose fetch never completed
/// all report as `not found`. The body is quoted with escapes so that a body
/// containing quotes or newlines still fits on one line.
pub fn format_report_line(url: &str, record: Option<&VisitRecord>) -> String {
    match record.and_then(VisitRecord::body) {
        Some(body) => format!("found: {} {:?}", url, body),
        None => format!("not found: {}", url),
    }
}

/// Writes report lines, newline-terminated, sorted by line text
pub fn write_report<W: Write>(out: &mut W, mut lines: Vec<String>) -> io::Result<()> {
    lines.sort();
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
