//! CLI output formatting.
//!
//! Every entity leads with a 1-based, zero-padded index and its identity;
//! details follow on indented lines.
//!
//! ## List
//!
//! ```text
//! sport (3 photos)
//!     001 photo-01.jpg (2048x1538)
//!     002 photo-02.jpg
//!     003 dawn
//!         avif: dawn.avif
//!         fallback: dawn.jpg
//! ```
//!
//! ## Browse
//!
//! ```text
//! [sport] loading...
//! [sport] 3 photos
//! lightbox 002/003 photo-02
//! lightbox closed
//! ```
//!
//! Each output has a `format_*` function (pure, returns lines) and a
//! `print_*` wrapper that writes to stdout.

use crate::gallery::Snapshot;
use crate::generate::GenerateReport;
use crate::lightbox::Selection;
use crate::session::RenderSink;
use crate::types::{CategoryKey, ImageRecord};

/// Format a 0-based position as a 1-based, 3-digit zero-padded index.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos + 1)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn record_lines(index: usize, record: &ImageRecord) -> Vec<String> {
    match record {
        ImageRecord::Single {
            filename,
            dimensions,
        } => {
            let line = match dimensions {
                Some(d) => format!("{} {} ({}x{})", format_index(index), filename, d.width, d.height),
                None => format!("{} {}", format_index(index), filename),
            };
            vec![format!("{}{}", indent(1), line)]
        }
        ImageRecord::Grouped {
            base_name,
            preferred,
            fallback,
        } => {
            let mut lines = vec![format!("{}{} {}", indent(1), format_index(index), base_name)];
            if let Some(p) = preferred {
                lines.push(format!("{}avif: {}", indent(2), p));
            }
            if let Some(f) = fallback {
                lines.push(format!("{}fallback: {}", indent(2), f));
            }
            lines
        }
    }
}

/// Format a resolved category.
pub fn format_snapshot(snapshot: &Snapshot) -> Vec<String> {
    let count = snapshot.sequence.len();
    let mut lines = vec![format!(
        "{} ({} photo{})",
        snapshot.category,
        count,
        if count == 1 { "" } else { "s" }
    )];
    for (i, record) in snapshot.sequence.iter().enumerate() {
        lines.extend(record_lines(i, record));
    }
    lines
}

pub fn print_snapshot(snapshot: &Snapshot) {
    for line in format_snapshot(snapshot) {
        println!("{}", line);
    }
}

/// Format the pages written by `generate`.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            format!(
                "{} {} → {} ({} photos)",
                format_index(i),
                page.category,
                page.path,
                page.photo_count
            )
        })
        .collect();
    lines.push(format!("Generated {} pages", report.pages.len()));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

pub fn format_loading(category: &CategoryKey) -> String {
    format!("[{category}] loading...")
}

pub fn format_gallery_changed(snapshot: &Snapshot) -> String {
    format!("[{}] {} photos", snapshot.category, snapshot.sequence.len())
}

pub fn format_lightbox_shown(selection: &Selection) -> String {
    format!(
        "lightbox {}/{:0>3} {}",
        format_index(selection.index()),
        selection.len(),
        selection.record().caption()
    )
}

pub fn format_lightbox_hidden() -> String {
    "lightbox closed".to_string()
}

/// Prints session notifications as they happen.
#[derive(Default)]
pub struct PrintSink;

impl RenderSink for PrintSink {
    fn gallery_changed(&mut self, snapshot: &Snapshot) {
        println!("{}", format_gallery_changed(snapshot));
        for (i, record) in snapshot.sequence.iter().enumerate() {
            for line in record_lines(i, record) {
                println!("{}", line);
            }
        }
    }

    fn lightbox_shown(&mut self, selection: &Selection) {
        println!("{}", format_lightbox_shown(selection));
    }

    fn lightbox_hidden(&mut self) {
        println!("{}", format_lightbox_hidden());
    }

    fn loading(&mut self, category: &CategoryKey) {
        println!("{}", format_loading(category));
    }
}
