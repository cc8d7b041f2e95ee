//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Export
//!
//! ```text
//! ==> Starting icon generation...
//!     [#---------]  10%
//! ==> Generating Windows icon...
//!     [####------]  40%
//! ...
//! Icon generation complete!
//!
//! icons_20260101_120000/
//!     app_icon.ico
//!     macos_icons/ (7 files, png fallback)
//!     png_icons/ (8 files)
//! Wrote 16 files
//! ```
//!
//! ## Presets
//!
//! ```text
//! Modern Flat (modern-flat)
//!     Punchier color, rounded corners and a soft drop shadow
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Adjust: brightness +10, saturation -20
//! Effects: rounded corners (30px), shadow (blur 15)
//! Transform: crop square, rotate 90°
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and, where the CLI needs it, a `print_*` wrapper that writes
//! to stdout. Format functions are pure.

use crate::config::EditSettings;
use crate::export::MacosStrategy;
use crate::orchestrator::{ExportEvent, ExportReport};
use crate::preset::Preset;
use std::collections::BTreeMap;
use std::path::Path;

const BAR_WIDTH: usize = 10;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `[####------]  40%`
fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = percent as usize * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::Progress(p) => vec![format!("{}{}", indent(1), progress_bar(*p))],
        ExportEvent::Status(status) => vec![format!("==> {status}")],
        ExportEvent::Finished(message) => vec![message.clone()],
        ExportEvent::Failed(message) => vec![format!("Error: {message}")],
    }
}

/// Format the files of a finished export, grouped by top-level entry.
///
/// Files directly in the output folder are listed by name; subdirectories
/// are collapsed to a count.
pub fn format_export_report(report: &ExportReport) -> Vec<String> {
    let dir_name = report
        .output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.output_dir.display().to_string());
    let mut lines = vec![format!("{dir_name}/")];

    let mut groups: BTreeMap<String, usize> = BTreeMap::new();
    let mut top_files = Vec::new();
    for file in &report.files {
        let relative = file.strip_prefix(&report.output_dir).unwrap_or(file);
        let mut parts = relative.components();
        let first = parts
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default();
        if parts.next().is_some() {
            *groups.entry(first).or_insert(0) += 1;
        } else {
            top_files.push(first);
        }
    }

    for name in top_files {
        lines.push(format!("{}{name}", indent(1)));
    }
    for (group, count) in groups {
        let plural = if count == 1 { "file" } else { "files" };
        let strategy = match report.macos_strategy {
            Some(MacosStrategy::PngFallback) if group == crate::export::MACOS_FALLBACK_DIR => {
                ", png fallback"
            }
            _ => "",
        };
        lines.push(format!(
            "{}{group}/ ({count} {plural}{strategy})",
            indent(1)
        ));
    }

    let total = report.files.len();
    let plural = if total == 1 { "file" } else { "files" };
    lines.push(format!("Wrote {total} {plural}"));
    lines
}

pub fn print_export_report(report: &ExportReport) {
    println!();
    for line in format_export_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Format the preset catalog: name and slug, description indented below.
pub fn format_preset_list(presets: &[Preset]) -> Vec<String> {
    let mut lines = Vec::new();
    for preset in presets {
        lines.push(format!("{} ({})", preset.name, preset.slug()));
        lines.push(format!("{}{}", indent(1), preset.description));
    }
    lines
}

pub fn print_preset_list(presets: &[Preset]) {
    for line in format_preset_list(presets) {
        println!("{line}");
    }
}

// ============================================================================
// Pipeline summary
// ============================================================================

/// Describe which steps the given settings will run, in pipeline order.
///
/// Sections with nothing enabled are omitted; an all-default setting yields
/// a single "No edits" line.
pub fn format_pipeline(settings: &EditSettings) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(name) = &settings.preset {
        lines.push(format!("Preset: {name}"));
    } else {
        let a = &settings.adjust;
        let adjust: Vec<String> = [
            ("brightness", a.brightness),
            ("contrast", a.contrast),
            ("saturation", a.saturation),
            ("sharpness", a.sharpness),
        ]
        .iter()
        .filter(|(_, v)| *v != 0)
        .map(|(name, v)| format!("{name} {}", signed(*v)))
        .collect();
        if !adjust.is_empty() {
            lines.push(format!("Adjust: {}", adjust.join(", ")));
        }

        let e = &settings.effects;
        let mut effects = Vec::new();
        if e.blur > 0 {
            effects.push(format!("blur {}", e.blur));
        }
        if e.rounded_corners {
            effects.push(format!("rounded corners ({}px)", e.corner_radius));
        }
        if e.border {
            effects.push(format!("border ({}px)", e.border_width));
        }
        if e.glass {
            effects.push("glass".to_string());
        }
        if e.shadow {
            effects.push(format!("shadow (blur {})", e.shadow_blur));
        }
        if !effects.is_empty() {
            lines.push(format!("Effects: {}", effects.join(", ")));
        }

        let b = &settings.background;
        let mut background = Vec::new();
        if b.padding > 0 {
            background.push(format!("padding {}px", b.padding));
        }
        if b.fill {
            background.push(format!("fill {}", b.fill_color));
        }
        if b.gradient {
            background.push(format!("gradient {} to {}", b.gradient_from, b.gradient_to));
        }
        if !background.is_empty() {
            lines.push(format!("Background: {}", background.join(", ")));
        }
    }

    let t = &settings.transform;
    let mut transform = Vec::new();
    if t.crop_square {
        transform.push("crop square".to_string());
    }
    if t.rotate != 0.0 {
        transform.push(format!("rotate {}\u{b0}", t.rotate));
    }
    if t.flip_horizontal {
        transform.push("flip horizontal".to_string());
    }
    if t.flip_vertical {
        transform.push("flip vertical".to_string());
    }
    if t.circular_mask {
        transform.push("circular mask".to_string());
    }
    if !transform.is_empty() {
        lines.push(format!("Transform: {}", transform.join(", ")));
    }

    if lines.is_empty() {
        lines.push("No edits".to_string());
    }
    lines
}

pub fn print_pipeline(settings: &EditSettings) {
    for line in format_pipeline(settings) {
        println!("{line}");
    }
}

/// One line naming a written preview image.
pub fn format_preview_written(path: &Path, width: u32, height: u32) -> String {
    format!("Preview {}x{} \u{2192} {}", width, height, path.display())
}
