//! # iconsmith
//!
//! Turn one source image into a complete set of application icons: a Windows
//! `.ico`, a macOS `.icns` (or PNG set where `iconutil` is unavailable), a
//! generic PNG ladder and a favicon. Before export the image can be restyled
//! with adjustments, effects, backgrounds, geometric transforms or one of
//! eight named presets.
//!
//! # Architecture: Compose, Then Export
//!
//! ```text
//! 1. Compose   source + EditSettings  →  edited RgbaImage   (pure, in memory)
//! 2. Export    edited + targets       →  icons_<timestamp>/ (worker thread)
//! ```
//!
//! Composition never touches the disk and never mutates its input, so it is
//! tested entirely with synthetic images. Export owns its copy of the edited
//! image and reports back over a channel, so a host can keep editing while
//! icons are written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | RGBA primitives: shadow, masks, backgrounds, enhancers, noise, rotation |
//! | [`preset`] | The eight-entry preset catalog and its fixed step order |
//! | [`compose`] | Pure `compose(source, settings)` plus the per-section steps |
//! | [`session`] | Incremental editing model with a pristine source and an edited image |
//! | [`config`] | `EditSettings` TOML loading, validation, stock file, thread cap |
//! | [`export`] | Multi-size resampling and the ICO / ICNS / PNG writers |
//! | [`orchestrator`] | Stage ordering, progress events, timestamped output folder |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Presets Replace, Transforms Follow
//!
//! A preset is a complete look: when one is named, the manual adjust, effect
//! and background settings are ignored rather than stacked on top. Geometric
//! transforms are orthogonal to styling and always run last, so a preset can
//! still be cropped, rotated or masked.
//!
//! ## Capability-Checked macOS Export
//!
//! Packing `.icns` needs Apple's `iconutil`. Instead of branching on the host
//! OS inside the exporter, the check goes through the
//! [`export::IconsetConverter`] trait. The chosen path is recorded in
//! [`orchestrator::ExportReport`], and tests drive both paths with a mock.
//!
//! ## No Partial Success
//!
//! An export either completes every enabled stage or stops at the first
//! failure with [`export::ExportError::Aborted`]. Files written by earlier
//! stages are left in place for inspection.

pub mod compose;
pub mod config;
pub mod export;
pub mod imaging;
pub mod orchestrator;
pub mod output;
pub mod preset;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
