use clap::{Parser, Subcommand, ValueEnum};
use iconsmith::config::{self, EditSettings, ExportTargets};
use iconsmith::export::Iconutil;
use iconsmith::orchestrator::{self, ExportOptions};
use iconsmith::{compose, imaging, output, preset};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "iconsmith")]
#[command(about = "Generate styled application icons from a single image")]
#[command(long_about = "\
Generate styled application icons from a single image

The source is restyled according to a settings file (or a named preset),
then written as one or more icon sets into a timestamped folder:

  icons_YYYYMMDD_HHMMSS/
  ├── app_icon.ico        # Windows: 16-256 px
  ├── AppIcon.icns        # macOS, when iconutil is available
  ├── macos_icons/        # macOS fallback: 16-1024 px PNGs
  ├── png_icons/          # 16-1024 px PNGs
  └── favicon.ico         # 16, 32, 48 px

Run 'iconsmith gen-config' to generate a documented settings file and
'iconsmith presets' to list the built-in looks.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Flags shared by commands that compose an image.
#[derive(clap::Args, Clone)]
struct StyleArgs {
    /// Settings file (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset name or slug, overriding the settings file
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Compose the source image and export icon sets
    Export {
        /// Source image (PNG, JPEG, BMP, GIF or WebP)
        source: PathBuf,

        /// Directory that receives the timestamped icons_* folder
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Icon sets to write, overriding the settings file
        #[arg(long, value_enum, value_delimiter = ',')]
        targets: Option<Vec<Target>>,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// Compose the source image and save it as a single PNG
    Preview {
        /// Source image
        source: PathBuf,

        /// Where to write the composed PNG
        out: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// List the built-in presets
    Presets,
    /// Print a stock settings file with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Windows,
    Macos,
    Png,
    Favicon,
}

fn targets_from(list: &[Target]) -> ExportTargets {
    let mut targets = ExportTargets::NONE;
    for target in list {
        match target {
            Target::Windows => targets.windows = true,
            Target::Macos => targets.macos = true,
            Target::Png => targets.png_set = true,
            Target::Favicon => targets.favicon = true,
        }
    }
    targets
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Export {
            source,
            output: output_root,
            targets,
            style,
        } => {
            let mut settings = resolve_settings(&style)?;
            if let Some(list) = targets {
                settings.export = targets_from(&list);
            }
            init_thread_pool(&settings.processing);

            let edited = compose_source(&source, &settings)?;
            let options = ExportOptions {
                targets: settings.export,
                output_root,
            };
            let handle = orchestrator::spawn_export(edited, options, Arc::new(Iconutil))?;
            for event in handle.events() {
                for line in output::format_export_event(&event) {
                    println!("{line}");
                }
            }
            // The worker's Failed event has already been printed.
            let Ok(report) = handle.wait() else {
                std::process::exit(1);
            };
            output::print_export_report(&report);
        }
        Command::Preview { source, out, style } => {
            let settings = resolve_settings(&style)?;
            output::print_pipeline(&settings);
            let edited = compose_source(&source, &settings)?;
            edited.save_with_format(&out, image::ImageFormat::Png)?;
            println!(
                "{}",
                output::format_preview_written(&out, edited.width(), edited.height())
            );
        }
        Command::Presets => {
            output::print_preset_list(&preset::PRESETS);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the settings file (if any) and apply the `--preset` override.
fn resolve_settings(style: &StyleArgs) -> Result<EditSettings, config::ConfigError> {
    let mut settings = config::load_settings(style.config.as_deref())?;
    if let Some(name) = &style.preset {
        settings.preset = Some(name.clone());
    }
    Ok(settings)
}

/// Decode the source and compose it with the settings.
fn compose_source(
    source: &Path,
    settings: &EditSettings,
) -> Result<image::RgbaImage, imaging::ImagingError> {
    let original = imaging::load_image(source)?;
    compose::compose(&original, settings)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
