/// Grayscale image to heightmap converter entry point
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use heightmap_converter::progress::stage_bar;
use heightmap_converter::{
    Colormap, ConversionSettings, HeightmapConverter, JsonLayout, SettingsInput,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heightmap-converter")]
#[command(about = "Convert grayscale images into heightmap grids", long_about = None)]
struct Cli {
    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an image and export the heightmap as .lua, .csv or .json
    Convert(ConvertArgs),
    /// Convert an image and render only a PNG preview
    Preview(PreviewArgs),
}

/// Options shared by every command that processes an image
#[derive(Args, Debug)]
struct TransformArgs {
    /// Input image (png/jpg/etc)
    #[arg(short, long)]
    input: PathBuf,

    /// JSON settings file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Height scale applied to normalised intensity (default: 100)
    #[arg(long, allow_hyphen_values = true)]
    scale: Option<String>,

    /// Height offset added after scaling (default: 0)
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<String>,

    /// Resize width before processing, e.g. 500, 500px or 50%
    #[arg(long)]
    resize_width: Option<String>,

    /// Resize height before processing, e.g. 500, 500px or 50%
    #[arg(long)]
    resize_height: Option<String>,

    /// Process the image at its original size
    #[arg(long, conflicts_with_all = ["resize_width", "resize_height"])]
    no_resize: bool,

    /// Tile edge in pixels used while transforming (default: 500)
    #[arg(long)]
    tile_size: Option<u32>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    transform: TransformArgs,

    /// Output heightmap; the extension selects the format
    #[arg(short, long)]
    output: PathBuf,

    /// Grid rows written per chunk (default: 100)
    #[arg(long)]
    chunk_rows: Option<usize>,

    /// JSON layout when the grid spans several chunks
    #[arg(long, value_enum)]
    json_layout: Option<JsonLayout>,

    /// Also render a PNG preview to this path
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Colormap for the preview
    #[arg(long, value_enum, default_value_t = Colormap::Gray)]
    colormap: Colormap,

    /// Write <output>.manifest.json describing the export
    #[arg(long)]
    manifest: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    transform: TransformArgs,

    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,

    /// Colormap for the preview
    #[arg(long, value_enum, default_value_t = Colormap::Gray)]
    colormap: Colormap,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => run_convert(args, cli.quiet),
        Commands::Preview(args) => run_preview(args, cli.quiet),
    }
}

fn run_convert(args: ConvertArgs, quiet: bool) -> Result<()> {
    let input = SettingsInput {
        export_chunk_rows: args.chunk_rows,
        json_layout: args.json_layout,
        ..settings_input(&args.transform)
    };
    let mut session = processed_session(&args.transform, &input, quiet)?;

    let mut pb = stage_bar("Saving heightmap", quiet);
    let format = session
        .save(&args.output, &mut pb)
        .with_context(|| format!("Failed to save heightmap: {}", args.output.display()))?;
    println!("Saved {} ({})", args.output.display(), format.name());

    if args.manifest {
        session.write_manifest(&args.output, format)?;
    }

    if let Some(preview_path) = &args.preview {
        session
            .preview(preview_path, args.colormap)
            .with_context(|| format!("Failed to render preview: {}", preview_path.display()))?;
        println!("Saved {} (preview)", preview_path.display());
    }

    println!("Conversion complete!");
    Ok(())
}

fn run_preview(args: PreviewArgs, quiet: bool) -> Result<()> {
    let input = settings_input(&args.transform);
    let mut session = processed_session(&args.transform, &input, quiet)?;

    let range = session
        .preview(&args.output, args.colormap)
        .with_context(|| format!("Failed to render preview: {}", args.output.display()))?;

    println!("Saved {} (preview)", args.output.display());
    println!("  Colour scale: {:.3} (bottom) to {:.3} (top)", range.min, range.max);
    Ok(())
}

fn settings_input(args: &TransformArgs) -> SettingsInput {
    SettingsInput {
        scale: args.scale.clone(),
        offset: args.offset.clone(),
        preprocess: args.no_resize.then_some(false),
        width: args.resize_width.clone(),
        height: args.resize_height.clone(),
        tile_size: args.tile_size,
        ..Default::default()
    }
}

/// Build a session from the config file and flags, then process the image.
fn processed_session(
    args: &TransformArgs,
    input: &SettingsInput,
    quiet: bool,
) -> Result<HeightmapConverter> {
    let base = match &args.config {
        Some(path) => ConversionSettings::from_json_file(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?,
        None => ConversionSettings::default(),
    };

    let mut session = HeightmapConverter::new(base);
    session.apply_inputs(input)?;
    session.load_image(&args.input)?;

    let mut pb = stage_bar("Processing image", quiet);
    let heightmap = session
        .process(&mut pb)
        .with_context(|| format!("Failed to process image: {}", args.input.display()))?;
    println!(
        "Created {}x{} heightmap from {}",
        heightmap.width(),
        heightmap.height(),
        args.input.display()
    );

    Ok(session)
}
