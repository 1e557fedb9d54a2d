use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cover_engine::{
    BindingType, BookSpecification, CoverEngine, CoverStyle, CoverUploads, DeviceClass,
    Orientation, PanelKind, PaperType, PreparedCover, Resolution, Rgb, TrimFormat, UploadedFile,
    bleed_for, compute_dimensions, place_panels, save_pdf,
};
use std::path::{Path, PathBuf};

mod logger;

use logger::CliLogger;

#[derive(Parser)]
#[command(name = "coverctl", about = "Book cover layout and print export", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print spine width, sheet size, bleed and panel placement
    Dimensions {
        #[command(flatten)]
        spec: SpecArgs,
    },

    /// Render a preview PNG of the cover sheet
    Preview {
        #[command(flatten)]
        spec: SpecArgs,

        #[command(flatten)]
        uploads: UploadArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Leave out panel outlines and measurement labels
        #[arg(long)]
        no_guides: bool,
    },

    /// Render the print-ready PDF
    Export {
        #[command(flatten)]
        spec: SpecArgs,

        #[command(flatten)]
        uploads: UploadArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Report which sheet edges have artwork in their bleed
    BleedCheck {
        #[command(flatten)]
        spec: SpecArgs,

        #[command(flatten)]
        uploads: UploadArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Write the resolved specification to a JSON file
    InitConfig {
        #[command(flatten)]
        spec: SpecArgs,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct SpecArgs {
    /// Book specification JSON; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Binding type
    #[arg(long, value_enum)]
    binding: Option<BindingArg>,

    /// Trim format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Custom trim width in mm (implies --format custom)
    #[arg(long)]
    width_mm: Option<f64>,

    /// Custom trim height in mm (implies --format custom)
    #[arg(long)]
    height_mm: Option<f64>,

    /// Interior paper stock
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Interior page count
    #[arg(long)]
    pages: Option<u32>,

    /// Front panel scale (1.0-1.2)
    #[arg(long)]
    scale_front: Option<f64>,

    /// Back panel scale (1.0-1.2)
    #[arg(long)]
    scale_back: Option<f64>,
}

#[derive(Args)]
struct UploadArgs {
    /// One PDF with back, spine and front on pages 1, 2 and 3
    #[arg(long, conflicts_with_all = ["back", "spine", "front"])]
    combined: Option<PathBuf>,

    /// Back panel artwork (PDF or image)
    #[arg(long)]
    back: Option<PathBuf>,

    /// Spine artwork (PDF or image)
    #[arg(long)]
    spine: Option<PathBuf>,

    /// Front panel artwork (PDF or image)
    #[arg(long)]
    front: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Device class, selects raster resolution
    #[arg(long, default_value = "desktop", value_enum)]
    device: DeviceArg,

    /// Sheet background colour as #rrggbb
    #[arg(long)]
    background: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BindingArg {
    Hardcover,
    Softcover,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    A4,
    A5,
    A6,
    #[value(name = "a4-landscape")]
    A4Landscape,
    #[value(name = "a5-landscape")]
    A5Landscape,
    #[value(name = "17x24")]
    F17x24,
    #[value(name = "15.5x22")]
    F15_5x22,
    #[value(name = "21x21")]
    F21x21,
    #[value(name = "21x28")]
    F21x28,
    #[value(name = "13x19")]
    F13x19,
    Custom,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    #[value(name = "80g-recycling")]
    Recycling80,
    #[value(name = "80g-offset")]
    Offset80,
    #[value(name = "100g-offset")]
    Offset100,
    #[value(name = "120g-offset")]
    Offset120,
    #[value(name = "160g-offset")]
    Offset160,
    #[value(name = "80g-volume")]
    Volume80,
    #[value(name = "90g-volume")]
    Volume90,
    #[value(name = "100g-art-matt")]
    ArtMatt100,
    #[value(name = "100g-art-gloss")]
    ArtGloss100,
    #[value(name = "135g-art-matt")]
    ArtMatt135,
    #[value(name = "135g-art-gloss")]
    ArtGloss135,
    #[value(name = "170g-art-matt")]
    ArtMatt170,
    #[value(name = "170g-art-gloss")]
    ArtGloss170,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeviceArg {
    Desktop,
    Constrained,
}

impl From<BindingArg> for BindingType {
    fn from(arg: BindingArg) -> Self {
        match arg {
            BindingArg::Hardcover => Self::Hardcover,
            BindingArg::Softcover => Self::Softcover,
        }
    }
}

impl From<PaperArg> for PaperType {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::Recycling80 => Self::Recycling80,
            PaperArg::Offset80 => Self::Offset80,
            PaperArg::Offset100 => Self::Offset100,
            PaperArg::Offset120 => Self::Offset120,
            PaperArg::Offset160 => Self::Offset160,
            PaperArg::Volume80 => Self::Volume80,
            PaperArg::Volume90 => Self::Volume90,
            PaperArg::ArtMatt100 => Self::ArtMatt100,
            PaperArg::ArtGloss100 => Self::ArtGloss100,
            PaperArg::ArtMatt135 => Self::ArtMatt135,
            PaperArg::ArtGloss135 => Self::ArtGloss135,
            PaperArg::ArtMatt170 => Self::ArtMatt170,
            PaperArg::ArtGloss170 => Self::ArtGloss170,
        }
    }
}

impl From<DeviceArg> for DeviceClass {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Desktop => Self::Desktop,
            DeviceArg::Constrained => Self::Constrained,
        }
    }
}

impl FormatArg {
    /// Named formats map directly; custom takes its sizes from elsewhere
    fn named(self) -> Option<TrimFormat> {
        match self {
            FormatArg::A4 => Some(TrimFormat::A4),
            FormatArg::A5 => Some(TrimFormat::A5),
            FormatArg::A6 => Some(TrimFormat::A6),
            FormatArg::A4Landscape => Some(TrimFormat::A4Landscape),
            FormatArg::A5Landscape => Some(TrimFormat::A5Landscape),
            FormatArg::F17x24 => Some(TrimFormat::F17x24),
            FormatArg::F15_5x22 => Some(TrimFormat::F15_5x22),
            FormatArg::F21x21 => Some(TrimFormat::F21x21),
            FormatArg::F21x28 => Some(TrimFormat::F21x28),
            FormatArg::F13x19 => Some(TrimFormat::F13x19),
            FormatArg::Custom => None,
        }
    }
}

impl SpecArgs {
    async fn resolve(&self) -> Result<BookSpecification> {
        let mut spec = match &self.config {
            Some(path) => BookSpecification::load(path)
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => BookSpecification::default(),
        };

        if let Some(binding) = self.binding {
            spec.binding = binding.into();
        }
        if let Some(paper) = self.paper {
            spec.paper = paper.into();
        }
        if let Some(pages) = self.pages {
            spec.page_count = pages;
        }
        if let Some(scale) = self.scale_front {
            spec.scale_front = scale;
        }
        if let Some(scale) = self.scale_back {
            spec.scale_back = scale;
        }
        spec.format = self.resolve_format(spec.format);

        Ok(spec)
    }

    fn resolve_format(&self, current: TrimFormat) -> TrimFormat {
        let wants_custom = matches!(self.format, Some(FormatArg::Custom))
            || self.width_mm.is_some()
            || self.height_mm.is_some();

        if !wants_custom {
            return self.format.and_then(FormatArg::named).unwrap_or(current);
        }

        // Keep whichever custom side the config already supplied
        let (width_mm, height_mm) = match current {
            TrimFormat::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
            _ => (None, None),
        };
        TrimFormat::Custom {
            width_mm: self.width_mm.or(width_mm),
            height_mm: self.height_mm.or(height_mm),
        }
    }
}

impl UploadArgs {
    async fn load(&self) -> Result<CoverUploads> {
        if let Some(path) = &self.combined {
            return Ok(CoverUploads::combined(read_upload(path).await?));
        }

        let mut uploads = CoverUploads::default();
        for (kind, path) in [
            (PanelKind::Back, &self.back),
            (PanelKind::Spine, &self.spine),
            (PanelKind::Front, &self.front),
        ] {
            if let Some(path) = path {
                uploads = uploads.with(kind, read_upload(path).await?);
            }
        }
        Ok(uploads)
    }
}

impl RenderArgs {
    fn engine(&self) -> Result<CoverEngine> {
        let mut style = CoverStyle::default();
        if let Some(hex) = &self.background {
            style.background = Rgb::from_hex(hex)?;
        }
        Ok(CoverEngine::default().with_style(style))
    }
}

async fn read_upload(path: &Path) -> Result<UploadedFile> {
    UploadedFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn prepare(
    engine: &CoverEngine,
    spec: &SpecArgs,
    uploads: &UploadArgs,
) -> Result<PreparedCover> {
    let spec = spec.resolve().await?;
    let uploads = uploads.load().await?;

    let token = engine.begin_request();
    let prepared = engine.prepare(token, &spec, &uploads).await?;
    for failure in &prepared.failures {
        eprintln!("Warning: {}", failure.error);
    }
    Ok(prepared)
}

fn print_dimensions(spec: &BookSpecification) {
    for finding in spec.validate() {
        eprintln!("Warning: {}", finding);
    }
    if let Some(notice) = spec.format.fallback_notice() {
        eprintln!("Warning: {}", notice);
    }

    let dims = compute_dimensions(spec);
    let bleed = bleed_for(spec.binding.is_hardcover());
    let layout = place_panels(&dims, &bleed, spec.scale_front, spec.scale_back);
    let orientation = match Orientation::for_size(dims.cover_width_mm, dims.cover_height_mm) {
        Orientation::Landscape => "landscape",
        Orientation::Portrait => "portrait",
    };

    println!(
        "Book: {} {}, {} pages of {}",
        spec.binding.name(),
        spec.format.key(),
        spec.page_count,
        spec.paper.label()
    );
    println!("  Spine width: {:.2} mm", dims.spine_width_mm);
    println!(
        "  Cover sheet: {:.2} x {:.2} mm ({})",
        dims.cover_width_mm, dims.cover_height_mm, orientation
    );
    println!(
        "  Bleed: {:.1} mm left/right, {:.1} mm top/bottom",
        bleed.horizontal_mm, bleed.vertical_mm
    );
    println!("  Format price multiplier: {:.2}", spec.format.price_multiplier());
    for kind in PanelKind::ALL {
        let panel = layout.get(kind);
        println!(
            "  {:<5} x {:>7.2}  y {:>6.2}  {:>7.2} x {:>6.2} mm  (scale {:.2})",
            kind.name(),
            panel.rect.x,
            panel.rect.y,
            panel.rect.width,
            panel.rect.height,
            panel.scale
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::from_verbosity(cli.verbose).init()?;

    match cli.command {
        Commands::Dimensions { spec } => {
            print_dimensions(&spec.resolve().await?);
        }

        Commands::Preview {
            spec,
            uploads,
            render,
            output,
            no_guides,
        } => {
            let engine = render.engine()?;
            let device = render.device.into();
            let prepared = prepare(&engine, &spec, &uploads).await?;

            let surface = if no_guides {
                engine.render(&prepared, Resolution::preview(device), false)?
            } else {
                engine.render_preview(&prepared, device)?
            };
            let png = surface.encode_png()?;
            tokio::fs::write(&output, png)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Preview {}x{} px → {}",
                surface.width(),
                surface.height(),
                output.display()
            );
        }

        Commands::Export {
            spec,
            uploads,
            render,
            output,
        } => {
            let engine = render.engine()?;
            let prepared = prepare(&engine, &spec, &uploads).await?;

            let exported = engine.export_pdf(&prepared, render.device.into()).await?;
            save_pdf(&exported, &output).await?;
            println!(
                "Exported {:.1} x {:.1} mm cover → {}",
                exported.width_mm(),
                exported.height_mm(),
                output.display()
            );
        }

        Commands::BleedCheck {
            spec,
            uploads,
            render,
        } => {
            let engine = render.engine()?;
            let prepared = prepare(&engine, &spec, &uploads).await?;

            let status = engine.check_bleed(&prepared, render.device.into())?;
            if status.is_complete() {
                println!("Artwork reaches the bleed on every edge");
            } else {
                println!("Missing bleed: {}", status.missing_edges().join(", "));
            }
        }

        Commands::InitConfig { spec, output } => {
            let spec = spec.resolve().await?;
            spec.save(&output).await?;
            println!("Specification → {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("coverctl").chain(args.iter().copied())).unwrap()
    }

    fn spec_args(cli: Cli) -> SpecArgs {
        match cli.command {
            Commands::Dimensions { spec } => spec,
            _ => panic!("Expected dimensions command"),
        }
    }

    #[tokio::test]
    async fn test_flags_build_specification() {
        let cli = parse(&[
            "dimensions",
            "--binding",
            "softcover",
            "--format",
            "17x24",
            "--paper",
            "135g-art-matt",
            "--pages",
            "240",
            "--scale-front",
            "1.1",
        ]);
        let spec = spec_args(cli).resolve().await.unwrap();

        assert_eq!(spec.binding, BindingType::Softcover);
        assert_eq!(spec.format, TrimFormat::F17x24);
        assert_eq!(spec.paper, PaperType::ArtMatt135);
        assert_eq!(spec.page_count, 240);
        assert_eq!(spec.scale_front, 1.1);
        assert_eq!(spec.scale_back, 1.0);
    }

    #[tokio::test]
    async fn test_custom_sizes_imply_custom_format() {
        let cli = parse(&["dimensions", "--width-mm", "160"]);
        let spec = spec_args(cli).resolve().await.unwrap();

        assert_eq!(
            spec.format,
            TrimFormat::Custom {
                width_mm: Some(160.0),
                height_mm: None,
            }
        );
    }

    #[test]
    fn test_combined_conflicts_with_panel_uploads() {
        let result = Cli::try_parse_from([
            "coverctl",
            "bleed-check",
            "--combined",
            "cover.pdf",
            "--front",
            "front.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = parse(&["-vv", "dimensions"]);
        assert_eq!(cli.verbose, 2);
    }
}
