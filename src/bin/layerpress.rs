use std::path::PathBuf;

use anyhow::Context as _;
use base64::Engine as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use layerpress::{
    AssetRef, AssetSet, ConfiguredFontResolver, DefaultAssetResolver, FilterFailurePolicy,
    FontResolver, Pipeline, PipelineOpts, PrepareThreading, RenderJob, ScaleContext, ScaleInput,
};

#[derive(Parser, Debug)]
#[command(name = "layerpress", version, about = "Composite image and text layers into a PNG")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a job and write the PNG.
    Render(RenderArgs),
    /// Print each layer's device geometry as JSON without drawing.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Layer list: base64-encoded JSON array, or the JSON array itself.
    layers: String,
    /// Logo asset path or URL; `-` skips logo layers.
    logo: String,
    /// Name asset path or URL; `-` skips name layers.
    name: String,
    /// Background asset path or URL; `-` skips background layers.
    background: String,
    /// Scale record: `{"cwidth":..,"cheight":..,"small_w":..,"small_h":..}`.
    ratio_json: String,

    /// Directory relative asset paths are resolved against.
    #[arg(long, env = "LAYERPRESS_ASSETS_ROOT", default_value = ".")]
    assets_root: PathBuf,
}

#[derive(Parser, Debug)]
struct FontArgs {
    /// Font config JSON; the last entry with a truthy `web_font` is used.
    #[arg(long, env = "LAYERPRESS_FONT_CONFIG")]
    font_config: Option<PathBuf>,
    /// Directory font config `file` entries live in.
    #[arg(long, env = "LAYERPRESS_FONTS_DIR", default_value = "fonts")]
    fonts_dir: PathBuf,
    /// Font file used when the config yields nothing.
    #[arg(long, env = "LAYERPRESS_FONT")]
    font: Option<PathBuf>,
    /// Text size in pixels.
    #[arg(long, default_value_t = layerpress::DEFAULT_FONT_SIZE_PX)]
    font_size: f32,
    /// Never fall back to installed system fonts.
    #[arg(long, default_value_t = false)]
    no_system_fonts: bool,
}

impl FontArgs {
    fn resolver(&self) -> ConfiguredFontResolver {
        ConfiguredFontResolver {
            config_path: self.font_config.clone(),
            fonts_dir: self.fonts_dir.clone(),
            font_path: self.font.clone(),
            size_px: self.font_size,
            system_fallback: !self.no_system_fonts,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnFilterError {
    /// Fail the run.
    Abort,
    /// Draw the unfiltered source.
    Source,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,
    #[command(flatten)]
    font: FontArgs,

    /// Output PNG path; defaults to a content-derived name inside `--out-dir`.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Directory for content-named outputs.
    #[arg(long, env = "LAYERPRESS_OUTPUT_DIR", default_value = "result")]
    out_dir: PathBuf,

    /// Prepare image layers in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
    /// What to do when a color filter fails.
    #[arg(long, value_enum, default_value_t = OnFilterError::Abort)]
    on_filter_error: OnFilterError,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    job: JobArgs,
    #[command(flatten)]
    font: FontArgs,

    /// Also resolve the font and report its source and SHA-256.
    #[arg(long, default_value_t = false)]
    font_digest: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let job = build_job(&args.job)?;
    let opts = PipelineOpts {
        filter_failure: match args.on_filter_error {
            OnFilterError::Abort => FilterFailurePolicy::Abort,
            OnFilterError::Source => FilterFailurePolicy::UseSource,
        },
        threading: PrepareThreading {
            parallel: args.parallel,
            threads: args.threads,
        },
    };
    let assets = DefaultAssetResolver::new(&args.job.assets_root)?;
    let pipeline = Pipeline::new(assets, args.font.resolver(), opts);

    let out = match args.out {
        Some(p) => p,
        None => layerpress::default_output_path(&args.out_dir, &job)?,
    };
    let stats = pipeline
        .render_to_png(&job, &out)
        .with_context(|| format!("render '{}'", out.display()))?;

    tracing::info!(?stats, "done");
    println!("{}", out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let job = build_job(&args.job)?;
    let scale = ScaleContext::from_input(&job.scale)?;
    let resolver = args.font.resolver();

    let assets = DefaultAssetResolver::new(&args.job.assets_root)?;
    let pipeline = Pipeline::new(assets, resolver.clone(), PipelineOpts::default());
    let layers = pipeline.inspect(&job)?;

    let mut report = serde_json::json!({
        "scale": scale,
        "layers": layers,
    });
    if args.font_digest {
        let font = resolver.resolve().context("resolve font")?;
        report["font"] = serde_json::json!({
            "source": font.source(),
            "index": font.index(),
            "size_px": font.size_px(),
            "sha256": font.sha256_hex(),
        });
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize inspect report")?
    );
    Ok(())
}

fn build_job(args: &JobArgs) -> anyhow::Result<RenderJob> {
    let layers_json = decode_layers_payload(&args.layers)?;
    let layers = layerpress::parse_layers(&layers_json).context("parse layer list")?;
    let scale: ScaleInput =
        serde_json::from_str(&args.ratio_json).context("parse scale (ratio) JSON")?;

    Ok(RenderJob {
        scale,
        assets: AssetSet {
            logo: AssetRef::parse(&args.logo),
            name: AssetRef::parse(&args.name),
            background: AssetRef::parse(&args.background),
        },
        layers,
    })
}

/// Accept either a raw JSON array or its base64 encoding.
fn decode_layers_payload(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return Ok(trimmed.to_owned());
    }
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| layerpress::PressError::serde(format!("layer payload is not base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| layerpress::PressError::serde(format!("layer payload is not UTF-8: {e}")))
        .map_err(Into::into)
}
