use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "memeforge", version)]
struct Cli {
    /// Settings JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw top/bottom captions over an image.
    Meme(MemeArgs),
    /// Cut out a sticker with the magic wand and add an outline.
    Sticker(StickerArgs),
    /// Show today's remaining auto-caption credits.
    Quota(QuotaArgs),
    /// List the built-in meme templates, or print one template's URL.
    Templates(TemplatesArgs),
}

#[derive(Parser, Debug)]
struct MemeArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value = "")]
    top: String,

    #[arg(long, default_value = "")]
    bottom: String,

    /// Pick captions from the canned list (uses one daily credit).
    #[arg(long)]
    auto: bool,

    /// Caption font file, overriding settings and system discovery.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output PNG path. Defaults to the configured export name.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the caption font source and SHA-256 of its bytes.
    #[arg(long)]
    dump_font: bool,
}

#[derive(Parser, Debug)]
struct StickerArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seed pixel as `X,Y`. Repeat to erase several colors.
    #[arg(long = "seed", value_parser = parse_seed)]
    seeds: Vec<memeforge::SeedPoint>,

    #[arg(long)]
    tolerance: Option<f64>,

    /// Only erase the region connected to each seed.
    #[arg(long)]
    connected: bool,

    /// Halo width in pixels (0 disables the outline).
    #[arg(long)]
    outline: Option<u32>,

    /// Contrast adjustment in percent.
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<f32>,

    /// Integer upscale factor on export.
    #[arg(long)]
    scale: Option<u32>,

    /// Output PNG path. Defaults to the configured export name.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct QuotaArgs {
    /// Day to evaluate (YYYY-MM-DD). Defaults to the local date.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Parser, Debug)]
struct TemplatesArgs {
    /// Template name (case-insensitive).
    name: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = memeforge::ForgeSettings::load(cli.config.as_deref())?;
    match cli.cmd {
        Command::Meme(args) => cmd_meme(&settings, args),
        Command::Sticker(args) => cmd_sticker(&settings, args),
        Command::Quota(args) => cmd_quota(&settings, args),
        Command::Templates(args) => cmd_templates(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_seed(s: &str) -> Result<memeforge::SeedPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(memeforge::SeedPoint::new(x, y))
}

fn cmd_meme(settings: &memeforge::ForgeSettings, args: MemeArgs) -> anyhow::Result<()> {
    let store = memeforge::QuotaStore::new(&settings.quota_path);
    let mut session = memeforge::MemeSession::open(settings.meme.clone(), store, today())?;
    session.set_image(memeforge::load_image_file(&args.in_path)?);

    if args.auto {
        let captions = session.auto_generate(today(), &mut rand::thread_rng())?;
        eprintln!("captions: {} / {}", captions.top, captions.bottom);
        eprintln!("credits left today: {}", session.remaining());
    } else {
        session.set_captions(memeforge::CaptionPair::new(args.top, args.bottom));
    }

    let mut compositor = memeforge::Compositor::new(settings.meme.caption.clone());
    if !session.captions().is_empty() || args.dump_font {
        let font = match &args.font {
            Some(path) => memeforge::CaptionFont::from_file(path)?,
            None => settings.caption_font()?,
        };
        if args.dump_font {
            dump_font(&font);
        }
        compositor.set_font(font);
    }

    let export = session.export(&mut compositor)?;
    write_export(&export, args.out.as_deref())
}

fn cmd_sticker(settings: &memeforge::ForgeSettings, args: StickerArgs) -> anyhow::Result<()> {
    let mut sticker = settings.sticker.clone();
    if let Some(t) = args.tolerance {
        sticker.tolerance = t;
    }
    if let Some(w) = args.outline {
        sticker.outline_width = w;
    }
    if let Some(c) = args.contrast {
        sticker.contrast_pct = c;
    }
    if let Some(s) = args.scale {
        sticker.export_scale = s;
    }

    let mut session = memeforge::StickerSession::new(&sticker)?;
    if args.connected {
        session.set_mode(memeforge::EraseMode::Connected);
    }
    session.set_image(memeforge::load_image_file(&args.in_path)?);

    for seed in &args.seeds {
        let report = session.erase_at(*seed)?;
        eprintln!(
            "seed ({}, {}): rgb {:?}, erased {} px",
            seed.x, seed.y, report.target_rgb, report.erased
        );
    }

    let export = session.export()?;
    write_export(&export, args.out.as_deref())
}

fn cmd_quota(settings: &memeforge::ForgeSettings, args: QuotaArgs) -> anyhow::Result<()> {
    let date = args.date.unwrap_or_else(today);
    let store = memeforge::QuotaStore::new(&settings.quota_path);
    let state = store.peek(date, settings.meme.daily_limit)?;
    println!(
        "{}: {} of {} auto-captions left",
        state.date, state.remaining, settings.meme.daily_limit
    );
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> anyhow::Result<()> {
    use memeforge::assets::templates::{TEMPLATES, default_template, find_template};

    if let Some(name) = args.name {
        let t = find_template(&name).with_context(|| format!("unknown template '{name}'"))?;
        println!("{}", t.url);
        return Ok(());
    }
    let default = default_template();
    for t in TEMPLATES {
        let mark = if t == default { "*" } else { " " };
        println!("{mark} {:<16} {}", t.name, t.url);
    }
    Ok(())
}

fn write_export(export: &memeforge::Export, out: Option<&Path>) -> anyhow::Result<()> {
    let path = match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, &export.png)
                .with_context(|| format!("write png '{}'", path.display()))?;
            path.to_path_buf()
        }
        None => export.save_in(Path::new("."))?,
    };
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn dump_font(font: &memeforge::CaptionFont) {
    eprintln!("caption font:");
    eprintln!("  source: {}", font.source());
    eprintln!("  index:  {}", font.index());
    eprintln!("  sha256: {}", sha256_hex(font.bytes()));
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
