use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use flexi_logger::Logger;
use uxn_font::{build_font_tal, GlyphStore, Layout, PackOptions};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// Lookup table with offsets into variable width glyph data
    Indirect,
    /// Fixed 32 byte cells indexed by slot
    Direct,
}

impl From<LayoutArg> for Layout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Indirect => Layout::Indirect,
            LayoutArg::Direct => Layout::Direct,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Packs the glyphs a uxntal program prints into font.tal", long_about = None)]
pub struct Cli {
    #[arg(help = "uxntal program whose string literals need glyphs.", value_name = "APP.TAL")]
    program: PathBuf,

    #[arg(help = "JIS encoded BDF fonts, later fonts override earlier ones.", value_name = "FONT.BDF", required = true)]
    fonts: Vec<PathBuf>,

    #[arg(help = "Read packing options from a TOML file.", long)]
    config: Option<PathBuf>,

    #[arg(help = "Output file (default: font.tal).", short, long)]
    output: Option<PathBuf>,

    #[arg(help = "Glyph table layout.", long, value_enum)]
    layout: Option<LayoutArg>,

    #[arg(help = "Step between candidate first moduli, 1 searches exhaustively.", long, value_parser = clap::value_parser!(u16).range(1..))]
    coarseness: Option<u16>,

    #[arg(help = "Only use powers of two as second modulus.", long, default_value_t = false)]
    pow2: bool,

    #[arg(help = "Search on a single thread.", long, default_value_t = false)]
    sequential: bool,
}

impl Cli {
    fn options(&self) -> anyhow::Result<PackOptions> {
        let mut options = match &self.config {
            Some(path) => PackOptions::load(path)?,
            None => PackOptions::default(),
        };
        if let Some(output) = &self.output {
            options.output = output.clone();
        }
        if let Some(layout) = self.layout {
            options.layout = layout.into();
        }
        if let Some(coarseness) = self.coarseness {
            options.coarseness = coarseness as usize;
        }
        if self.pow2 {
            options.pow2_modulus = true;
        }
        if self.sequential {
            options.parallel = false;
        }
        Ok(options)
    }
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let options = args.options()?;
    log::debug!("{options:?}");

    let store = GlyphStore::load(&args.fonts)?;
    let source = fs::read_to_string(&args.program).with_context(|| format!("Failed to read program '{}'", args.program.display()))?;
    let font_tal = build_font_tal(&store, &source, &options)?;

    fs::write(&options.output, &font_tal.text).with_context(|| format!("Failed to write '{}'", options.output.display()))?;
    println!("Wrote {} bytes of font data to {}", font_tal.font.total_len(), options.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let _logger = match Logger::try_with_env_or_str("warn").and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
