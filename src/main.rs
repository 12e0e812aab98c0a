use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    process,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};

use vmtrans::{config::DEFAULT_ENTRY_UNIT, loader, translate_units, Options};

/// Translate VM code into Hack assembly.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// A `.vm` file or a directory of them
    input: PathBuf,

    /// Output file (default: `<dir>/<dir>.asm` or `<stem>.asm`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a `// <command>` comment before each translated command
    #[arg(long)]
    annotate: bool,

    /// Finish the bootstrap with a call to `<entry>.init`
    #[arg(long)]
    call_entry: bool,

    /// Unit translated first
    #[arg(long, default_value = DEFAULT_ENTRY_UNIT)]
    entry: String,

    /// More logging (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli) -> Result<bool> {
    let units = loader::load(&cli.input)?;
    let output = match cli.output {
        Some(path) => path,
        None => loader::output_path(&cli.input)?,
    };

    let options = Options {
        annotate: cli.annotate,
        call_entry: cli.call_entry,
        entry_unit: cli.entry,
    };
    let translation = translate_units(&units, options);

    let file = File::create(&output)
        .with_context(|| format!("Creating {}", output.display()))?;
    let mut out = BufWriter::new(file);
    translation
        .write_to(&mut out)
        .and_then(|_| out.flush())
        .with_context(|| format!("Writing {}", output.display()))?;

    info!("Translation complete: {}", output.display());
    Ok(translation.is_clean())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Per-unit failures are logged as they happen and do not change the exit
    // status; only load and write failures do.
    match run(cli) {
        Ok(clean) => {
            if !clean {
                info!("some units were not fully translated");
            }
        }
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
