use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "weekslate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a schedule file to a PNG at its export size.
    Export(ExportArgs),
    /// Render a schedule file and place the PNG on the system clipboard.
    Copy(CopyArgs),
    /// Check that a schedule file parses and validates.
    Validate(ValidateArgs),
    /// Run a schedule file through normalization.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input .schedule file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path. Defaults to the suggested name next to the input.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CopyArgs {
    /// Input .schedule file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input .schedule file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Input .schedule file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Rewrite the file in place instead of printing to stdout.
    #[arg(long)]
    write: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Copy(args) => cmd_copy(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn base_dir(in_path: &Path) -> &Path {
    in_path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let doc = weekslate::persist::load_schedule_file(&args.in_path)
        .with_context(|| format!("load schedule '{}'", args.in_path.display()))?;

    let out = args.out.unwrap_or_else(|| {
        base_dir(&args.in_path).join(weekslate::export_file_name(&doc))
    });
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let session = weekslate::SessionThumbs::new();
    weekslate::Exporter::new().export_to_file(
        &doc,
        &session,
        Some(base_dir(&args.in_path)),
        &out,
    )?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_copy(args: CopyArgs) -> anyhow::Result<()> {
    let doc = weekslate::persist::load_schedule_file(&args.in_path)
        .with_context(|| format!("load schedule '{}'", args.in_path.display()))?;

    let session = weekslate::SessionThumbs::new();
    let mut clipboard = weekslate::CommandClipboard;
    weekslate::Exporter::new().copy_to_clipboard(
        &doc,
        &session,
        Some(base_dir(&args.in_path)),
        &mut clipboard,
    )?;

    eprintln!("copied PNG to clipboard");
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let doc: weekslate::ScheduleDocument =
        serde_json::from_str(&json).context("parse schedule JSON")?;
    doc.validate()?;

    eprintln!(
        "ok: '{}', {} day(s)",
        doc.schedule_name,
        doc.days.len()
    );
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let doc = weekslate::persist::load_schedule_file(&args.in_path)
        .with_context(|| format!("load schedule '{}'", args.in_path.display()))?;

    if args.write {
        weekslate::persist::save_schedule_file(&doc, &args.in_path)?;
        eprintln!("rewrote {}", args.in_path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    Ok(())
}
