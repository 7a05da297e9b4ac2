use anyhow::Context;
use clap::{Parser, ValueEnum};
use fatimg_core::{
    read_inputs, BuildOptions, BuildPlan, BuildReport, FormatterRegistry, ImageBuilder, MIB,
};
use fatimg_formatters::{register_builtin_formatters, resolve_formatter, FatfsWriter};
use log::debug;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fatimg")]
#[command(about = "Build a FAT12/FAT16 image holding the given files", long_about = None)]
#[command(version)]
struct Cli {
    /// Image file to create (replaced if it exists)
    output: PathBuf,

    /// Files to copy into the image root, in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Volume label
    #[arg(short = 'n', long, default_value = fatimg_core::options::DEFAULT_LABEL)]
    label: String,

    /// How to create the empty volume
    #[arg(long, value_enum, default_value_t = FormatterChoice::Mkfs)]
    formatter: FormatterChoice,

    /// mkfs program used by the mkfs formatter
    #[arg(long, default_value = fatimg_formatters::mkfs_vfat::DEFAULT_PROGRAM)]
    mkfs_program: PathBuf,

    /// Read every file back after writing and compare
    #[arg(long)]
    verify: bool,

    /// Print the sizing decision and file layout without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatterChoice {
    /// dosfstools' mkfs.vfat
    Mkfs,
    /// Built-in formatter, no external tools
    Native,
    /// mkfs when installed, native otherwise
    Auto,
}

impl FormatterChoice {
    fn registry_name(self) -> &'static str {
        match self {
            FormatterChoice::Mkfs => fatimg_formatters::MKFS,
            FormatterChoice::Native => fatimg_formatters::NATIVE,
            FormatterChoice::Auto => fatimg_formatters::AUTO,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}

fn print_plan(plan: &BuildPlan) {
    let sizing = &plan.sizing;
    println!("Filesystem: {} (label {})", sizing.variant, plan.label);
    println!(
        "Total input size: {} bytes ({:.2} MB)",
        sizing.total_input_bytes,
        mb(sizing.total_input_bytes)
    );
    println!(
        "Filesystem size: {} bytes ({:.2} MB)",
        sizing.size_bytes(),
        mb(sizing.size_bytes())
    );
    println!("Formatter: {} (writer: {})", plan.formatter, plan.writer);
    if !plan.required_tools.is_empty() {
        println!("  Required tools: {:?}", plan.required_tools);
    }
    println!("Files:");
    for entry in &plan.entries {
        println!("  {} -> {} ({} bytes)", entry.source_name, entry.short_name, entry.size);
    }
    if !plan.warnings.is_empty() {
        println!("Warnings:");
        for warning in &plan.warnings {
            println!("  - {}", warning);
        }
    }
}

fn print_report(report: &BuildReport) {
    print_plan(&report.plan);
    println!();
    println!("Filesystem created successfully");
    println!("  Files: {}", report.plan.entries.len());
    println!("  Output: {}", report.output.display());
    if report.verified {
        println!("  Verified: all files read back intact");
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let inputs = read_inputs(&cli.inputs)?;

    let mut registry = FormatterRegistry::new();
    register_builtin_formatters(&mut registry, &cli.mkfs_program);
    let formatter = resolve_formatter(&registry, cli.formatter.registry_name())?;
    debug!(
        "Using formatter {} (usable here: {})",
        formatter.name(),
        registry.available().join(", ")
    );

    let options = BuildOptions {
        label: cli.label.clone(),
        verify_after_build: cli.verify,
    };
    let builder = ImageBuilder::new(formatter.as_ref(), &FatfsWriter, options);

    if cli.dry_run {
        let plan = builder.plan(&inputs)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print_plan(&plan);
        }
        return Ok(());
    }

    let report = builder
        .build(&cli.output, &inputs)
        .with_context(|| format!("Error creating filesystem {}", cli.output.display()))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn main() -> ExitCode {
    // Usage errors exit 1 like every other failure; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
