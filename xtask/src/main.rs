use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

const SIM_CONFIG: &str = "presenter.toml";
const HOOK_PATH: &str = ".git/hooks/pre-commit";

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for nes-v5")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, headless build, test)
    Ci,
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy with warnings denied
    Clippy,
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Run doc tests only
        #[arg(long)]
        doc: bool,
        /// Restrict unit tests to one library module (repeatable)
        #[arg(long, value_enum)]
        module: Vec<Module>,
    },
    /// Run benchmarks
    Bench,
    /// Run the desktop simulator
    Sim {
        /// Cartridge image to show (written into presenter.toml)
        rom_path: Option<String>,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

/// Library modules with their own unit tests
#[derive(Clone, Copy, ValueEnum)]
enum Module {
    Display,
    Input,
    Emulator,
}

impl Module {
    fn path(self) -> &'static str {
        match self {
            Module::Display => "display::",
            Module::Input => "input::",
            Module::Emulator => "emulator::",
        }
    }
}

/// A named cargo invocation
struct Step {
    name: &'static str,
    args: Vec<&'static str>,
}

impl Step {
    fn new(name: &'static str, args: &[&'static str]) -> Self {
        Self {
            name,
            args: args.to_vec(),
        }
    }

    /// Same step built with the feature set for this machine
    fn featured(name: &'static str, args: &[&'static str]) -> Self {
        let mut step = Self::new(name, args);
        step.args.insert(1, feature_flag());
        step
    }

    fn run(&self) -> Result<()> {
        cargo(&self.args)
    }
}

/// CI runners have no windowing system, so the simulator is left out there
fn feature_flag() -> &'static str {
    if std::env::var_os("CI").is_some() {
        "--no-default-features"
    } else {
        "--all-features"
    }
}

fn fmt_step(check: bool) -> Step {
    if check {
        Step::new("Format Check", &["fmt", "--all", "--", "--check"])
    } else {
        Step::new("Format", &["fmt", "--all"])
    }
}

fn clippy_step() -> Step {
    Step::featured("Clippy", &["clippy", "--all-targets", "--", "-D", "warnings"])
}

fn build_step(release: bool) -> Step {
    if release {
        Step::new("Release Build", &["build", "--release"])
    } else {
        Step::new("Build", &["build"])
    }
}

/// The library as it runs on the brain
fn headless_step() -> Step {
    Step::new("Headless Build", &["build", "--lib", "--no-default-features"])
}

fn test_step() -> Step {
    Step::featured("Test", &["test"])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => run_pipeline(
            "CI",
            &[
                fmt_step(true),
                clippy_step(),
                build_step(false),
                headless_step(),
                test_step(),
            ],
        ),
        Commands::Fmt { check } => fmt_step(check).run(),
        Commands::Clippy => clippy_step().run(),
        Commands::Build { release } => build_step(release).run(),
        Commands::Test { doc, module } => run_test(doc, &module),
        Commands::Bench => cargo(&["bench"]),
        Commands::Sim { rom_path, release } => run_sim(rom_path.as_deref(), release),
        Commands::PreCommit => run_pipeline(
            "Pre-commit",
            &[fmt_step(true), clippy_step(), test_step()],
        ),
        Commands::InstallHooks => install_hooks(),
    }
}

/// Run `steps` in order, stopping at the first failure
fn run_pipeline(title: &str, steps: &[Step]) -> Result<()> {
    println!("{}", format!("=== {} ===", title).bold().blue());
    let start = Instant::now();

    for step in steps {
        println!("{} {}", "→".blue(), step.name);
        let step_start = Instant::now();
        if let Err(e) = step.run() {
            println!("{} {} failed", "✗".red().bold(), step.name);
            return Err(e);
        }
        println!(
            "{} {} ({:.2}s)",
            "✓".green().bold(),
            step.name,
            step_start.elapsed().as_secs_f64()
        );
    }

    println!(
        "\n{} {}",
        format!("✓ {} passed in", title).green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
    Ok(())
}

fn run_test(doc: bool, modules: &[Module]) -> Result<()> {
    if doc {
        return Step::featured("Doc Test", &["test", "--doc"]).run();
    }
    if modules.is_empty() {
        return test_step().run();
    }

    let mut failed = Vec::new();
    for &module in modules {
        let path = module.path();
        println!("{} Running {} tests", "→".blue(), path.bold());
        if Step::featured("Module Test", &["test", "--lib", path])
            .run()
            .is_err()
        {
            failed.push(path);
        }
    }

    if !failed.is_empty() {
        bail!("Tests failed in {}", failed.join(", "));
    }
    Ok(())
}

fn run_sim(rom_path: Option<&str>, release: bool) -> Result<()> {
    println!("{}", "=== NES V5 Simulator ===".bold().blue());

    match rom_path {
        Some(rom_path) => {
            if !Path::new(rom_path).exists() {
                bail!("ROM file not found: {}", rom_path);
            }
            write_sim_config(rom_path)?;
            println!("{} ROM file: {}", "✓".green(), rom_path.cyan());
        }
        None if !Path::new(SIM_CONFIG).exists() => println!(
            "{} No {} and no ROM given; the presenter will look for /usd/game.nes",
            "⚠".yellow().bold(),
            SIM_CONFIG
        ),
        None => {}
    }

    let start = Instant::now();
    let mut args = vec!["run", "--bin", "nes-v5"];
    if release {
        args.push("--release");
    }
    cargo(&args).context("Simulator exited with an error")?;

    println!(
        "\n{} Simulator ran for {:.2}s",
        "✓".green().bold(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Point presenter.toml at `rom_path`, keeping any other settings
fn write_sim_config(rom_path: &str) -> Result<()> {
    let existing = fs::read_to_string(SIM_CONFIG).unwrap_or_default();
    let mut contents = format!("rom_path = {:?}\n", rom_path);
    for line in existing.lines() {
        if !line.trim_start().starts_with("rom_path") {
            contents.push_str(line);
            contents.push('\n');
        }
    }

    fs::write(SIM_CONFIG, contents).with_context(|| format!("Writing {}", SIM_CONFIG))
}

fn install_hooks() -> Result<()> {
    let hook = "#!/bin/sh\nset -e\ncargo x pre-commit\n";
    fs::write(HOOK_PATH, hook).with_context(|| format!("Writing {}", HOOK_PATH))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(HOOK_PATH, fs::Permissions::from_mode(0o755))?;
    }

    println!("{} Pre-commit hook installed at {}", "✓".green(), HOOK_PATH);
    Ok(())
}

/// Run cargo with `args`, inheriting stdio
fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("Failed to start cargo")?;

    if !status.success() {
        bail!("cargo {} failed: {}", args.join(" "), status);
    }
    Ok(())
}
