use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xcccr::config::{ConfigFile, DEFAULT_CONFIG_FILE};
use xcccr::{compare, load};

/// xcccr: compare Xcode coverage reports and annotate regressions in CI.
#[derive(Parser, Debug)]
#[command(name = "xcccr", version, about)]
struct Cli {
    /// Path of the last report to compare the current report to.
    #[arg(long, visible_alias = "lst")]
    last: Option<PathBuf>,

    /// Path of the current report. Read from stdin when omitted or `-`.
    #[arg(long, visible_alias = "cur")]
    current: Option<PathBuf>,

    /// Percentage points to be tolerated before error. E.g. last is 70%,
    /// current is 65% and tolerance is 10 means no error.
    #[arg(long, visible_alias = "tol", value_parser = clap::value_parser!(i64).range(0..=100))]
    tolerance: Option<i64>,

    /// Project root used to make annotation paths relative (default: working dir).
    #[arg(long, visible_alias = "proj")]
    project: Option<String>,

    /// Comma separated path substrings not to warn about. Coverage is still metered.
    #[arg(long = "no-warn", visible_alias = "nw", value_delimiter = ',')]
    no_warn: Option<Vec<String>>,

    /// Regex filter applied to file paths. Replaces target and path filters.
    #[arg(long, visible_alias = "rg")]
    pattern: Option<String>,

    /// Invert every filter. Equivalent to `--select-invert prtw` and takes precedence over it.
    #[arg(short, long)]
    invert: bool,

    /// Selectively invert filters: `p` paths, `r` regex, `t` targets, `w` warn paths.
    #[arg(long = "select-invert", visible_alias = "si")]
    select_invert: Option<String>,

    /// Compute total coverage over all files, including filtered ones.
    #[arg(short = 'm', long)]
    include_masked: bool,

    /// Report covered LOC instead of percent coverage.
    #[arg(long)]
    loc: bool,

    /// Don't error on 0% coverage, produce a warning only.
    #[arg(short, long)]
    zero_warn_only: bool,

    /// Emit one annotation per function instead of one per file.
    #[arg(long)]
    lines: bool,

    /// Path to the TOML config.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    cfg: PathBuf,

    /// Log debug details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer flags over the file config. Boolean flags can only switch options on.
    fn apply(&self, mut file: ConfigFile) -> ConfigFile {
        if let Some(tolerance) = self.tolerance {
            file.tolerance = tolerance;
        }
        if let Some(ref project) = self.project {
            file.project_path = project.clone();
        }
        if let Some(ref no_warn) = self.no_warn {
            file.filter_warn_paths = no_warn.clone();
        }
        if let Some(ref pattern) = self.pattern {
            file.filter_pattern = pattern.clone();
        }
        if let Some(ref letters) = self.select_invert {
            let mut flags = file.selected_inverts();
            flags.select(letters);
            file.set_inverts(flags);
        }
        file.invert_filter |= self.invert;
        file.include_masked |= self.include_masked;
        file.meter_loc |= self.loc;
        file.zero_warn_only |= self.zero_warn_only;
        file.line_annotations |= self.lines;
        file
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let workdir = std::env::current_dir().context("Failed to determine working directory")?;

    let cfg_path = load::resolve_path(&workdir, &cli.cfg);
    let file = ConfigFile::load(&cfg_path)
        .with_context(|| format!("Failed to read config {}", cfg_path.display()))?;
    let config = cli
        .apply(file)
        .resolve(&workdir.to_string_lossy())
        .context("Invalid configuration")?;
    tracing::debug!(?config, "resolved configuration");

    let current_path = cli.current.as_deref().map(|p| {
        if p == Path::new("-") {
            p.to_path_buf()
        } else {
            load::resolve_path(&workdir, p)
        }
    });
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let current = load::read_current(current_path.as_deref(), &mut stdin.lock(), interactive)
        .context("Failed to read current report")?;
    let last_path = cli.last.as_deref().map(|p| load::resolve_path(&workdir, p));
    let last = load::read_last(last_path.as_deref()).context("Failed to read last report")?;

    let comparison = compare::compare(&config, &last, &current, &mut |annotation| {
        println!("{annotation}");
    })?;

    println!("{}", comparison.verdict);
    Ok(ExitCode::from(comparison.verdict.exit_code()))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
