use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagver::config::{self, Backend, Config};
use tagver::description::{self, DescriptionSource};
use tagver::git::{Git2Repository, GitCli, Repository};
use tagver::metadata;
use tagver::resolver::{CiOverrides, VersionResolver};
use tagver::test_command::{test_command, RunnerKind, RunnerOptions, TEST_COMMAND};
use tagver::ui;
use tagver::warning::Warning;

#[derive(Parser)]
#[command(
    name = "tagver",
    version,
    about = "Derive package versions from git tags and run a project's test suite"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        help = "Project directory"
    )]
    directory: PathBuf,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More diagnostic output (repeatable)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version derived from git tags
    Version {
        #[arg(long, value_enum, help = "How to query git")]
        backend: Option<Backend>,
    },
    /// Print the value assigned to __version__ in a source file
    FindVersion { file: PathBuf },
    /// Print the project's README, or a fallback when there is none
    Describe {
        #[arg(long, help = "Text to print when no README exists")]
        fallback: Option<String>,
    },
    /// Run the test suite with the selected runner
    Test(TestArgs),
    /// Print version, description and test command as TOML
    Metadata {
        #[arg(long, value_enum, help = "How to query git")]
        backend: Option<Backend>,

        #[command(flatten)]
        runner: RunnerArgs,
    },
}

#[derive(Args)]
struct TestArgs {
    #[command(flatten)]
    runner: RunnerArgs,

    #[arg(long, help = "Python interpreter used to launch the runner")]
    python: Option<String>,

    #[arg(long, help = "Print the runner command without running it")]
    dry_run: bool,
}

/// Runner selection and options shared by `test` and `metadata`
#[derive(Args)]
struct RunnerArgs {
    #[arg(long, help = "Use nose instead of the configured runner")]
    nose: bool,

    #[arg(long, help = "Use unittest instead of the configured runner")]
    unittest: bool,

    #[arg(long, help = "Turn off verbose runner output")]
    no_verbose: bool,

    #[arg(long, help = "Keep going after the first failure (pytest)")]
    no_exit_first: bool,

    #[arg(long, help = "Drop into pdb on failure (pytest)")]
    pdb: bool,

    #[arg(long, help = "Skip the expected-failure report (pytest)")]
    no_extra_fails: bool,

    #[arg(long, help = "Skip detailed failure output (nose)")]
    no_detailed: bool,

    #[arg(long, value_name = "MODULE", help = "Report coverage for a module")]
    cover: Option<String>,

    #[arg(long, value_name = "DIR", help = "Directory holding the tests")]
    test_dir: Option<String>,
}

impl RunnerArgs {
    fn runner(&self, config: &Config) -> RunnerKind {
        if self.nose || self.unittest {
            RunnerKind::select(self.nose, self.unittest)
        } else {
            config.test.runner
        }
    }

    /// Options given on the command line; the runner must recognise all of them
    fn options(&self) -> RunnerOptions {
        RunnerOptions {
            verbose: self.no_verbose.then_some(false),
            exit_first: self.no_exit_first.then_some(false),
            pdb: self.pdb.then_some(true),
            extra_fails: self.no_extra_fails.then_some(false),
            detailed: self.no_detailed.then_some(false),
            cover: self.cover.clone(),
            test_dir: self.test_dir.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tagver={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Runs the selected command, returning the process exit code
fn run(cli: &Cli) -> Result<i32> {
    let dir = cli.directory.as_path();
    let config = config::load_config(cli.config.as_deref(), dir)
        .context("Error loading config")?;

    match &cli.command {
        Commands::Version { backend } => {
            let repo = open_repository(backend.unwrap_or(config.version.backend), dir)?;
            let ci = CiOverrides::from_env(&config.ci);
            let resolved = VersionResolver::new(repo, config.version.clone()).resolve(&ci)?;
            ui::display_warnings(&resolved.warnings);
            println!("{}", resolved);
            Ok(0)
        }
        Commands::FindVersion { file } => {
            let path = dir.join(file);
            let version = description::find_version(&path)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            println!("{}", version);
            Ok(0)
        }
        Commands::Describe { fallback } => {
            let fallback = fallback.as_deref().unwrap_or(&config.package.description);
            let description = description::long_description(dir, fallback)?;
            if description.source == DescriptionSource::Fallback {
                ui::display_warning(&Warning::MissingReadme);
            }
            println!("{}", description.text);
            Ok(0)
        }
        Commands::Test(args) => run_tests(args, &config, dir),
        Commands::Metadata { backend, runner } => {
            let repo = open_repository(backend.unwrap_or(config.version.backend), dir)?;
            let ci = CiOverrides::from_env(&config.ci);

            let mut config = config.clone();
            config.test.runner = runner.runner(&config);

            let (metadata, warnings) =
                metadata::collect(repo, dir, &config, &ci, &runner.options())?;
            ui::display_warnings(&warnings);
            print!("{}", metadata.to_toml()?);
            Ok(0)
        }
    }
}

fn run_tests(args: &TestArgs, config: &Config, dir: &Path) -> Result<i32> {
    let runner = args.runner.runner(config);
    let options = config
        .test
        .options
        .retain_recognised(runner)
        .merge(&args.runner.options());
    let python = args.python.as_deref().unwrap_or(&config.test.python);

    let mut commands = test_command(runner, &options)?;
    let command = commands
        .remove(TEST_COMMAND)
        .context("No test command was built")?;

    let invocation = command.invocation(python, dir);
    if args.dry_run {
        println!("{}", invocation);
        return Ok(0);
    }

    ui::display_status(&format!("Running {}", invocation));
    let code = command
        .run(python, dir)
        .with_context(|| format!("Failed to launch {}", invocation.program))?;
    Ok(code)
}

fn open_repository(backend: Backend, dir: &Path) -> Result<Box<dyn Repository>> {
    Ok(match backend {
        Backend::Git => Box::new(GitCli::new(dir)),
        Backend::Libgit2 => Box::new(
            Git2Repository::open(dir)
                .with_context(|| format!("Not in a git repository: {}", dir.display()))?,
        ),
    })
}
