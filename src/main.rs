use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use laserplot::job::{self, JobRunner, VectorMode};
use laserplot::{
    init_logging, Config, DialectKind, Program, SvgDocument, Units, BUILD_DATE, VERSION,
};
use laserplot_camtools::{format_duration, load_pixel_grid};
use laserplot_core::units::get_unit_label;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about = "G-code for XY laser and pen plotters")]
struct Cli {
    /// Configuration file (.toml or .json); defaults to the user config
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured command dialect ("makeblock" or "grbl")
    #[arg(long, global = true)]
    dialect: Option<DialectKind>,

    /// More log output; repeat for trace level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert SVG paths to a vector program
    Svg {
        /// Input SVG files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for the .gcode files; defaults to beside each input
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// One sampled sequence per subpath, honouring power/passes attributes
        #[arg(long)]
        sampled: bool,

        /// Report path length and cutting time instead of writing programs
        #[arg(long)]
        estimate: bool,
    },
    /// Convert a bitmap to a raster program
    Image {
        file: PathBuf,

        /// Output file; defaults to the input name with a .gcode extension
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show {
        /// Print only the configuration file location
        #[arg(long)]
        path: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    if let Command::Config { action } = &cli.command {
        return run_config(action, &config_path);
    }

    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("reading configuration {}", config_path.display()))?;
    if let Some(dialect) = cli.dialect {
        config.machine.dialect = dialect;
    }
    tracing::debug!("dialect {}, {} pass(es)", config.machine.dialect, config.job.passes);

    match cli.command {
        Command::Svg {
            files,
            output,
            sampled,
            estimate,
        } => {
            if sampled {
                config.vector.sampled = true;
            }
            run_svg(&config, &files, output.as_deref(), estimate)
        }
        Command::Image { file, output } => run_image(&config, &file, output),
        Command::Config { .. } => Ok(()),
    }
}

fn run_svg(config: &Config, files: &[PathBuf], dir: Option<&Path>, estimate: bool) -> anyhow::Result<()> {
    let mut runner = JobRunner::new(config)?;
    let mode = VectorMode::from_config(config);

    if let Some(dir) = dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    for file in files {
        let doc = SvgDocument::from_file(file)?;

        if estimate {
            let time = doc.estimated_time(config.job.cutting_speed)?;
            let label = config
                .job
                .unit
                .parse::<Units>()
                .map(get_unit_label)
                .unwrap_or("units");
            println!(
                "{}: {:.1} {}, about {} per pass",
                file.display(),
                doc.total_length(),
                label,
                format_duration(time)
            );
            continue;
        }

        let program = runner
            .compile_svg(&doc, mode)
            .with_context(|| format!("compiling {}", file.display()))?;
        let out = job::output_path(dir, file)?;
        write_program(&runner, &program, &out)?;
    }

    Ok(())
}

fn run_image(config: &Config, file: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let grid = load_pixel_grid(file, &job::bitmap_options(config))?;
    let mut runner = JobRunner::new(config)?;
    let program = runner
        .compile_raster(&grid)
        .with_context(|| format!("compiling {}", file.display()))?;

    let out = match output {
        Some(out) => out,
        None => job::output_path(None, file)?,
    };
    write_program(&runner, &program, &out)
}

fn write_program(runner: &JobRunner, program: &Program, out: &Path) -> anyhow::Result<()> {
    let stamp = runner.compiler().interface().comment(&format!(
        "laserplot {} ({}) {}",
        VERSION,
        BUILD_DATE,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    let content = format!("{}\n{}", stamp, program);
    fs::write(out, content).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!("Wrote {} lines to {}", program.len(), out.display());
    Ok(())
}

fn run_config(action: &ConfigAction, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to replace it)", path.display());
            }
            Config::default().save_to_file(path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigAction::Show { path: only_path } => {
            if *only_path {
                println!("{}", path.display());
            } else {
                let config = Config::load_or_default(path)?;
                print!("{}", config.to_toml_string()?);
            }
        }
    }
    Ok(())
}
