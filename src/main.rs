use cedict_site::config::{self, INPUT_FILE, Mode, WORKER_SLOTS};
use cedict_site::{generate, output};
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(name = "cedict-site")]
#[command(version)]
#[command(about = "Static site generator for dictionary datasets")]
#[command(long_about = "\
Static site generator for dictionary datasets

Reads cedict.json from the working directory: a JSON array of entries with
simplified, traditional, pinyin and definitions fields. Writes one page per
entry, named after its simplified form, plus index.html linking them all.

  cedict.json                      # Dataset (required)
  site.toml                        # Presentation settings (optional)
  build/                           # Output of `cedict-site build`
  docs/                            # Output of `cedict-site publish`

Existing .html files in the output directory are deleted before each run.

Run 'cedict-site gen-config' to generate a documented site.toml.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site into build/
    Build,
    /// Generate the site into docs/ for publishing
    Publish,
    /// Validate the dataset without writing anything
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build => build(Mode::Build)?,
        Command::Publish => build(Mode::Publish)?,
        Command::Check => {
            let input = Path::new(INPUT_FILE);
            println!("==> Checking {}", input.display());
            let (total, skipped) = generate::check(input)?;
            output::print_check_output(input, total, &skipped);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run a full build for `mode`.
///
/// Pages that fail to write do not stop the build, but they turn the exit
/// status into a failure once the summary has been printed.
fn build(mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let site_config = config::load_config(Path::new("."))?;
    let output_dir = mode.output_dir();

    println!("==> Generating {} \u{2192} {}", INPUT_FILE, output_dir.display());
    let report = generate::generate(
        Path::new(INPUT_FILE),
        &output_dir,
        &site_config,
        WORKER_SLOTS,
        std::io::stdout(),
    )?;
    output::print_generate_output(&report);

    if !report.is_complete() {
        return Err(format!("{} pages could not be written", report.failures.len()).into());
    }
    Ok(())
}
