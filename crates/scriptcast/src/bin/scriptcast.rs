//! Generate scripted asciinema recordings.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use scriptcast::{AsciiCast, Script, ScriptFormat, ScriptRunner, marker_md_list};

#[derive(Debug, Parser)]
#[command(
    name = "scriptcast",
    version,
    about = "Generate scripted asciinema recordings"
)]
struct Cli {
    /// The scripted session to record
    script_file: PathBuf,

    /// Don't run the script
    #[arg(short = 'd', long)]
    dont_run: bool,

    /// Don't print script progress
    #[arg(short, long)]
    quiet: bool,

    /// Print markers as a Markdown list
    #[arg(short = 'm', long)]
    print_markers: bool,

    /// HTML element ID for the video element
    #[arg(long)]
    data_id: Option<String>,

    /// Script format, if it cannot be detected from the file extension
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Toml,
    Json,
    Yaml,
}

impl From<FormatArg> for ScriptFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Toml => Self::Toml,
            FormatArg::Json => Self::Json,
            FormatArg::Yaml => Self::Yaml,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> scriptcast::Result<()> {
    let script = match cli.format {
        Some(format) => Script::load_as(&cli.script_file, format.into())?,
        None => Script::load(&cli.script_file)?,
    };

    if !cli.dont_run {
        ScriptRunner::new().quiet(cli.quiet).run(&script)?;
    }

    if cli.print_markers {
        // The output file location is resolved with respect to the script
        // directory.
        let output_file = cli
            .script_file
            .parent()
            .map_or_else(|| script.output_file.clone(), |dir| dir.join(&script.output_file));
        let cast = AsciiCast::load(output_file)?;
        print!("{}", marker_md_list(&cast.events, cli.data_id.as_deref()));
    }

    Ok(())
}
