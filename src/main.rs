//! GEMpRF Configuration Generator - build GEMpRF XML analysis configurations
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use gemprf_configgen::commands::{self, FormInput, GenerateTarget};

/// GEMpRF Configuration Generator - build GEMpRF XML analysis configurations
#[derive(Parser, Debug)]
#[command(name = "gemprf-config")]
#[command(about = "Generate GEMpRF XML analysis configurations", long_about = None)]
struct Args {
    /// Project directory holding .gemprf/config.toml
    #[arg(long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Form values shared by every command that builds the form
#[derive(clap::Args, Debug, Clone, Default)]
struct FormArgs {
    /// Preset file (TOML) applied before any --set
    #[arg(long, value_name = "FILE")]
    preset: Option<PathBuf>,

    /// Set a field, e.g. --set stim_dir=/data/stimuli (repeatable)
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,
}

impl From<FormArgs> for FormInput {
    fn from(args: FormArgs) -> Self {
        FormInput {
            preset: args.preset,
            assignments: args.set,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the form and write the XML document
    Generate {
        #[command(flatten)]
        form: FormArgs,

        /// Directory to save into (default: export.output_dir from settings)
        #[arg(long, value_name = "DIR", conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the document instead of saving it
        #[arg(long)]
        stdout: bool,

        /// Also copy the document to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Print the validation status of every path field
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Print the filename the document would be saved under
    Filename {
        #[command(flatten)]
        form: FormArgs,
    },

    /// List every field with its kind, default and help text
    Fields,

    /// Write a default .gemprf/config.toml
    Init,

    /// Interactive session: JSON commands on stdin, JSON events on stdout
    Headless {
        #[command(flatten)]
        form: FormArgs,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    gemprf_core::logging::init()?;

    let args = Args::parse();

    let project = args
        .project
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match args.command {
        Command::Generate {
            form,
            output,
            stdout,
            copy,
        } => {
            let target = if stdout {
                GenerateTarget::Stdout
            } else {
                GenerateTarget::Download(output)
            };
            commands::run_generate(&project, &form.into(), target, copy)?;
        }
        Command::Validate { form } => commands::run_validate(&project, &form.into())?,
        Command::Filename { form } => commands::run_filename(&project, &form.into())?,
        Command::Fields => commands::run_fields(),
        Command::Init => commands::run_init(&project)?,
        Command::Headless { form } => {
            gemprf_configgen::run_headless(&project, &form.into()).await?
        }
    }

    Ok(())
}
