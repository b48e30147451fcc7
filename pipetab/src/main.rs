use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use pipetab_core::{convert::DEFAULT_ROOT, preview_file, ConvertConfig, Converter};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(clap::Parser, Debug)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    action: PipetabAction,
}

#[derive(clap::Subcommand, Debug)]
enum PipetabAction {
    /// Convert every `.csv` file under the root into a `.tbl` file
    ///
    /// The output path is the input path with every `_table_` removed and every `csv` replaced with `tbl`.
    /// Existing outputs are overwritten. The run stops at the first file that can't be converted.
    Convert {
        /// Directory to search, recursively
        #[clap(default_value = DEFAULT_ROOT)]
        root: Utf8PathBuf,
    },
    /// List the conversions `convert` would perform, without reading or writing any file
    Plan {
        /// Directory to search, recursively
        #[clap(default_value = DEFAULT_ROOT)]
        root: Utf8PathBuf,
    },
    /// Print the converted form of a single file to stdout
    Preview {
        /// Path to the `.csv` file
        path: Utf8PathBuf,
    },
    /// Print shell completions for pipetab
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .compact()
        .init();
    let args = Args::parse();
    match args.action {
        PipetabAction::Convert { root } => {
            let converter = Converter::new(ConvertConfig::new(root));
            let report = converter.run().with_context(|| {
                format!("Converting tables under {}", converter.config().root)
            })?;
            info!("Converted {} files", report.len());
            Ok(())
        }
        PipetabAction::Plan { root } => {
            let converter = Converter::new(ConvertConfig::new(root));
            let plan = converter.plan().context("Searching for source files")?;
            for conversion in plan {
                println!("{} -> {}", conversion.input, conversion.output);
            }
            Ok(())
        }
        PipetabAction::Preview { path } => {
            let table = preview_file(&path).context("Converting table")?;
            println!("{}", table.render());
            Ok(())
        }
        PipetabAction::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Args::command(),
                "pipetab",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
