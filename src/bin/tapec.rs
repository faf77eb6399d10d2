//! Command-line front end.
//!
//! `tapec <input file>` compiles and runs a program on stdin/stdout,
//! `tapec -c <output file> <input file>` writes a standalone executable instead.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tapec::{compile_executable, compile_program, CompileOptions, EofPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EofArg {
    /// Leave the cell unchanged
    Unchanged,
    /// Store 0
    Zero,
    /// Store 255
    Max,
}

impl From<EofArg> for EofPolicy {
    fn from(arg: EofArg) -> Self {
        match arg {
            EofArg::Unchanged => EofPolicy::Unchanged,
            EofArg::Zero => EofPolicy::Zero,
            EofArg::Max => EofPolicy::Max,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tapec", version, about = "Run or compile tape-language programs")]
struct Cli {
    /// Compile into an executable rather than interpreting
    #[arg(short = 'c', value_name = "OUTPUT FILE")]
    output: Option<PathBuf>,

    /// What `,` stores when input is exhausted
    #[arg(long, value_enum, default_value_t = EofArg::Unchanged)]
    eof: EofArg,

    /// Program source
    #[arg(value_name = "INPUT FILE")]
    input: PathBuf,
}

fn read_source(path: &Path) -> Result<String, Box<dyn Error>> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    // Only the eight ASCII operators matter, anything else is a comment.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_executable(path: &Path, image: &[u8]) -> Result<(), Box<dyn Error>> {
    fs::write(path, image).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let source = read_source(&cli.input)?;
    let options = CompileOptions::default().with_eof(cli.eof.into());
    log::debug!("compiling {} with eof policy {}", cli.input.display(), options.eof);

    match cli.output {
        Some(output) => {
            let image = compile_executable(&source, options)?;
            write_executable(&output, &image)?;
            log::info!("wrote {} ({} bytes)", output.display(), image.len());
        }
        None => {
            let program = compile_program(&source, options)?;
            let stats = program.run()?;
            log::debug!(
                "executed {} operations, {} loop iterations",
                stats.ops_executed,
                stats.loop_iterations
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let rendered = err.render().to_string();
            print!("{rendered}");
            if !rendered.contains("Usage:") {
                println!("\n{}", Cli::command().render_usage());
            }
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
