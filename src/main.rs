use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bflx::fuzz::{Fuzz, FuzzConfig};
use bflx::input::{ByteInput, Input, LineInput};
use bflx::interpreter::{EofPolicy, Interpreter, RunConfig};
use bflx::log::{self, Level};
use bflx::metrics::{distinct_bytes, high_order_entropy};
use bflx::program::disassemble;
use clap::Parser;

#[derive(Parser)]
#[command(name = "bflx", about = "BFLX interpreter: leveled byte tapes with a register bank")]
struct Cli {
    /// Program file to run.
    #[arg(required_unless_present_any = ["eval", "fuzz"])]
    file: Option<PathBuf>,

    /// Program text to run instead of a file.
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Max tokens dispatched before the run is aborted.
    #[arg(long)]
    step_limit: Option<usize>,

    /// What `?` does at end of input (fail, zero).
    /// Defaults to fail for a run and zero for --fuzz.
    #[arg(long)]
    eof: Option<EofPolicy>,

    /// Feed `?` raw stdin bytes instead of the first byte of each line.
    #[arg(long)]
    raw_input: bool,

    /// Minimum log level written to stderr (trace, debug, info, warn, error, off).
    #[arg(long, default_value = "warn")]
    log_level: Level,

    /// Print an instruction listing instead of running the program.
    #[arg(long)]
    disassemble: bool,

    /// Run N random programs and report how they end.
    #[arg(long, conflicts_with_all = ["file", "eval"])]
    fuzz: Option<usize>,

    /// Random seed for --fuzz.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Bytes per program for --fuzz.
    #[arg(long, default_value_t = 64)]
    program_size: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    log::set_level(cli.log_level);

    if let Some(programs) = cli.fuzz {
        return run_fuzz(&cli, programs);
    }

    let source = match load_source(&cli) {
        Ok(source) => source,
        Err(e) => {
            bflx::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.disassemble {
        print!("{}", disassemble(&source));
        return ExitCode::SUCCESS;
    }

    let config = RunConfig {
        step_limit: cli.step_limit,
        on_eof: cli.eof.unwrap_or(EofPolicy::Fail),
    };
    let mut interp = Interpreter::with_config(config);

    let stdin = io::stdin();
    let mut input: Box<dyn Input> = if cli.raw_input {
        Box::new(ByteInput::new(stdin.lock()))
    } else {
        Box::new(LineInput::new(stdin.lock()))
    };

    match interp.run(&source, input.as_mut()) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(&output).and_then(|_| stdout.flush()) {
                bflx::error!("writing output: {e}");
                return ExitCode::FAILURE;
            }
            bflx::info!(
                "done: {} bytes out, {} levels",
                output.len(),
                interp.level_count()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            bflx::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_source(cli: &Cli) -> io::Result<Vec<u8>> {
    match (&cli.eval, &cli.file) {
        (Some(text), _) => Ok(text.clone().into_bytes()),
        (None, Some(path)) => std::fs::read(path),
        (None, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no program given",
        )),
    }
}

fn run_fuzz(cli: &Cli, programs: usize) -> ExitCode {
    let defaults = FuzzConfig::default();
    let config = FuzzConfig {
        programs,
        program_size: cli.program_size,
        step_limit: cli.step_limit.unwrap_or(defaults.step_limit),
        on_eof: cli.eof.unwrap_or(defaults.on_eof),
    };

    let start = std::time::Instant::now();
    let report = Fuzz::new(config, cli.seed).run();
    let elapsed = start.elapsed();

    let hoe = match high_order_entropy(&report.output) {
        Ok(hoe) => hoe,
        Err(e) => {
            bflx::error!("measuring output: {e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Fuzz results:");
    eprintln!("  Programs:          {}", report.total());
    eprintln!("  Completed:         {}", report.completed);
    eprintln!("  Unbalanced:        {}", report.unbalanced);
    eprintln!("  Step limited:      {}", report.step_limited);
    eprintln!("  Input exhausted:   {}", report.input_exhausted);
    eprintln!("  Failed:            {}", report.failed);
    eprintln!("  Output bytes:      {}", report.output.len());
    eprintln!("  Distinct bytes:    {}", distinct_bytes(&report.output));
    eprintln!("  Output HOE:        {hoe:.6}");
    eprintln!("  Elapsed:           {elapsed:.2?}");
    ExitCode::SUCCESS
}
