use clap::Parser;
use otel_targetallocator::{cli, logging};
use snafu::{ResultExt, Snafu};

const APP_NAME: &str = "otel-targetallocator";
const LOG_ENV: &str = "OTEL_TARGETALLOCATOR_LOG";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to initialize logging"))]
    InitializeLogging { source: logging::Error },

    #[snafu(transparent)]
    Command { source: cli::Error },
}

#[derive(clap::Parser)]
#[command(name = APP_NAME, author, version, about)]
struct Opts {
    #[clap(subcommand)]
    command: cli::Command,
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let opts = Opts::parse();
    logging::initialize_logging(LOG_ENV, APP_NAME).context(InitializeLoggingSnafu)?;

    opts.command.run(std::io::stdout().lock())?;
    Ok(())
}
