use clap::Parser;
use shell_permit::cli::{self, Cli};
use shell_permit::logging;

// One legitimate exit() site: the process exit code carries the
// verdict (0/1/2), which `main`'s own return value can't express
// without wrapping every caller in `std::process::ExitCode`.
#[allow(clippy::exit)]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let code = cli::run(cli)?;
    std::process::exit(code);
}
