mod shell;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = shell::config::Args::parse();
    spend_logging::initialize(args.log.into(), args.log_level);
    shell::app::run_app(args.into_config())
}
