use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "noema",
    version,
    about = "Workflow state and tiered memory for cognitive agents"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        // Errors stay on stdout as one structured object; the exit status
        // carries the failure.
        output::emit_error(&err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        commands::Commands::Init(args) => commands::init::run(args),
        commands::Commands::Get(args) => commands::get::run(args),
        commands::Commands::Set(args) => commands::set::run(args),
        commands::Commands::Update(args) => commands::update::run(args),
        commands::Commands::Transition(args) => commands::transition::run(args),
        commands::Commands::Reset => commands::reset::run(),
        commands::Commands::Dump => commands::dump::run(),
        commands::Commands::Search(args) => commands::search::run(args),
        commands::Commands::Store(args) => commands::store::run(args),
        commands::Commands::Recall(args) => commands::recall::run(args),
        commands::Commands::Consolidate => commands::consolidate::run(),
        commands::Commands::Stats => commands::stats::run(),
        commands::Commands::Prune(args) => commands::prune::run(args),
        commands::Commands::Log(args) => commands::log::run(args),
        commands::Commands::Guard(cmd) => commands::guard::run(cmd),
        commands::Commands::Reflect => commands::reflect::run(),
    }
}
