use clap::Parser;
use log::{error, info};

use fuelcheck::check::{self, CheckReport};
use fuelcheck::cli::{CheckArgs, Cli, Command, GlobalArgs, ShowArgs};
use fuelcheck::config::Config;
use fuelcheck::report;
use fuelcheck::store::SnapshotStore;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn check_once(global: &GlobalArgs, args: &CheckArgs) -> fuelcheck::Result<CheckReport> {
    let config = Config::load(global, args)?;
    let notifier = config.notifier();
    let store = SnapshotStore::new(&config.state_path);

    check::run(&config.scraper, &store, &notifier, config.always_notify)
}

fn run_check(global: &GlobalArgs, args: &CheckArgs) -> i32 {
    match check_once(global, args) {
        Ok(report) => {
            info!(
                "check complete: {} ({} stations, mail {})",
                report.mode.as_str(),
                report.stations,
                if report.notified { "sent" } else { "not sent" }
            );
            0
        }
        Err(e) => {
            error!("check failed: {e}");
            i32::from(args.strict)
        }
    }
}

fn run_show(global: &GlobalArgs, args: &ShowArgs) -> i32 {
    let config = match Config::load(global, &CheckArgs::default()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return 1;
        }
    };

    match SnapshotStore::new(&config.state_path).load() {
        Ok(snapshot) => {
            report::print(snapshot.as_ref(), args.json);
            0
        }
        Err(e) => {
            error!("error loading snapshot: {e}");
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let code = match cli.command {
        Some(Command::Check(args)) => run_check(&cli.global, &args),
        Some(Command::Show(args)) => run_show(&cli.global, &args),
        None => run_check(&cli.global, &CheckArgs::default()),
    };

    std::process::exit(code);
}
