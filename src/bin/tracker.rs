//! Prints the tasks and meetings of a week, and optionally syncs them with a GitHub repository
//!
//! Usage: `tracker <workbook.json> [week-offset] [--pull] [--push]`
//!
//! The repository is configured with the `TRACKER_GITHUB_*` environment variables (see [`RemoteConfig::from_env`]).
//! Set the `RUST_LOG` environment variable to display more info about the sync.

use std::path::Path;

use weekly_tracker::client::Client;
use weekly_tracker::config::RemoteConfig;
use weekly_tracker::error::{Result, TrackerError};
use weekly_tracker::local_file::LocalFile;
use weekly_tracker::Provider;
use weekly_tracker::Tracker;

struct Args {
    workbook: String,
    offset: i64,
    pull: bool,
    push: bool,
}

fn parse_args() -> Result<Args> {
    let mut workbook = None;
    let mut offset = 0;
    let mut pull = false;
    let mut push = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--pull" => pull = true,
            "--push" => push = true,
            _ if workbook.is_none() => workbook = Some(arg),
            _ => {
                offset = arg.parse()
                    .map_err(|_| TrackerError::Config(format!("Invalid week offset {:?}", arg)))?;
            },
        }
    }

    let workbook = workbook
        .ok_or_else(|| TrackerError::Config("Usage: tracker <workbook.json> [week-offset] [--pull] [--push]".to_string()))?;
    Ok(Args { workbook, offset, pull, push })
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = parse_args()?;
    let local = LocalFile::new(Path::new(&args.workbook));

    let mut tracker = Tracker::new();
    if local.path().exists() {
        local.load_into(&mut tracker)?;
    } else {
        log::warn!("{:?} does not exist yet, starting with empty tables", local.path());
    }
    tracker.set_week_offset(args.offset)
        .map_err(|err| TrackerError::Config(err.to_string()))?;

    if args.pull || args.push {
        let config = RemoteConfig::from_env()?;
        let client = Client::from_config(&config)?;
        let mut provider = Provider::new(client, &config.path, &config.branch);

        if args.pull {
            if provider.load(&mut tracker).await? == false {
                log::warn!("There is no {} in {}/{} yet", config.path, config.owner, config.repo);
            }
        }
        if args.push {
            let version = provider.save(&mut tracker).await?;
            println!("Pushed {} (version {})", config.path, version);
        }
        local.save_from(&tracker)?;
    }

    let today = chrono::Local::now().date_naive();
    weekly_tracker::utils::print_week(&tracker, today);
    Ok(())
}
