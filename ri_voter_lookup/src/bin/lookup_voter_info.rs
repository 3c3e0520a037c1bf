use std::path::Path;
use clap::Parser;
use ri_voter_lookup::cli::Args;
use ri_voter_lookup::config::{Config, CONFIG_FILE_NAME};
use ri_voter_lookup::fetch::HttpFetcher;
use ri_voter_lookup::logger;
use ri_voter_lookup::member::{load_valid_members, MEMBERS_FILE};
use ri_voter_lookup::run::{Runner, TokioPause};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();
    let config = Config::load(Path::new(CONFIG_FILE_NAME))?;
    let members = match load_valid_members(Path::new(MEMBERS_FILE)) {
        Ok(members) => members,
        Err(e) => {
            log::error!("{:#}",e);
            return Err(e);
        }
    };
    let fetcher = HttpFetcher::new(&config)?;
    Runner::new(&fetcher,&TokioPause,args.run_options(&config)).run(&members).await?;
    Ok(())
}
