//! Command line arguments for `lookup_voter_info`.

use clap::Parser;
use crate::config::Config;
use crate::run::{ManualAddress, RunOptions};

/// Look up Rhode Island voting districts and elected officials for members in members.json.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(long)]
    /// Street address for a one off lookup. Use with --zip and --city.
    pub address: Option<String>,
    #[clap(long)]
    /// Zip code for a one off lookup. Kept as text, so leading zeros survive.
    pub zip: Option<String>,
    #[clap(long)]
    /// City for a one off lookup.
    pub city: Option<String>,
    #[clap(long)]
    /// Look up the member with this id.
    pub id: Option<String>,
    #[clap(long)]
    /// Index of the first member to look up when --id is not given.
    pub start: Option<usize>,
    #[clap(long, action)]
    /// Carry on to the following members, pausing between lookups.
    pub recursive: bool,
    #[clap(long)]
    /// Stop recursing before this member index [default from config.toml, else 10].
    pub max: Option<usize>,
    #[clap(long, action)]
    /// Print each parsed result.
    pub log: bool,
    #[clap(long, action)]
    /// Print the members that have a usable address, and exit without looking anything up.
    pub list_valid_members: bool,
}

impl Args {
    /// Manual mode if any of the address fields are given; missing ones are left empty.
    pub fn manual_address(&self) -> Option<ManualAddress> {
        if self.address.is_none() && self.zip.is_none() && self.city.is_none() { return None; }
        Some(ManualAddress {
            address: self.address.clone().unwrap_or_default(),
            zip: self.zip.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
        })
    }

    pub fn run_options(&self,config:&Config) -> RunOptions {
        RunOptions {
            manual_address: self.manual_address(),
            id: self.id.clone(),
            start_index: self.start.unwrap_or(0),
            recursive: self.recursive,
            max_queries: self.max.unwrap_or(config.max_queries),
            log: self.log,
            list_valid_members: self.list_valid_members,
            delay: config.delay(),
        }
    }
}
