//! The lookup loop: pick members, build a request, fetch and parse the page, report.

use std::time::Duration;
use crate::fetch::PageFetcher;
use crate::lookup_request::{LookupRequest, LookupRequestError};
use crate::member::Member;
use crate::parse_lookup::{parse_lookup_html, LookupResult};

/// Waiting between lookups in recursive mode.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&self,duration:Duration);
}

/// Waits on the tokio timer, so the process stays responsive while waiting.
pub struct TokioPause;

impl Pause for TokioPause {
    async fn pause(&self,duration:Duration) {
        tokio::time::sleep(duration).await
    }
}

/// A manual address from the command line. Fields not given are empty.
#[derive(Debug,Clone,Default,Eq,PartialEq)]
pub struct ManualAddress {
    pub address : String,
    pub zip : String,
    pub city : String,
}

#[derive(Debug,Clone,Eq,PartialEq)]
pub struct RunOptions {
    pub manual_address : Option<ManualAddress>,
    /// Select the first member with this id.
    pub id : Option<String>,
    /// Starting index if no id is given.
    pub start_index : usize,
    pub recursive : bool,
    /// Exclusive bound on the index reached in recursive mode.
    pub max_queries : usize,
    /// Print each parsed result.
    pub log : bool,
    pub list_valid_members : bool,
    pub delay : Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            manual_address: None,
            id: None,
            start_index: 0,
            recursive: false,
            max_queries: 10,
            log: false,
            list_valid_members: false,
            delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug,Clone,PartialEq)]
pub enum LookupOutcome {
    Found(LookupResult),
    /// Not enough address to ask. No request was made.
    NoData,
    /// The request failed; the message is the error.
    Failed(String),
}

/// One lookup, whether or not a request was actually made.
#[derive(Debug,Clone,PartialEq)]
pub struct Attempt {
    /// Index into the member list, or None for a manual address.
    pub member_index : Option<usize>,
    pub request : LookupRequest,
    pub outcome : LookupOutcome,
}

impl Attempt {
    pub fn fetched(&self) -> bool { self.outcome!=LookupOutcome::NoData }
}

#[derive(Debug,Clone,PartialEq)]
pub enum RunReport {
    /// `--list-valid-members`; these were printed.
    MemberList(Vec<Member>),
    Lookups(Vec<Attempt>),
    /// `--id` matched nobody.
    MemberNotFound(String),
}

pub struct Runner<'a,F,P> {
    fetcher : &'a F,
    pause : &'a P,
    options : RunOptions,
}

impl <'a,F:PageFetcher,P:Pause> Runner<'a,F,P> {
    pub fn new(fetcher:&'a F,pause:&'a P,options:RunOptions) -> Self {
        Runner { fetcher, pause, options }
    }

    /// Run over the (already filtered) members according to the options.
    pub async fn run(&self,members:&[Member]) -> anyhow::Result<RunReport> {
        if self.options.list_valid_members {
            println!("{}",serde_json::to_string_pretty(members)?);
            return Ok(RunReport::MemberList(members.to_vec()));
        }
        if let Some(manual) = &self.options.manual_address {
            let request = LookupRequest::manual(&manual.address,&manual.zip,&manual.city);
            let attempt = self.look_up(None,request).await?;
            return Ok(RunReport::Lookups(vec![attempt]));
        }
        let Some(mut index) = self.starting_index(members) else {
            let id = self.options.id.clone().unwrap_or_default();
            log::error!("No valid member has id {}",id);
            return Ok(RunReport::MemberNotFound(id));
        };
        let mut attempts = Vec::new();
        if index>=members.len() {
            log::warn!("Nothing to look up: starting index {} but only {} valid members",index,members.len());
            return Ok(RunReport::Lookups(attempts));
        }
        loop {
            attempts.push(self.look_up(Some(index),LookupRequest::from_member(&members[index])).await?);
            let next = index+1;
            if !(self.options.recursive && next<self.options.max_queries && next<members.len()) { break; }
            log::info!("Waiting {} seconds before the next lookup",self.options.delay.as_secs_f32());
            self.pause.pause(self.options.delay).await;
            index=next;
        }
        Ok(RunReport::Lookups(attempts))
    }

    /// None if an id was asked for but is not present.
    fn starting_index(&self,members:&[Member]) -> Option<usize> {
        match &self.options.id {
            Some(id) => members.iter().position(|m|&m.id==id),
            None => Some(self.options.start_index),
        }
    }

    /// Fetch and parse one page. Failures of this lookup are logged and recorded, not propagated.
    async fn look_up(&self,member_index:Option<usize>,request:LookupRequest) -> anyhow::Result<Attempt> {
        let url = match request.lookup_url() {
            Ok(url) => url,
            Err(LookupRequestError::NoData) => {
                log::warn!("No data.");
                return Ok(Attempt { member_index, request, outcome: LookupOutcome::NoData });
            }
            Err(e) => return Err(e.into()),
        };
        log::info!("Requesting data for {}...",request.describe());
        let outcome = match self.fetcher.fetch_page(&url).await {
            Ok(page) => {
                let result = parse_lookup_html(&page);
                if result.is_empty() { log::warn!("No district or official information found for {}",request.describe()); }
                if self.options.log {
                    println!("{}",serde_json::to_string_pretty(&result)?);
                }
                LookupOutcome::Found(result)
            }
            Err(e) => {
                log::error!("Request for {} failed: {:#}",request.describe(),e);
                LookupOutcome::Failed(format!("{:#}",e))
            }
        };
        Ok(Attempt { member_index, request, outcome })
    }
}
