

pub mod config;
pub mod logger;
pub mod member;
pub mod lookup_request;
pub mod parse_lookup;
pub mod fetch;
pub mod run;
pub mod cli;
