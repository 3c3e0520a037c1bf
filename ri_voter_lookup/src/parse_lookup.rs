//! Parse the page returned by the voter lookup form into district numbers and elected officials.
//!
//! The interesting part of a typical result page looks like
//! ```text
//! <h2>Your District</h2>
//! <p>
//!     Congressional District: 1<br>
//!     Senate District: 4<br>
//!     Representative District: 13
//! </p>
//! <h2>Your Elected Officials</h2>
//! <div class="officials">
//!     <div class="v-align-text">US Senator
//!         Jack Reed</div>
//!     <div class="v-align-text">State Senator
//!         Maryellen Goodwin</div>
//! </div>
//! ```
//! Officials are reported before districts. Labels become keys via [normalize_key].

use std::collections::BTreeMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

const DISTRICT_HEADING : &str = "your district";
const OFFICIALS_HEADING : &str = "your elected officials";

static SELECT_HEADING : Lazy<Selector> = Lazy::new(||Selector::parse("h2").unwrap());
static SELECT_OFFICIAL : Lazy<Selector> = Lazy::new(||Selector::parse(".v-align-text").unwrap());
static WHITESPACE_RUN : Lazy<Regex> = Lazy::new(||Regex::new(r"\s+").unwrap());

#[derive(Serialize,Debug,Clone,Eq,PartialEq)]
#[serde(untagged)]
pub enum LookupValue {
    /// A district number.
    Number(i64),
    /// An official's name and details.
    Text(String),
}

/// A single `key : value` fact from the page. Serialized as a one entry object.
#[derive(Debug,Clone,Eq,PartialEq)]
pub struct LookupEntry {
    pub key : String,
    pub value : LookupValue,
}

impl LookupEntry {
    fn new(label:&str,value:LookupValue) -> Self {
        LookupEntry { key: normalize_key(label), value }
    }
}

impl Serialize for LookupEntry {
    fn serialize<S:Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key,&self.value)?;
        map.end()
    }
}

/// Everything extracted from one page, in page order. The same key may legitimately occur more than once.
#[derive(Serialize,Debug,Clone,Eq,PartialEq,Default)]
#[serde(transparent)]
pub struct LookupResult {
    pub entries : Vec<LookupEntry>,
}

impl LookupResult {
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get_all<'a>(&'a self,key:&'a str) -> impl Iterator<Item=&'a LookupValue> + 'a {
        self.entries.iter().filter(move |e|e.key==key).map(|e|&e.value)
    }

    /// A map view that does not lose duplicates.
    pub fn grouped(&self) -> BTreeMap<&str,Vec<&LookupValue>> {
        let mut res : BTreeMap<&str,Vec<&LookupValue>> = BTreeMap::new();
        for entry in &self.entries {
            res.entry(entry.key.as_str()).or_default().push(&entry.value);
        }
        res
    }
}

/// Make a label usable as a key: lower case, whitespace runs as `_`, and `/` as `_or_`.
pub fn normalize_key(label:&str) -> String {
    WHITESPACE_RUN.replace_all(&label.to_lowercase(),"_").replace('/',"_or_")
}

pub fn parse_lookup_html(text:&str) -> LookupResult {
    parse_lookup_page(&Html::parse_document(text))
}

/// Officials (in document order) followed by districts. Missing sections contribute nothing.
pub fn parse_lookup_page(html:&Html) -> LookupResult {
    let officials = section_after_heading(html,OFFICIALS_HEADING).map(parse_officials).unwrap_or_default();
    let districts = section_after_heading(html,DISTRICT_HEADING).map(|section|parse_districts(&element_text(section))).unwrap_or_default();
    LookupResult { entries: officials.into_iter().chain(districts).collect() }
}

fn element_text(element:ElementRef) -> String {
    element.text().collect()
}

/// The element immediately following the first `h2` with the given (lower case) text.
fn section_after_heading<'a>(html:&'a Html,heading:&str) -> Option<ElementRef<'a>> {
    let heading = html.select(&SELECT_HEADING).find(|h|element_text(*h).trim().to_lowercase()==heading)?;
    heading.next_siblings().find_map(ElementRef::wrap)
}

/// One entry per `Label: number` line. Lines that are not of that form are skipped.
fn parse_districts(text:&str) -> Vec<LookupEntry> {
    text.lines().filter_map(parse_district_line).collect()
}

fn parse_district_line(line:&str) -> Option<LookupEntry> {
    let (label,number) = line.trim().split_once(':')?;
    let label = label.trim();
    if label.is_empty() { return None; }
    let number = parse_leading_integer(number.trim())?;
    Some(LookupEntry::new(label,LookupValue::Number(number)))
}

/// Read an optionally signed run of leading decimal digits, ignoring anything after, so `"2 (map)"` is 2.
fn parse_leading_integer(s:&str) -> Option<i64> {
    let digits_start = if s.starts_with('-') || s.starts_with('+') { 1 } else { 0 };
    let digits_len = s[digits_start..].bytes().take_while(u8::is_ascii_digit).count();
    if digits_len==0 { return None; }
    s[..digits_start+digits_len].parse().ok()
}

fn parse_officials(section:ElementRef) -> Vec<LookupEntry> {
    section.select(&SELECT_OFFICIAL).flat_map(|official|pair_label_lines(&element_text(official))).collect()
}

/// Treat non blank lines as alternating label, value, label, value... An unpaired final label is dropped.
fn pair_label_lines(text:&str) -> Vec<LookupEntry> {
    let mut res = Vec::new();
    let mut pending_label : Option<&str> = None;
    for line in text.trim().lines().map(str::trim).filter(|l|!l.is_empty()) {
        match pending_label.take() {
            None => pending_label=Some(line),
            Some(label) => res.push(LookupEntry::new(label,LookupValue::Text(line.to_string()))),
        }
    }
    res
}
