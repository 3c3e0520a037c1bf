//! Members read from a local Mailchimp list export.
//!
//! The export looks like `{"members":[{"id":"...","merge_fields":{"FNAME":..,"LNAME":..,"MMERGE3":{"addr1":..,"city":..,"zip":..},"MMERGE4":..,"MMERGE5":..}}]}`
//! where `MMERGE3` is the postal address merge field, and `MMERGE4`/`MMERGE5` are older
//! free-text zip fields that some members filled in instead.

use std::path::Path;
use anyhow::Context;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fixed location of the export, relative to the working directory.
pub const MEMBERS_FILE : &str = "members.json";

#[derive(Deserialize)]
struct MemberExport {
    members : Vec<Member>,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Member {
    pub id : String,
    #[serde(default)]
    pub merge_fields : MergeFields,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct MergeFields {
    #[serde(rename="FNAME",default,deserialize_with="loose_string")]
    pub first_name : String,
    #[serde(rename="LNAME",default,deserialize_with="loose_string")]
    pub last_name : String,
    #[serde(rename="MMERGE3",default,deserialize_with="address_or_blank")]
    pub address : PostalAddress,
    #[serde(rename="MMERGE4",default,deserialize_with="loose_string")]
    pub zip_fallback : String,
    #[serde(rename="MMERGE5",default,deserialize_with="loose_string")]
    pub zip_second_fallback : String,
    /// Any other merge fields, kept so the member can be written back out unchanged.
    #[serde(flatten)]
    pub other : Map<String,Value>,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct PostalAddress {
    #[serde(default,deserialize_with="loose_string")]
    pub addr1 : String,
    #[serde(default,deserialize_with="loose_string")]
    pub city : String,
    #[serde(default,deserialize_with="loose_string")]
    pub zip : String,
    #[serde(flatten)]
    pub other : Map<String,Value>,
}

/// Mailchimp sometimes gives zips as numbers, and missing values as null.
fn loose_string<'de,D:Deserializer<'de>>(deserializer:D) -> Result<String,D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected a string, found {}",other))),
    }
}

/// An address merge field that was never filled in is exported as `""` rather than an object.
fn address_or_blank<'de,D:Deserializer<'de>>(deserializer:D) -> Result<PostalAddress,D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(PostalAddress::default()),
        Value::String(s) if s.trim().is_empty() => Ok(PostalAddress::default()),
        Value::String(s) => Err(D::Error::custom(format!("expected an address object, found string {:?}",s))),
        value => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

fn non_blank(s:&str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

impl Member {
    /// The zip from the address field, falling back to the free-text zip fields in order.
    pub fn zip(&self) -> Option<&str> {
        let fields = &self.merge_fields;
        non_blank(&fields.address.zip)
            .or_else(||non_blank(&fields.zip_fallback))
            .or_else(||non_blank(&fields.zip_second_fallback))
    }

    pub fn is_valid(&self) -> bool {
        let address = &self.merge_fields.address;
        self.zip().is_some() && non_blank(&address.addr1).is_some() && non_blank(&address.city).is_some()
    }
}

/// Parse the text of an export, returning every member in source order.
pub fn parse_members(json:&str) -> anyhow::Result<Vec<Member>> {
    let export : MemberExport = serde_json::from_str(json)?;
    Ok(export.members)
}

/// Keep members that have enough of an address to look up, preserving order.
pub fn filter_to_valid_members(members:Vec<Member>) -> Vec<Member> {
    members.into_iter().filter(Member::is_valid).collect()
}

pub fn load_valid_members(path:&Path) -> anyhow::Result<Vec<Member>> {
    let text = std::fs::read_to_string(path).with_context(||format!("Could not read member file {}",path.display()))?;
    let members = parse_members(&text).with_context(||format!("Could not parse member file {}",path.display()))?;
    let total = members.len();
    let valid = filter_to_valid_members(members);
    log::info!("Loaded {} members from {}, {} with a usable address",total,path.display(),valid.len());
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXPORT : &str = r#"{
      "members": [
        {"id":"a1","email_address":"ann@example.com","merge_fields":{"FNAME":"Ann","LNAME":"Arbor","MMERGE3":{"addr1":"1 Main St","addr2":"","city":"Providence","state":"RI","zip":"02903","country":"US"},"MMERGE4":"","MMERGE5":"","PHONE":"555"}},
        {"id":"b2","merge_fields":{"FNAME":"Bob","LNAME":"Bristol","MMERGE3":{"addr1":"2 Hope St","city":"Bristol","zip":""},"MMERGE4":"02809","MMERGE5":""}},
        {"id":"c3","merge_fields":{"FNAME":"Cat","LNAME":"Cranston","MMERGE3":{"addr1":"3 Park Ave","city":"Cranston","zip":""},"MMERGE4":"","MMERGE5":2920}},
        {"id":"d4","merge_fields":{"FNAME":"Dan","LNAME":"Dover","MMERGE3":{"addr1":"4 Elm St","city":"Warwick","zip":""},"MMERGE4":"","MMERGE5":""}},
        {"id":"e5","merge_fields":{"FNAME":"Eve","LNAME":"Exeter","MMERGE3":"","MMERGE4":"02822","MMERGE5":""}},
        {"id":"f6","merge_fields":{"FNAME":"Fay","LNAME":"Foster","MMERGE3":{"addr1":"6 Oak St","city":"  ","zip":"02825"}}}
      ]
    }"#;

    #[test]
    fn test_filter_keeps_exactly_members_with_address_city_and_zip() {
        let members = parse_members(EXPORT).unwrap();
        assert_eq!(members.len(),6);
        let valid : Vec<String> = filter_to_valid_members(members).into_iter().map(|m|m.id).collect();
        assert_eq!(valid,vec!["a1","b2","c3"]);
    }

    #[test]
    fn test_zip_fallback_order() {
        let members = parse_members(EXPORT).unwrap();
        assert_eq!(members[0].zip(),Some("02903"));
        assert_eq!(members[1].zip(),Some("02809"));
        assert_eq!(members[2].zip(),Some("2920"));
        assert_eq!(members[3].zip(),None);
        assert_eq!(members[4].zip(),Some("02822"));
    }

    #[test]
    fn test_blank_address_merge_field() {
        let members = parse_members(EXPORT).unwrap();
        assert_eq!(members[4].merge_fields.address,PostalAddress::default());
        assert!(!members[4].is_valid());
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let members = parse_members(EXPORT).unwrap();
        let json = serde_json::to_value(&members[0]).unwrap();
        assert_eq!(json["merge_fields"]["PHONE"],"555");
        assert_eq!(json["merge_fields"]["MMERGE3"]["state"],"RI");
        assert_eq!(json["merge_fields"]["MMERGE3"]["zip"],"02903");
        assert_eq!(json["merge_fields"]["FNAME"],"Ann");
        // only id and merge_fields are kept from the member itself.
        assert!(json.get("email_address").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();
        file.flush().unwrap();
        let valid = load_valid_members(file.path()).unwrap();
        assert_eq!(valid.len(),3);
    }

    #[test]
    fn test_missing_and_malformed_files_are_errors() {
        assert!(load_valid_members(Path::new("no/such/members.json")).is_err());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"members\": [").unwrap();
        file.flush().unwrap();
        assert!(load_valid_members(file.path()).is_err());
        assert!(parse_members("{\"people\":[]}").is_err());
    }
}
