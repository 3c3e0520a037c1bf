//! Build the query for the Secretary of State "Am I registered" form from a member or a manually given address.

use std::fmt;
use serde::Serialize;
use url::Url;
use crate::member::Member;

pub const LOOKUP_ENDPOINT : &str = "https://vote.sos.ri.gov/ovr/general";
/// The form serves several states; this lookup is always Rhode Island.
pub const LOOKUP_STATE : &str = "RI";

#[derive(Debug,Clone,Copy,Eq,PartialEq)]
pub enum LookupRequestError {
    /// One of address, zip or city is empty.
    NoData,
    InvalidEndpoint,
}

impl fmt::Display for LookupRequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for LookupRequestError {}

/// Everything needed for one lookup. The identity fields are only used for progress messages.
#[derive(Serialize,Debug,Clone,Eq,PartialEq,Default)]
pub struct LookupRequest {
    pub address : String,
    pub city : String,
    pub zip : String,
    pub id : String,
    pub first_name : String,
    pub last_name : String,
}

impl LookupRequest {
    pub fn from_member(member:&Member) -> Self {
        let fields = &member.merge_fields;
        LookupRequest {
            address: fields.address.addr1.clone(),
            city: fields.address.city.clone(),
            zip: member.zip().unwrap_or("").to_string(),
            id: member.id.clone(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
        }
    }

    /// A lookup for an address typed on the command line. It replaces the member entirely, so identity fields are empty.
    pub fn manual(address:&str,zip:&str,city:&str) -> Self {
        LookupRequest {
            address: address.to_string(),
            city: city.to_string(),
            zip: zip.to_string(),
            ..Default::default()
        }
    }

    pub fn is_manual(&self) -> bool { self.id.is_empty() }

    pub fn has_address(&self) -> bool {
        !(self.address.trim().is_empty() || self.zip.trim().is_empty() || self.city.trim().is_empty())
    }

    /// Who or what is being looked up, for progress messages.
    pub fn describe(&self) -> String {
        if self.is_manual() {
            format!("{}, {} {}",self.address,self.city,self.zip)
        } else {
            format!("{} {}, id number {}",self.first_name,self.last_name,self.id)
        }
    }

    pub fn lookup_url(&self) -> Result<Url,LookupRequestError> {
        self.lookup_url_on(LOOKUP_ENDPOINT)
    }

    /// The form submission URL on a given endpoint. All values are percent encoded.
    pub fn lookup_url_on(&self,endpoint:&str) -> Result<Url,LookupRequestError> {
        if !self.has_address() { return Err(LookupRequestError::NoData); }
        let params = [
            ("step","1"),
            ("address[general][state]",LOOKUP_STATE),
            ("address[general][address_line_1]",self.address.trim()),
            ("address[general][city]",self.city.trim()),
            ("address[general][zip]",self.zip.trim()),
            ("general_address_validation_callback","general"),
            ("submit","submit"),
        ];
        Url::parse_with_params(endpoint,&params).map_err(|_|LookupRequestError::InvalidEndpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::parse_members;

    #[test]
    fn test_url_for_member() {
        let members = parse_members(r#"{"members":[{"id":"x9","merge_fields":{"FNAME":"Ann","LNAME":"Arbor","MMERGE3":{"addr1":"12 Hope St #3","city":"East Providence","zip":""},"MMERGE4":"02914"}}]}"#).unwrap();
        let request = LookupRequest::from_member(&members[0]);
        assert_eq!(request.zip,"02914");
        assert_eq!(request.describe(),"Ann Arbor, id number x9");
        let url = request.lookup_url().unwrap();
        assert_eq!(url.host_str(),Some("vote.sos.ri.gov"));
        assert_eq!(url.path(),"/ovr/general");
        let query = url.query().unwrap();
        assert!(query.starts_with("step=1&address%5Bgeneral%5D%5Bstate%5D=RI&"));
        assert!(query.contains("address%5Bgeneral%5D%5Baddress_line_1%5D=12+Hope+St+%233"));
        assert!(query.contains("address%5Bgeneral%5D%5Bcity%5D=East+Providence"));
        assert!(query.ends_with("address%5Bgeneral%5D%5Bzip%5D=02914&general_address_validation_callback=general&submit=submit"));
        let pairs : Vec<(String,String)> = url.query_pairs().map(|(k,v)|(k.into_owned(),v.into_owned())).collect();
        assert!(pairs.contains(&("address[general][address_line_1]".to_string(),"12 Hope St #3".to_string())));
    }

    #[test]
    fn test_manual_request_has_no_identity() {
        let request = LookupRequest::manual("1 Main St","02903","Providence");
        assert!(request.is_manual());
        assert_eq!(request.id,"");
        assert_eq!(request.first_name,"");
        assert!(request.lookup_url().is_ok());
    }

    #[test]
    fn test_missing_field_is_no_data() {
        assert_eq!(LookupRequest::manual("1 Main St","02903","").lookup_url(),Err(LookupRequestError::NoData));
        assert_eq!(LookupRequest::manual("","02903","Providence").lookup_url(),Err(LookupRequestError::NoData));
        assert_eq!(LookupRequest::manual("1 Main St"," ","Providence").lookup_url(),Err(LookupRequestError::NoData));
    }

    #[test]
    fn test_bad_endpoint() {
        assert_eq!(LookupRequest::manual("1 Main St","02903","Providence").lookup_url_on("not a url"),Err(LookupRequestError::InvalidEndpoint));
    }
}
