//! Interception domains.

use crate::domains::{self, DomainSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The interception surface a call belongs to.
///
/// Each domain owns its own call and outcome stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Inter-module method calls.
    ModuleCall,
    /// Database queries.
    DbQuery,
    /// Outbound HTTP requests.
    HttpRequest,
}

impl Domain {
    /// All domains, in store order.
    pub const ALL: [Domain; 3] = [Domain::ModuleCall, Domain::DbQuery, Domain::HttpRequest];

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModuleCall => "module_call",
            Self::DbQuery => "db_query",
            Self::HttpRequest => "http_request",
        }
    }

    /// Per-domain configuration driving fingerprinting, loading and replay.
    pub fn spec(&self) -> &'static DomainSpec {
        match self {
            Self::ModuleCall => &domains::module_call::SPEC,
            Self::DbQuery => &domains::db_query::SPEC,
            Self::HttpRequest => &domains::http_request::SPEC,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::ModuleCall => 0,
            Self::DbQuery => 1,
            Self::HttpRequest => 2,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "module" | "module_call" | "modulecall" | "core" => Ok(Self::ModuleCall),
            "db" | "db_query" | "dbquery" | "database" => Ok(Self::DbQuery),
            "http" | "http_request" | "httprequest" => Ok(Self::HttpRequest),
            _ => Err("domain must be one of: module, db, http"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_domain_aliases() {
        assert_eq!("db".parse::<Domain>(), Ok(Domain::DbQuery));
        assert_eq!("moduleCall".parse::<Domain>(), Ok(Domain::ModuleCall));
        assert_eq!("http-request".parse::<Domain>(), Ok(Domain::HttpRequest));
        assert!("ftp".parse::<Domain>().is_err());
    }

    #[test]
    fn spec_matches_domain() {
        for domain in Domain::ALL {
            assert_eq!(domain.spec().domain, domain);
            assert_eq!(Domain::ALL[domain.index()], domain);
        }
    }
}
