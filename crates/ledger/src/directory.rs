//! Existence checks against sibling record managers

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which sibling manager a lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Accounts,
    Persons,
    Cards,
}

/// Lookup of records held by other managers.
///
/// Callers only see success or failure plus the sibling's snapshot; the
/// failure carries the sibling's own message.
pub trait Directory {
    fn lookup(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, String>;

    fn exists(&self, namespace: Namespace, id: &str) -> Result<(), String> {
        self.lookup(namespace, id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_names() {
        assert_eq!(Namespace::Persons.to_string(), "persons");
        assert_eq!("cards".parse::<Namespace>().unwrap(), Namespace::Cards);
    }
}
