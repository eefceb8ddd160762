use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The set of canonical phone numbers (`+<digits>`) assigned to an employee.
///
/// Stored documents carry this as a brace-delimited string such as
/// `{+15551234567, +15557654321}`; older roster entries were created with a
/// plain array instead. Both shapes decode into the same in-memory set, and
/// encoding always produces the brace string, so the legacy external form is
/// preserved while business logic only ever sees real set operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadSet {
    numbers: Vec<String>,
}

impl LeadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a phone number, keeping the set free of duplicates. Returns
    /// whether the number was actually added.
    pub fn insert(&mut self, phone: &str) -> bool {
        if self.contains(phone) {
            return false;
        }
        self.numbers.push(phone.to_string());
        true
    }

    /// Removes a phone number if present.
    pub fn remove(&mut self, phone: &str) -> bool {
        let before = self.numbers.len();
        self.numbers.retain(|n| n != phone);
        self.numbers.len() != before
    }

    /// Exact membership test. A number that is a prefix or substring of
    /// another never matches.
    pub fn contains(&self, phone: &str) -> bool {
        self.numbers.iter().any(|n| n == phone)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.numbers.iter().map(String::as_str)
    }

    fn from_braced(text: &str) -> Self {
        let inner = text.trim().trim_start_matches('{').trim_end_matches('}');
        let mut set = LeadSet::new();
        for part in inner.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                set.insert(part);
            }
        }
        set
    }
}

impl fmt::Display for LeadSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.numbers.join(", "))
    }
}

impl Serialize for LeadSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LeadSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            List(Vec<String>),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(LeadSet::new()),
            Some(Repr::Text(text)) => Ok(LeadSet::from_braced(&text)),
            Some(Repr::List(items)) => {
                let mut set = LeadSet::new();
                for item in &items {
                    set.insert(item.trim());
                }
                Ok(set)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn braced_string_round_trips() {
        let set: LeadSet =
            serde_json::from_value(json!("{+15551234567, +15557654321}")).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("+15551234567"));
        assert!(set.contains("+15557654321"));
        assert_eq!(set.to_string(), "{+15551234567, +15557654321}");
    }

    #[test]
    fn legacy_array_shape_decodes() {
        let set: LeadSet = serde_json::from_value(json!(["+15551234567"])).unwrap();
        assert!(set.contains("+15551234567"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn null_and_empty_braces_mean_empty() {
        let from_null: LeadSet = serde_json::from_value(Value::Null).unwrap();
        assert!(from_null.is_empty());

        let from_empty: LeadSet = serde_json::from_value(json!("{}")).unwrap();
        assert!(from_empty.is_empty());
        assert_eq!(from_empty.to_string(), "{}");
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = LeadSet::new();
        assert!(set.insert("+15551234567"));
        assert!(!set.insert("+15551234567"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn membership_is_exact_not_substring() {
        let mut set = LeadSet::new();
        set.insert("+15551234567");
        // A substring scan over the serialized form would match "+1555123"
        // here. Exact membership must not.
        assert!(!set.contains("+1555123"));
        assert!(!set.contains("15551234567"));
        assert!(set.contains("+15551234567"));
    }

    #[test]
    fn remove_reports_whether_present() {
        let mut set = LeadSet::new();
        set.insert("+15551234567");
        assert!(set.remove("+15551234567"));
        assert!(!set.remove("+15551234567"));
        assert!(set.is_empty());
    }

    #[test]
    fn ragged_whitespace_is_tolerated() {
        let set: LeadSet = serde_json::from_value(json!("{ +1555 ,, +1666 }")).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["+1555", "+1666"]);
    }
}
