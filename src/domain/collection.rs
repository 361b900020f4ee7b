//! The full patient collection as held by a record store
//!
//! Serialized as one JSON object keyed by patient id. Entry order is the
//! order keys appear in the persisted object, with new patients appended,
//! and it survives a load/save cycle. Lookups are linear scans.

use crate::domain::ids::PatientId;
use crate::domain::patient::PatientRecord;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered mapping of patient id to record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientCollection {
    entries: Vec<(PatientId, PatientRecord)>,
}

impl PatientCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PatientId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &PatientId) -> Option<&PatientRecord> {
        self.position(id).map(|i| &self.entries[i].1)
    }

    /// Appends a new entry; returns `false` without changes if the id exists
    pub fn insert(&mut self, id: PatientId, record: PatientRecord) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.entries.push((id, record));
        true
    }

    /// Replaces the record of an existing id in place, keeping its position
    ///
    /// Returns the previous record, or `None` if the id is absent.
    pub fn replace(&mut self, id: &PatientId, record: PatientRecord) -> Option<PatientRecord> {
        let index = self.position(id)?;
        Some(std::mem::replace(&mut self.entries[index].1, record))
    }

    /// Removes an entry, preserving the order of the rest
    pub fn remove(&mut self, id: &PatientId) -> Option<PatientRecord> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PatientId, &PatientRecord)> {
        self.entries.iter().map(|(id, record)| (id, record))
    }

    pub fn records(&self) -> impl Iterator<Item = &PatientRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    /// Describes the first stored record that violates a field constraint
    pub fn find_invalid(&self) -> Option<String> {
        self.iter().find_map(|(id, record)| {
            let errors = record.validate();
            (!errors.is_empty()).then(|| format!("patient {id}: {errors}"))
        })
    }

    fn position(&self, id: &PatientId) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == id)
    }
}

impl Serialize for PatientCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = PatientCollection;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping patient ids to patient records")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut collection = PatientCollection {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((id, record)) = access.next_entry::<PatientId, PatientRecord>()? {
            if collection.contains(&id) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate patient id '{id}'"
                )));
            }
            collection.entries.push((id, record));
        }
        Ok(collection)
    }
}

impl<'de> Deserialize<'de> for PatientCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::Gender;

    fn record(name: &str, weight: f64) -> PatientRecord {
        PatientRecord {
            name: name.to_string(),
            city: "NY".to_string(),
            age: 30,
            gender: Gender::Other,
            height: 1.7,
            weight,
        }
    }

    fn id(s: &str) -> PatientId {
        PatientId::new(s).unwrap()
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut collection = PatientCollection::new();
        assert!(collection.insert(id("P001"), record("a", 60.0)));
        assert!(!collection.insert(id("P001"), record("b", 70.0)));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(&id("P001")).unwrap().name, "a");
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut collection = PatientCollection::new();
        collection.insert(id("P003"), record("c", 60.0));
        collection.insert(id("P001"), record("a", 60.0));

        let previous = collection.replace(&id("P003"), record("c2", 61.0)).unwrap();
        assert_eq!(previous.name, "c");

        let ids: Vec<&str> = collection.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["P003", "P001"]);
        assert!(collection.replace(&id("P404"), record("x", 1.0)).is_none());
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut collection = PatientCollection::new();
        for key in ["P1", "P2", "P3"] {
            collection.insert(id(key), record(key, 60.0));
        }
        assert!(collection.remove(&id("P2")).is_some());
        assert!(collection.remove(&id("P2")).is_none());

        let ids: Vec<&str> = collection.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P3"]);
    }

    #[test]
    fn test_serde_preserves_document_order() {
        let json = r#"{
            "P9": {"name":"z","city":"A","age":20,"gender":"male","height":1.8,"weight":80},
            "P1": {"name":"a","city":"B","age":21,"gender":"female","height":1.6,"weight":55}
        }"#;
        let collection: PatientCollection = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = collection.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["P9", "P1"]);

        let written = serde_json::to_string(&collection).unwrap();
        assert!(written.find("\"P9\"").unwrap() < written.find("\"P1\"").unwrap());

        let reparsed: PatientCollection = serde_json::from_str(&written).unwrap();
        assert_eq!(reparsed, collection);
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let json = r#"{
            "P1": {"name":"a","city":"B","age":21,"gender":"female","height":1.6,"weight":55},
            "P1": {"name":"b","city":"B","age":21,"gender":"female","height":1.6,"weight":55}
        }"#;
        let err = serde_json::from_str::<PatientCollection>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate patient id"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_str::<PatientCollection>("[]").is_err());
    }

    #[test]
    fn test_find_invalid() {
        let mut collection = PatientCollection::new();
        collection.insert(id("P1"), record("a", 60.0));
        assert!(collection.find_invalid().is_none());

        collection.insert(id("P2"), record("b", 0.0));
        let message = collection.find_invalid().unwrap();
        assert!(message.contains("P2"));
        assert!(message.contains("weight"));
    }
}
