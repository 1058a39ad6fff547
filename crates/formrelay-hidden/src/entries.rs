//! Ordered hidden parameter set
//!
//! The final name -> values mapping sent through the hidden state blob.
//! Iteration order equals first-insertion order; serialization must never
//! depend on hash order.

use std::collections::HashMap;

/// Ordered multimap of hidden parameters
#[derive(Clone, Debug, Default)]
pub struct HiddenParameterSet {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl HiddenParameterSet {
    pub fn new() -> Self {
        HiddenParameterSet::default()
    }

    /// Append one value. A repeated name extends the existing entry; the
    /// first insertion fixes the entry's position.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1.push(value.into()),
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), vec![value.into()]));
            }
        }
    }

    /// Append all values under one name
    pub fn append_all<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.append(name, value);
        }
    }

    /// Values registered under a name
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.index.get(name).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

impl PartialEq for HiddenParameterSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for HiddenParameterSet {}
