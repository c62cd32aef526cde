use std::collections::HashSet;
use std::fmt::Display;

use common::errors::*;

use crate::error::{Error, ErrorKind};

/// Named values exported to the firmware through the generated header.
///
/// Entries are emitted in the order they were defined so the header is stable
/// between runs.
#[derive(Default, Debug)]
pub struct ConstantTable {
    names: HashSet<String>,
    entries: Vec<(String, String)>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a new constant. The value is emitted verbatim so anything that
    /// formats as a valid expression in the firmware's language can be used.
    pub fn define<V: Display>(&mut self, name: &str, value: V) -> Result<()> {
        if self.names.contains(name) {
            return Err(Error::new(
                ErrorKind::DuplicateConstant,
                format!("constant \"{}\" already exists", name),
            )
            .into());
        }

        self.names.insert(name.to_string());
        self.entries.push((name.to_string(), value.to_string()));
        Ok(())
    }

    pub fn define_all<'a, V: Display, I: IntoIterator<Item = (&'a str, V)>>(
        &mut self,
        constants: I,
    ) -> Result<()> {
        for (name, value) in constants {
            self.define(name, value)?;
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut table = ConstantTable::new();
        table.define("KEYBOARD_SIZE", 8).unwrap();

        let err = table.define("KEYBOARD_SIZE", 16).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().unwrap().kind,
            ErrorKind::DuplicateConstant
        );

        // The original value is kept.
        assert_eq!(table.get("KEYBOARD_SIZE"), Some("8"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut table = ConstantTable::new();
        table
            .define_all(vec![("ZETA", 3), ("ALPHA", 1), ("MIDDLE", 2)])
            .unwrap();
        table.define("RAW", "0x80 | 3").unwrap();

        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["ZETA", "ALPHA", "MIDDLE", "RAW"]);
        assert_eq!(table.get("RAW"), Some("0x80 | 3"));
        assert_eq!(table.get("MISSING"), None);
    }

    #[test]
    fn define_all_stops_at_first_duplicate() {
        let mut table = ConstantTable::new();
        assert!(table.define_all(vec![("A", 1), ("B", 2), ("A", 3)]).is_err());
        assert_eq!(table.len(), 2);
    }
}
