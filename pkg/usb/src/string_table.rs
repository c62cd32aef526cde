use std::collections::HashMap;

use common::errors::*;

use crate::error::{Error, ErrorKind};

/// Strings referenced by a device's descriptors.
///
/// Indices are handed out lazily in the order strings are first referenced
/// while serializing. Index 0 is reserved by USB to mean "no string".
#[derive(Default, Debug)]
pub struct StringTable {
    indices: HashMap<String, u8>,
    strings: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the index of a string, appending it to the table if it hasn't
    /// been seen before. `None` and the empty string always map to index 0.
    pub fn define(&mut self, value: Option<&str>) -> Result<u8> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(0),
        };

        if let Some(idx) = self.indices.get(value) {
            return Ok(*idx);
        }

        if self.strings.len() >= u8::MAX as usize {
            return Err(Error::new(
                ErrorKind::TooManyStrings,
                format!("No string index left for {:?}", value),
            )
            .into());
        }

        self.strings.push(value.to_string());
        let idx = self.strings.len() as u8;
        self.indices.insert(value.to_string(), idx);
        Ok(idx)
    }

    /// All defined strings ordered by index. The first element has index 1.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_maps_to_zero_without_growing() {
        let mut table = StringTable::new();
        assert_eq!(table.define(None).unwrap(), 0);
        assert_eq!(table.define(None).unwrap(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn indices_follow_first_reference() {
        let mut table = StringTable::new();
        assert_eq!(table.define(Some("Acme")).unwrap(), 1);
        assert_eq!(table.define(Some("Widget")).unwrap(), 2);
        assert_eq!(table.define(Some("Acme")).unwrap(), 1);
        assert_eq!(table.define(None).unwrap(), 0);
        assert_eq!(table.define(Some("Widget")).unwrap(), 2);

        assert_eq!(table.len(), 2);
        assert_eq!(table.strings(), &["Acme".to_string(), "Widget".to_string()]);
    }

    #[test]
    fn empty_string_is_treated_as_absent() {
        let mut table = StringTable::new();
        assert_eq!(table.define(Some("")).unwrap(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn index_space_is_limited_to_one_byte() {
        let mut table = StringTable::new();
        for i in 0..255 {
            assert_eq!(table.define(Some(&format!("s{}", i))).unwrap() as usize, i + 1);
        }

        // Already defined strings still resolve.
        assert_eq!(table.define(Some("s0")).unwrap(), 1);

        let err = table.define(Some("one too many")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>().unwrap().kind,
            ErrorKind::TooManyStrings
        );
    }
}
