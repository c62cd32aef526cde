use core::iter::Iterator;

use common::errors::*;

/// A single length prefixed descriptor inside of a larger buffer.
#[derive(Debug, PartialEq)]
pub struct RawDescriptor<'a> {
    pub descriptor_type: u8,
    pub data: &'a [u8],
}

/// Iterates over a list of concatenated USB descriptors in binary form.
pub struct DescriptorIter<'a> {
    data: &'a [u8],
}

impl<'a> DescriptorIter<'a> {
    pub fn new(data: &'a [u8]) -> DescriptorIter<'a> {
        DescriptorIter { data }
    }

    fn next_impl(&mut self) -> Result<Option<RawDescriptor<'a>>> {
        if self.data.is_empty() {
            return Ok(None);
        }

        if self.data.len() < 2 {
            return Err(err_msg("Descriptor too short"));
        }

        // First two bytes of all descriptor types are the same.
        let len = self.data[0] as usize;
        let descriptor_type = self.data[1];

        if len < 2 {
            return Err(format_err!("Descriptor has invalid length {}", len));
        }

        if self.data.len() < len {
            return Err(err_msg("Descriptor overflows buffer"));
        }

        let (raw_desc, rest) = self.data.split_at(len);
        self.data = rest;

        Ok(Some(RawDescriptor {
            descriptor_type,
            data: raw_desc,
        }))
    }
}

impl<'a> Iterator for DescriptorIter<'a> {
    type Item = Result<RawDescriptor<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_impl() {
            Ok(v) => v.map(Ok),
            Err(e) => {
                // Stop after the first error as the rest of the buffer can't be
                // framed.
                self.data = &[];
                Some(Err(e))
            }
        }
    }
}
