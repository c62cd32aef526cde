use common::errors::*;

use crate::descriptor::{Descriptor, SerializeContext};
use crate::encoding::*;

/// Valid values for an HID interface's bInterfaceSubClass field.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum HIDInterfaceSubClass {
    None = 0,

    // This device supports a standard protocol usable by a system's BIOS.
    Boot = 1,
}

impl HIDInterfaceSubClass {
    pub fn to_value(self) -> u8 {
        self as u8
    }
}

/// Valid values for the HID interface's bInterfaceProtocol when the
/// bInterfaceSubClass == Boot
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum HIDInterfaceBootProtocol {
    None = 0,
    Keyboard = 1,
    Mouse = 2,
}

impl HIDInterfaceBootProtocol {
    pub fn to_value(self) -> u8 {
        self as u8
    }
}

// Types of descriptors present in an HID interface (based on the
// bInterfaceClass)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum HIDDescriptorType {
    HID = 0x21,
    Report = 0x22,
    PhysicalDescriptor = 0x23,
}

impl HIDDescriptorType {
    pub fn to_value(self) -> u8 {
        self as u8
    }
}

/// Lookup value of a GET_DESCRIPTOR request for an interface's report
/// descriptor. The request's index is the interface number.
pub const HID_REPORT_DESCRIPTOR_VALUE: u16 = (HIDDescriptorType::Report as u16) << 8;

/// Section 6.2.1 of the HID 1.11 spec.
///
/// Rather than embedding its sub-descriptors, the record lists the type and
/// length of each of them. The host fetches their contents separately.
#[derive(Clone, Debug)]
pub struct HIDDescriptor {
    pub version: Version,
    pub country_code: u8,
    pub descriptors: Vec<Descriptor>,
}

impl HIDDescriptor {
    pub fn new(descriptors: Vec<Descriptor>) -> Self {
        Self {
            version: Version::new(1, 11),
            country_code: 0,
            descriptors,
        }
    }

    pub fn serialize(&self, ctx: &mut SerializeContext) -> Result<Vec<u8>> {
        let num_descriptors = checked_u8_length(self.descriptors.len(), "HID descriptor list")?;

        let mut data = vec![0, HIDDescriptorType::HID.to_value()];
        data.extend_from_slice(&self.version.to_bcd_bytes()?);
        data.extend_from_slice(&[self.country_code, num_descriptors]);

        for desc in &self.descriptors {
            let len = desc.serialize(ctx)?.len();
            let len = checked_u16_length(len, "HID class descriptor")?;

            data.push(desc.descriptor_type());
            data.extend_from_slice(&len.to_le_bytes());
        }

        patch_u8_length(&mut data, 0, "HID descriptor")?;
        Ok(data)
    }
}

/// Section 6.2.2 of the HID 1.11 spec.
///
/// The report item stream is opaque to the compiler and sent as is.
#[derive(Clone, Debug, PartialEq)]
pub struct HIDReportDescriptor {
    pub data: Vec<u8>,
}

impl HIDReportDescriptor {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.data.clone()
    }
}
