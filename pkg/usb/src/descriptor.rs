use common::errors::*;

use crate::descriptors::*;
use crate::encoding::patch_u8_length;
use crate::hid::{HIDDescriptor, HIDDescriptorType, HIDReportDescriptor};
use crate::string_table::StringTable;

/// State shared by all descriptors while a device's descriptor table is
/// being serialized.
pub struct SerializeContext<'a> {
    strings: &'a mut StringTable,
    num_configurations: usize,
}

impl<'a> SerializeContext<'a> {
    pub fn new(strings: &'a mut StringTable, num_configurations: usize) -> Self {
        Self {
            strings,
            num_configurations,
        }
    }

    pub fn define_string(&mut self, value: Option<&str>) -> Result<u8> {
        self.strings.define(value)
    }
}

/// Any descriptor that can be placed in a device's descriptor table.
#[derive(Clone, Debug)]
pub enum Descriptor {
    Device(DeviceDescriptor),
    Configuration(ConfigurationDescriptor),
    Interface(InterfaceDescriptor),
    Endpoint(EndpointDescriptor),
    HID(HIDDescriptor),
    HIDReport(HIDReportDescriptor),

    /// Class specific descriptor which isn't otherwise modeled.
    Generic(GenericDescriptor),
}

impl Descriptor {
    /// Value of the bDescriptorType field of this descriptor.
    pub fn descriptor_type(&self) -> u8 {
        match self {
            Descriptor::Device(_) => DescriptorType::DEVICE.to_value(),
            Descriptor::Configuration(_) => DescriptorType::CONFIGURATION.to_value(),
            Descriptor::Interface(_) => DescriptorType::INTERFACE.to_value(),
            Descriptor::Endpoint(_) => DescriptorType::ENDPOINT.to_value(),
            Descriptor::HID(_) => HIDDescriptorType::HID.to_value(),
            Descriptor::HIDReport(_) => HIDDescriptorType::Report.to_value(),
            Descriptor::Generic(d) => d.descriptor_type,
        }
    }

    pub fn serialize(&self, ctx: &mut SerializeContext) -> Result<Vec<u8>> {
        match self {
            Descriptor::Device(d) => d.serialize(ctx.strings, ctx.num_configurations),
            Descriptor::Configuration(d) => d.serialize(ctx),
            Descriptor::Interface(d) => d.serialize(ctx.strings),
            Descriptor::Endpoint(d) => d.serialize(),
            Descriptor::HID(d) => d.serialize(ctx),
            Descriptor::HIDReport(d) => Ok(d.serialize()),
            Descriptor::Generic(d) => d.serialize(),
        }
    }
}

macro_rules! impl_from_descriptor {
    ($($variant:ident => $t:ty),*) => {
        $(
            impl From<$t> for Descriptor {
                fn from(v: $t) -> Self {
                    Descriptor::$variant(v)
                }
            }
        )*
    };
}

impl_from_descriptor!(
    Device => DeviceDescriptor,
    Configuration => ConfigurationDescriptor,
    Interface => InterfaceDescriptor,
    Endpoint => EndpointDescriptor,
    HID => HIDDescriptor,
    HIDReport => HIDReportDescriptor,
    Generic => GenericDescriptor
);

/// Serialized as bLength, bDescriptorType and then the body unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericDescriptor {
    pub descriptor_type: u8,
    pub body: Vec<u8>,
}

impl GenericDescriptor {
    pub fn new(descriptor_type: u8, body: Vec<u8>) -> Self {
        Self {
            descriptor_type,
            body,
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut data = vec![0, self.descriptor_type];
        data.extend_from_slice(&self.body);
        patch_u8_length(&mut data, 0, "class specific descriptor")?;
        Ok(data)
    }
}
