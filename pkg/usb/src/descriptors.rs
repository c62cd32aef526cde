#![allow(non_camel_case_types)]

// NOTE: 0 means a null string reference.
// NOTE: All multi-byte fields are little endian

use common::errors::*;

use crate::descriptor::{Descriptor, SerializeContext};
use crate::encoding::*;
use crate::error::{Error, ErrorKind};
use crate::string_table::StringTable;

// This is used as the value of the bDescriptorType field.
//
// Table 9-5 of USB2.0 Spec
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DescriptorType {
    DEVICE = 1,
    CONFIGURATION = 2,
    STRING = 3,
    INTERFACE = 4,
    ENDPOINT = 5,
    DEVICE_QUALIFIER = 6,
    OTHER_SPEED_CONFIGURATION = 7,
    INTERFACE_POWER1 = 8,
}

impl DescriptorType {
    pub fn from_value(value: u8) -> Option<Self> {
        Some(match value {
            1 => Self::DEVICE,
            2 => Self::CONFIGURATION,
            3 => Self::STRING,
            4 => Self::INTERFACE,
            5 => Self::ENDPOINT,
            6 => Self::DEVICE_QUALIFIER,
            7 => Self::OTHER_SPEED_CONFIGURATION,
            8 => Self::INTERFACE_POWER1,
            _ => {
                return None;
            }
        })
    }

    pub fn to_value(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InterfaceClass {
    Unknown0 = 0,
    Communication = 2,
    HID = 3,
    ApplicationSpecific = 0xFE,
    VendorSpecific = 0xFF,
}

impl InterfaceClass {
    pub fn to_value(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TransferType {
    Control = 0b00,
    Isochronous = 0b01,
    Bulk = 0b10,
    Interrupt = 0b11,
}

impl TransferType {
    pub fn from_value(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Control,
            0b01 => Self::Isochronous,
            0b10 => Self::Bulk,
            _ => Self::Interrupt,
        }
    }

    pub fn to_value(self) -> u8 {
        self as u8
    }
}

/// Packet size used for endpoint 0 when a device doesn't specify one.
pub const DEFAULT_ENDPOINT0_SIZE: u8 = 32;

// Bits of ConfigurationDescriptor::attributes. Table 9-10 of USB2.0 Spec
pub const CONFIG_ATTR_RESERVED_HIGH: u8 = 0x80;
pub const CONFIG_ATTR_SELF_POWERED: u8 = 0x40;
pub const CONFIG_ATTR_REMOTE_WAKEUP: u8 = 0x20;

/// Largest power budget accepted for a configuration.
///
/// bMaxPower itself could describe up to 500mA, but devices built with this
/// compiler are low-power bus powered devices.
pub const MAX_POWER_LIMIT_MA: u16 = 100;

pub const ENDPOINT_DIRECTION_IN: u8 = 1 << 7;

pub fn is_in_endpoint(address: u8) -> bool {
    address & ENDPOINT_DIRECTION_IN != 0
}

// Table 9-8 of USB2.0 Spec
#[derive(Clone, Debug)]
pub struct DeviceDescriptor {
    pub usb_version: Version,
    pub device_class: u8,
    pub device_subclass: u8,
    pub device_protocol: u8,
    pub max_packet_size0: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    pub device_version: Version,

    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl DeviceDescriptor {
    pub const LENGTH: usize = 18;

    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            usb_version: Version::new(2, 0),
            device_class: 0,
            device_subclass: 0,
            device_protocol: 0,
            max_packet_size0: DEFAULT_ENDPOINT0_SIZE,
            vendor_id,
            product_id,
            device_version: Version::new(1, 0),
            manufacturer: None,
            product: None,
            serial_number: None,
        }
    }

    /// Serializes the descriptor, interning its strings.
    ///
    /// bNumConfigurations isn't stored on the descriptor as it is owned by
    /// whoever holds the list of configurations.
    pub fn serialize(&self, strings: &mut StringTable, num_configurations: usize) -> Result<Vec<u8>> {
        let manufacturer_idx = strings.define(self.manufacturer.as_deref())?;
        let product_idx = strings.define(self.product.as_deref())?;
        let serial_idx = strings.define(self.serial_number.as_deref())?;

        let num_configurations = checked_u8_length(num_configurations, "configuration list")?;

        let mut data = Vec::with_capacity(Self::LENGTH);
        data.extend_from_slice(&[0, DescriptorType::DEVICE.to_value()]);
        data.extend_from_slice(&self.usb_version.to_bcd_bytes()?);
        data.extend_from_slice(&[
            self.device_class,
            self.device_subclass,
            self.device_protocol,
            self.max_packet_size0,
        ]);
        data.extend_from_slice(&self.vendor_id.to_le_bytes());
        data.extend_from_slice(&self.product_id.to_le_bytes());
        data.extend_from_slice(&self.device_version.to_bcd_bytes()?);
        data.extend_from_slice(&[manufacturer_idx, product_idx, serial_idx, num_configurations]);

        patch_u8_length(&mut data, 0, "device descriptor")?;
        Ok(data)
    }
}

// Table 9-10 of USB2.0 Spec
#[derive(Clone, Debug)]
pub struct ConfigurationDescriptor {
    pub value: u8,
    pub description: Option<String>,
    pub attributes: u8,

    max_power_ma: u16,

    /// Interface, endpoint and class specific descriptors in the order they
    /// are sent to the host.
    pub descriptors: Vec<Descriptor>,
}

impl ConfigurationDescriptor {
    pub const HEADER_LENGTH: usize = 9;

    pub fn new(value: u8) -> Self {
        Self {
            value,
            description: None,
            attributes: CONFIG_ATTR_RESERVED_HIGH,
            // With all 5 LEDs lit a keyboard draws around 32mA.
            max_power_ma: 40,
            descriptors: vec![],
        }
    }

    pub fn max_power(&self) -> u16 {
        self.max_power_ma
    }

    pub fn set_max_power(&mut self, milliamps: u16) -> Result<&mut Self> {
        if milliamps > MAX_POWER_LIMIT_MA {
            return Err(Error::new(
                ErrorKind::InvalidPowerBudget,
                format!(
                    "configuration {} requests {}mA but at most {}mA is allowed",
                    self.value, milliamps, MAX_POWER_LIMIT_MA
                ),
            )
            .into());
        }

        self.max_power_ma = milliamps;
        Ok(self)
    }

    pub fn add_descriptor<D: Into<Descriptor>>(&mut self, desc: D) -> &mut Self {
        self.descriptors.push(desc.into());
        self
    }

    /// Appends an interface followed by its class specific descriptors and
    /// then its endpoints, which is the order hosts expect.
    pub fn add_interface<I: IntoIterator<Item = Descriptor>>(
        &mut self,
        iface: InterfaceDescriptor,
        class_descriptors: I,
    ) -> &mut Self {
        let endpoints = iface.endpoints.clone();
        self.descriptors.push(Descriptor::Interface(iface));
        self.descriptors.extend(class_descriptors);
        self.descriptors
            .extend(endpoints.into_iter().map(Descriptor::Endpoint));
        self
    }

    pub fn num_interfaces(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| d.descriptor_type() == DescriptorType::INTERFACE.to_value())
            .count()
    }

    pub fn serialize(&self, ctx: &mut SerializeContext) -> Result<Vec<u8>> {
        let num_interfaces = checked_u8_length(self.num_interfaces(), "interface list")?;
        let description_idx = ctx.define_string(self.description.as_deref())?;

        let mut data = vec![
            0,
            DescriptorType::CONFIGURATION.to_value(),
            0, // wTotalLength is filled in once all children are serialized.
            0,
            num_interfaces,
            self.value,
            description_idx,
            self.attributes,
            // bMaxPower is in 2mA units.
            ((self.max_power_ma + 1) / 2) as u8,
        ];
        patch_u8_length(&mut data, 0, "configuration header")?;

        for desc in &self.descriptors {
            data.extend_from_slice(&desc.serialize(ctx)?);
        }

        patch_u16_length(
            &mut data,
            2,
            &format!("configuration {}", self.value),
        )?;

        Ok(data)
    }
}

// Table 9-12 of USB2.0 Spec
#[derive(Clone, Debug)]
pub struct InterfaceDescriptor {
    pub number: u8,
    pub alternate_setting: u8,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub description: Option<String>,

    /// Only the number of endpoints is part of the interface's own record.
    pub endpoints: Vec<EndpointDescriptor>,
}

impl InterfaceDescriptor {
    pub const LENGTH: usize = 9;

    pub fn new(number: u8, class: u8, subclass: u8, protocol: u8) -> Self {
        Self {
            number,
            alternate_setting: 0,
            class,
            subclass,
            protocol,
            description: None,
            endpoints: vec![],
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointDescriptor) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    pub fn serialize(&self, strings: &mut StringTable) -> Result<Vec<u8>> {
        let num_endpoints = checked_u8_length(self.endpoints.len(), "endpoint list")?;
        let description_idx = strings.define(self.description.as_deref())?;

        let mut data = vec![
            0,
            DescriptorType::INTERFACE.to_value(),
            self.number,
            self.alternate_setting,
            num_endpoints,
            self.class,
            self.subclass,
            self.protocol,
            description_idx,
        ];
        patch_u8_length(&mut data, 0, "interface descriptor")?;
        Ok(data)
    }
}

// Table 9-13 of USB2.0 Spec
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointDescriptor {
    pub address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl EndpointDescriptor {
    pub const LENGTH: usize = 7;

    pub fn new(address: u8, attributes: u8, max_packet_size: u16, interval: u8) -> Self {
        Self {
            address,
            attributes,
            max_packet_size,
            interval,
        }
    }

    /// Interrupt IN endpoint as used by HID devices to send reports.
    pub fn interrupt_in(number: u8, max_packet_size: u16, interval: u8) -> Self {
        Self::new(
            ENDPOINT_DIRECTION_IN | (number & 0x0f),
            TransferType::Interrupt.to_value(),
            max_packet_size,
            interval,
        )
    }

    pub fn transfer_type(&self) -> TransferType {
        TransferType::from_value(self.attributes)
    }

    pub fn is_in(&self) -> bool {
        is_in_endpoint(self.address)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut data = vec![0, DescriptorType::ENDPOINT.to_value(), self.address, self.attributes];
        data.extend_from_slice(&self.max_packet_size.to_le_bytes());
        data.push(self.interval);
        patch_u8_length(&mut data, 0, "endpoint descriptor")?;
        Ok(data)
    }
}
