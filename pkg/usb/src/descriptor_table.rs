use std::fmt::Display;
use std::path::Path;

use common::errors::*;

use crate::atomic_file::write_files_atomically;
use crate::codegen;
use crate::constant_table::ConstantTable;
use crate::descriptor::{Descriptor, SerializeContext};
use crate::descriptor_iter::DescriptorIter;
use crate::descriptors::*;
use crate::encoding::checked_u8_length;
use crate::error::{Error, ErrorKind};
use crate::hid::{HIDDescriptor, HIDReportDescriptor, HID_REPORT_DESCRIPTOR_VALUE};
use crate::language::SUPPORTED_LANGUAGES;
use crate::string_table::StringTable;

/// Name of the constant holding the device's endpoint 0 packet size. It is
/// always the first constant in the generated header.
pub const ENDPOINT0_SIZE_CONSTANT: &str = "ENDPOINT0_SIZE";

pub const DEVICE_DESCRIPTOR_VALUE: u16 = (DescriptorType::DEVICE as u16) << 8;
pub const CONFIG_DESCRIPTOR_VALUE: u16 = (DescriptorType::CONFIGURATION as u16) << 8;
pub const STRING_DESCRIPTOR_VALUE: u16 = (DescriptorType::STRING as u16) << 8;

/// Descriptor served outside of the device and configuration descriptors
/// (e.g. HID report descriptors) along with the GET_DESCRIPTOR request that
/// retrieves it.
#[derive(Clone, Debug)]
pub struct DescriptorInfo {
    pub desc: Descriptor,
    pub name: String,
    pub value: u16,
    pub index: u16,
}

/// Collects everything a device reports about itself over the control
/// endpoint and compiles it into the table used by the firmware to answer
/// GET_DESCRIPTOR requests.
pub struct DescriptorTableBuilder {
    device: DeviceDescriptor,
    configs: Vec<ConfigurationDescriptor>,
    other_descriptors: Vec<DescriptorInfo>,
    strings: StringTable,
    constants: ConstantTable,
}

impl DescriptorTableBuilder {
    /// Creates a device with a single configuration numbered 1.
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            device: DeviceDescriptor::new(vendor_id, product_id),
            configs: vec![ConfigurationDescriptor::new(1)],
            other_descriptors: vec![],
            strings: StringTable::new(),
            constants: ConstantTable::new(),
        }
    }

    pub fn with_endpoint0_size(vendor_id: u16, product_id: u16, endpoint0_size: u8) -> Self {
        let mut inst = Self::new(vendor_id, product_id);
        inst.device.max_packet_size0 = endpoint0_size;
        inst
    }

    pub fn device(&self) -> &DeviceDescriptor {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut DeviceDescriptor {
        &mut self.device
    }

    pub fn configs(&self) -> &[ConfigurationDescriptor] {
        &self.configs
    }

    pub fn configs_mut(&mut self) -> &mut Vec<ConfigurationDescriptor> {
        &mut self.configs
    }

    pub fn config_mut(&mut self, index: usize) -> Result<&mut ConfigurationDescriptor> {
        self.configs.get_mut(index).ok_or_else(|| {
            Error::new(
                ErrorKind::MissingConfiguration,
                format!("No configuration at position {}", index),
            )
            .into()
        })
    }

    pub fn add_config(&mut self, config: ConfigurationDescriptor) -> &mut ConfigurationDescriptor {
        self.configs.push(config);
        let idx = self.configs.len() - 1;
        &mut self.configs[idx]
    }

    pub fn other_descriptors(&self) -> &[DescriptorInfo] {
        &self.other_descriptors
    }

    /// Binds a descriptor to the (wValue, wIndex) of the GET_DESCRIPTOR
    /// request that should return it. `name` is the symbol used for its data
    /// in the generated source.
    pub fn add_descriptor<D: Into<Descriptor>>(
        &mut self,
        desc: D,
        name: &str,
        value: u16,
        index: u16,
    ) -> &mut Self {
        self.other_descriptors.push(DescriptorInfo {
            desc: desc.into(),
            name: name.to_string(),
            value,
            index,
        });
        self
    }

    /// Adds a HID interface to a configuration.
    ///
    /// The interface is followed by its HID descriptor and endpoints and the
    /// report descriptor is made retrievable by the host under `report_name`.
    pub fn add_hid_interface(
        &mut self,
        config_index: usize,
        iface: InterfaceDescriptor,
        report: HIDReportDescriptor,
        report_name: &str,
    ) -> Result<&mut Self> {
        let number = iface.number;
        let hid = HIDDescriptor::new(vec![report.clone().into()]);

        self.config_mut(config_index)?
            .add_interface(iface, vec![Descriptor::HID(hid)]);
        self.add_descriptor(report, report_name, HID_REPORT_DESCRIPTOR_VALUE, number as u16);
        Ok(self)
    }

    /// Reserves an index for a string ahead of time.
    ///
    /// Strings referenced by descriptors are otherwise defined as they are
    /// serialized.
    pub fn define_string(&mut self, value: Option<&str>) -> Result<u8> {
        self.strings.define(value)
    }

    pub fn define_constant<V: Display>(&mut self, name: &str, value: V) -> Result<()> {
        if name == ENDPOINT0_SIZE_CONSTANT {
            return Err(Error::new(
                ErrorKind::DuplicateConstant,
                format!("constant \"{}\" already exists", name),
            )
            .into());
        }

        self.constants.define(name, value)
    }

    pub fn define_constants<'a, V: Display, I: IntoIterator<Item = (&'a str, V)>>(
        &mut self,
        constants: I,
    ) -> Result<()> {
        for (name, value) in constants {
            self.define_constant(name, value)?;
        }

        Ok(())
    }

    /// Serializes all descriptors.
    ///
    /// Nothing is written anywhere so a failure leaves no trace other than
    /// the strings that were defined up to that point.
    pub fn compile(&mut self) -> Result<CompiledTable> {
        if self.configs.is_empty() {
            return Err(Error::new(
                ErrorKind::MissingConfiguration,
                "A device needs at least one configuration",
            )
            .into());
        }

        let mut constants = vec![(
            ENDPOINT0_SIZE_CONSTANT.to_string(),
            self.device.max_packet_size0.to_string(),
        )];
        constants.extend(
            self.constants
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string())),
        );

        let mut entries = vec![];
        let num_configurations = self.configs.len();

        {
            let mut ctx = SerializeContext::new(&mut self.strings, num_configurations);

            entries.push(TableEntry::new(
                "device_descriptor",
                DEVICE_DESCRIPTOR_VALUE,
                0,
                Descriptor::Device(self.device.clone()).serialize(&mut ctx)?,
            ));

            for (i, config) in self.configs.iter().enumerate() {
                let data = config.serialize(&mut ctx)?;
                check_framing(&data, i + 1)?;

                entries.push(TableEntry::new(
                    &format!("config{}_descriptor", i + 1),
                    CONFIG_DESCRIPTOR_VALUE | (i as u16),
                    0,
                    data,
                ));
            }

            for info in &self.other_descriptors {
                entries.push(TableEntry::new(
                    &info.name,
                    info.value,
                    info.index,
                    info.desc.serialize(&mut ctx)?,
                ));
            }
        }

        entries.push(TableEntry::new(
            "language_ids",
            STRING_DESCRIPTOR_VALUE,
            0,
            language_ids_descriptor()?,
        ));

        // Every string has been referenced by now.
        for (i, s) in self.strings.strings().iter().enumerate() {
            let idx = (i + 1) as u16;
            let mut entry = TableEntry::new(
                &format!("string_{}", idx),
                STRING_DESCRIPTOR_VALUE | idx,
                SUPPORTED_LANGUAGES[0],
                string_descriptor(s)?,
            );
            entry.comment = Some(format!("{:?}", s));
            entries.push(entry);
        }

        for entry in &entries {
            // The firmware's table stores lengths in a single byte.
            checked_u8_length(entry.data.len(), &entry.name)?;
            debug!(
                "{}: {:#06x}/{:#06x} ({} bytes)",
                entry.name,
                entry.value,
                entry.index,
                entry.data.len()
            );
        }

        Ok(CompiledTable { constants, entries })
    }

    /// Compiles the table and writes the generated source and header.
    ///
    /// Either both files are replaced or neither is.
    pub fn write<P: AsRef<Path>, H: AsRef<Path>>(&mut self, source_path: P, header_path: H) -> Result<()> {
        let table = self.compile()?;

        let source = codegen::render_source(&table);
        let header = codegen::render_header(&table);

        write_files_atomically(&[
            (source_path.as_ref(), source.as_str()),
            (header_path.as_ref(), header.as_str()),
        ])?;

        info!(
            "Wrote {} descriptors to {}",
            table.entries.len(),
            source_path.as_ref().display()
        );

        Ok(())
    }
}

/// Re-parses a configuration blob to verify that every child reports a
/// length consistent with the total.
fn check_framing(data: &[u8], config_number: usize) -> Result<()> {
    for desc in DescriptorIter::new(data) {
        let desc = desc?;
        trace!(
            "config{}: type {:#04x}, {} bytes",
            config_number,
            desc.descriptor_type,
            desc.data.len()
        );
    }

    Ok(())
}

/// String descriptor zero, listing the supported language IDs.
fn language_ids_descriptor() -> Result<Vec<u8>> {
    let mut data = vec![0, DescriptorType::STRING.to_value()];
    for lang in SUPPORTED_LANGUAGES {
        data.extend_from_slice(&lang.to_le_bytes());
    }

    data[0] = checked_u8_length(data.len(), "language ID list")?;
    Ok(data)
}

// Table 9-16 of USB2.0 Spec
fn string_descriptor(value: &str) -> Result<Vec<u8>> {
    let mut data = vec![0, DescriptorType::STRING.to_value()];
    for unit in value.encode_utf16() {
        data.extend_from_slice(&unit.to_le_bytes());
    }

    data[0] = checked_u8_length(data.len(), &format!("string {:?}", value))?;
    Ok(data)
}

/// One row of the firmware's descriptor table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableEntry {
    /// Symbol of the byte array holding the descriptor.
    pub name: String,
    pub value: u16,
    pub index: u16,
    pub data: Vec<u8>,

    /// Emitted above the byte array.
    pub comment: Option<String>,
}

impl TableEntry {
    fn new(name: &str, value: u16, index: u16, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            value,
            index,
            data,
            comment: None,
        }
    }
}

/// Output of DescriptorTableBuilder::compile() in the order it is emitted.
#[derive(Clone, Debug)]
pub struct CompiledTable {
    pub constants: Vec<(String, String)>,
    pub entries: Vec<TableEntry>,
}

impl CompiledTable {
    /// Looks up the descriptor returned for a GET_DESCRIPTOR request the same
    /// way the firmware does: first exact match wins.
    pub fn find(&self, value: u16, index: u16) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.value == value && e.index == index)
            .map(|e| e.data.as_slice())
    }

    pub fn entry(&self, name: &str) -> Option<&TableEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Version;
    use crate::hid::report_descriptors::*;
    use crate::hid::{HIDInterfaceBootProtocol, HIDInterfaceSubClass};
    use crate::language::LANG_ENGLISH_US;

    fn error_kind(e: &common::errors::Error) -> ErrorKind {
        e.downcast_ref::<Error>().unwrap().kind
    }

    fn acme_device() -> DescriptorTableBuilder {
        let mut builder = DescriptorTableBuilder::new(0x16c0, 0x03f1);
        builder.device_mut().manufacturer = Some("Acme".into());

        let endpoint = EndpointDescriptor::new(0x81, 0x03, 8, 10);
        let iface = InterfaceDescriptor::new(0, InterfaceClass::HID.to_value(), 0, 0)
            .with_endpoint(endpoint.clone());

        builder
            .config_mut(0)
            .unwrap()
            .add_descriptor(iface)
            .add_descriptor(endpoint);

        builder
    }

    #[test]
    fn compiles_minimal_hid_device() {
        let mut builder = acme_device();
        let table = builder.compile().unwrap();

        let config = table.entry("config1_descriptor").unwrap();
        assert_eq!(config.data.len(), 25);
        assert_eq!(u16::from_le_bytes([config.data[2], config.data[3]]), 25);
        assert_eq!(config.data[4], 1);

        let keys: Vec<(u16, u16)> = table.entries.iter().map(|e| (e.value, e.index)).collect();
        assert_eq!(
            keys,
            vec![
                (0x0100, 0),
                (0x0200, 0),
                (0x0300, 0),
                (0x0301, LANG_ENGLISH_US)
            ]
        );

        let device = table.find(0x0100, 0).unwrap();
        assert_eq!(device.len(), 18);
        assert_eq!(&device[8..12], &[0xc0, 0x16, 0xf1, 0x03]);
        assert_eq!(device[14], 1);
        assert_eq!(device[17], 1);

        assert_eq!(table.find(0x0300, 0).unwrap(), &[4, 3, 0x09, 0x04]);
        assert_eq!(
            table.find(0x0301, 0x0409).unwrap(),
            &[10, 3, b'A', 0, b'c', 0, b'm', 0, b'e', 0]
        );
        assert_eq!(table.find(0x0301, 0), None);
        assert_eq!(table.find(0x2200, 0), None);

        assert_eq!(
            table.constants,
            vec![("ENDPOINT0_SIZE".to_string(), "32".to_string())]
        );
    }

    #[test]
    fn strings_are_shared_between_descriptors() {
        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.device_mut().manufacturer = Some("Same".into());
        builder.device_mut().product = Some("Same".into());
        builder.device_mut().serial_number = Some("Other".into());

        let mut iface = InterfaceDescriptor::new(0, 0xff, 0, 0);
        iface.description = Some("Other".into());
        builder.config_mut(0).unwrap().add_descriptor(iface);

        let table = builder.compile().unwrap();
        let device = table.find(0x0100, 0).unwrap();
        assert_eq!(&device[14..17], &[1, 1, 2]);

        let config = table.find(0x0200, 0).unwrap();
        assert_eq!(config[9 + 8], 2);

        assert!(table.find(0x0302, LANG_ENGLISH_US).is_some());
        assert!(table.find(0x0303, LANG_ENGLISH_US).is_none());

        // Compiling again hands out the same indices.
        let again = builder.compile().unwrap();
        assert_eq!(again.entries, table.entries);
    }

    #[test]
    fn configurations_are_keyed_by_position() {
        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.add_config(ConfigurationDescriptor::new(2)).attributes |= CONFIG_ATTR_SELF_POWERED;

        let table = builder.compile().unwrap();
        assert_eq!(table.find(0x0100, 0).unwrap()[17], 2);
        assert_eq!(table.find(0x0200, 0).unwrap()[5], 1);

        let second = table.entry("config2_descriptor").unwrap();
        assert_eq!(second.value, 0x0201);
        assert_eq!(second.data[5], 2);
        assert_eq!(second.data[7], 0xc0);
    }

    #[test]
    fn hid_interfaces_expose_report_descriptors() {
        let mut builder = DescriptorTableBuilder::new(0x16c0, 0x03f1);

        let kbd = InterfaceDescriptor::new(
            0,
            InterfaceClass::HID.to_value(),
            HIDInterfaceSubClass::Boot.to_value(),
            HIDInterfaceBootProtocol::Keyboard.to_value(),
        )
        .with_endpoint(EndpointDescriptor::interrupt_in(3, 8, 1));
        let dbg = InterfaceDescriptor::new(1, InterfaceClass::HID.to_value(), 0, 0)
            .with_endpoint(EndpointDescriptor::interrupt_in(4, 32, 1));

        builder
            .add_hid_interface(0, kbd, boot_keyboard_report_descriptor(), "keyboard_hid_report_desc")
            .unwrap()
            .add_hid_interface(0, dbg, debug_report_descriptor(32), "debug_hid_report_desc")
            .unwrap();

        let table = builder.compile().unwrap();

        let names: Vec<&str> = table.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "device_descriptor",
                "config1_descriptor",
                "keyboard_hid_report_desc",
                "debug_hid_report_desc",
                "language_ids",
            ]
        );

        let config = table.find(0x0200, 0).unwrap();
        assert_eq!(config.len(), 9 + 2 * (9 + 9 + 7));
        assert_eq!(config[4], 2);

        // The HID descriptor follows the first interface and lists the report
        // descriptor's length.
        assert_eq!(&config[18..27], &[9, 0x21, 0x11, 0x01, 0, 1, 0x22, 63, 0]);

        assert_eq!(table.find(0x2200, 0).unwrap().len(), 63);
        assert_eq!(table.find(0x2200, 1).unwrap().len(), 21);
    }

    #[test]
    fn first_matching_row_wins() {
        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder
            .add_descriptor(HIDReportDescriptor::new(vec![1]), "first", 0x2200, 0)
            .add_descriptor(HIDReportDescriptor::new(vec![2]), "second", 0x2200, 0);

        let table = builder.compile().unwrap();
        assert_eq!(table.find(0x2200, 0).unwrap(), &[1]);
    }

    #[test]
    fn constants_follow_endpoint0_size() {
        let mut builder = DescriptorTableBuilder::with_endpoint0_size(1, 2, 64);
        builder
            .define_constants(vec![("KEYBOARD_INTERFACE", 0), ("KEYBOARD_ENDPOINT", 3)])
            .unwrap();

        let err = builder.define_constant("ENDPOINT0_SIZE", 8).unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::DuplicateConstant);

        let err = builder.define_constant("KEYBOARD_ENDPOINT", 4).unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::DuplicateConstant);

        let table = builder.compile().unwrap();
        let names: Vec<&str> = table.constants.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ENDPOINT0_SIZE", "KEYBOARD_INTERFACE", "KEYBOARD_ENDPOINT"]);
        assert_eq!(table.constants[0].1, "64");
        assert_eq!(table.find(0x0100, 0).unwrap()[7], 64);
    }

    #[test]
    fn missing_configuration_is_rejected() {
        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.configs_mut().clear();

        let err = builder.compile().unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::MissingConfiguration);

        let err = builder.config_mut(0).unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::MissingConfiguration);
    }

    #[test]
    fn oversized_entries_are_rejected() {
        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.add_descriptor(HIDReportDescriptor::new(vec![0; 256]), "big", 0x2200, 0);
        let err = builder.compile().unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::LengthOverflow);

        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.device_mut().product = Some("x".repeat(127));
        let err = builder.compile().unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::LengthOverflow);

        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.device_mut().product = Some("x".repeat(126));
        assert!(builder.compile().is_ok());
    }

    #[test]
    fn invalid_versions_are_rejected() {
        let mut builder = DescriptorTableBuilder::new(1, 2);
        builder.device_mut().device_version = Version::new(1, 100);
        let err = builder.compile().unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::InvalidVersion);
    }
}
