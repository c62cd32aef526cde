extern crate common;
extern crate usb;

use common::errors::*;
use usb::descriptors::*;
use usb::hid::report_descriptors::*;
use usb::DescriptorTableBuilder;

const DEBUG_INTERFACE: u8 = 0;
const DEBUG_ENDPOINT: u8 = 3;
const DEBUG_SIZE: u8 = 32;

fn gen_config() -> Result<DescriptorTableBuilder> {
    let mut config = DescriptorTableBuilder::with_endpoint0_size(0x16c0, 0x03f1, DEFAULT_ENDPOINT0_SIZE);
    {
        let device = config.device_mut();
        device.manufacturer = Some("Simpkins".into());
        device.product = Some("EEPROM Controller".into());
        device.serial_number = Some("EC-0001".into());
    }

    config.define_constants(vec![
        ("DEBUG_INTERFACE", DEBUG_INTERFACE),
        ("DEBUG_ENDPOINT", DEBUG_ENDPOINT),
        ("DEBUG_SIZE", DEBUG_SIZE),
    ])?;

    let dbg_iface = InterfaceDescriptor::new(DEBUG_INTERFACE, InterfaceClass::HID.to_value(), 0, 0)
        .with_endpoint(EndpointDescriptor::interrupt_in(DEBUG_ENDPOINT, DEBUG_SIZE as u16, 1));

    config.add_hid_interface(0, dbg_iface, debug_report_descriptor(DEBUG_SIZE), "debug_hid_report_desc")?;

    Ok(config)
}

fn main() -> Result<()> {
    usb::cli::run(gen_config)
}
