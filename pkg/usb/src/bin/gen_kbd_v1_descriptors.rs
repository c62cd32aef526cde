extern crate common;
extern crate usb;

use common::errors::*;
use usb::descriptors::*;
use usb::hid::report_descriptors::*;
use usb::hid::*;
use usb::DescriptorTableBuilder;

const KEYBOARD_INTERFACE: u8 = 0;
const KEYBOARD_ENDPOINT: u8 = 1;
const KEYBOARD_SIZE: u8 = BOOT_KEYBOARD_REPORT_SIZE;
const DEBUG_INTERFACE: u8 = 1;
const DEBUG_ENDPOINT: u8 = 2;
const DEBUG_SIZE: u8 = 32;

/// The v1 matrix reports key codes past the boot protocol's usual range.
const MAX_KEY_CODE: u8 = 0x91;

fn gen_config() -> Result<DescriptorTableBuilder> {
    let mut config = DescriptorTableBuilder::with_endpoint0_size(0x16c0, 0x03f1, DEFAULT_ENDPOINT0_SIZE);
    {
        let device = config.device_mut();
        device.manufacturer = Some("Simpkins".into());
        device.product = Some("Keyboard v1".into());
        device.serial_number = Some("KBD1-0001".into());
    }

    config.define_constants(vec![
        ("KEYBOARD_INTERFACE", KEYBOARD_INTERFACE),
        ("KEYBOARD_ENDPOINT", KEYBOARD_ENDPOINT),
        ("KEYBOARD_SIZE", KEYBOARD_SIZE),
    ])?;

    let kbd_iface = InterfaceDescriptor::new(
        KEYBOARD_INTERFACE,
        InterfaceClass::HID.to_value(),
        HIDInterfaceSubClass::Boot.to_value(),
        HIDInterfaceBootProtocol::Keyboard.to_value(),
    )
    .with_endpoint(EndpointDescriptor::interrupt_in(KEYBOARD_ENDPOINT, KEYBOARD_SIZE as u16, 10));

    config.add_hid_interface(
        0,
        kbd_iface,
        keyboard_report_descriptor(MAX_KEY_CODE),
        "keyboard_hid_report_desc",
    )?;

    // Debug interface streaming log output to the host.
    config.define_constants(vec![
        ("DEBUG_INTERFACE", DEBUG_INTERFACE),
        ("DEBUG_ENDPOINT", DEBUG_ENDPOINT),
        ("DEBUG_SIZE", DEBUG_SIZE),
        ("USB_DEBUG", 1),
    ])?;

    let dbg_iface = InterfaceDescriptor::new(DEBUG_INTERFACE, InterfaceClass::HID.to_value(), 0, 0)
        .with_endpoint(EndpointDescriptor::interrupt_in(DEBUG_ENDPOINT, DEBUG_SIZE as u16, 1));

    config.add_hid_interface(
        0,
        dbg_iface,
        debug_report_descriptor_with_feature(DEBUG_SIZE),
        "debug_hid_report_desc",
    )?;

    Ok(config)
}

fn main() -> Result<()> {
    usb::cli::run(gen_config)
}
