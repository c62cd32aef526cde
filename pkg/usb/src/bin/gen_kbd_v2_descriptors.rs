extern crate common;
extern crate usb;

use common::errors::*;
use usb::descriptors::*;
use usb::hid::report_descriptors::*;
use usb::hid::*;
use usb::DescriptorTableBuilder;

const KEYBOARD_INTERFACE: u8 = 0;
const KEYBOARD_ENDPOINT: u8 = 3;
const KEYBOARD_SIZE: u8 = BOOT_KEYBOARD_REPORT_SIZE;
const DEBUG_INTERFACE: u8 = 1;
const DEBUG_ENDPOINT: u8 = 4;
const DEBUG_SIZE: u8 = 32;

fn gen_config() -> Result<DescriptorTableBuilder> {
    // Vendor ID of voti.nl. Product IDs 0x03e8 through 0x03f1 are free for
    // lab use.
    let mut config = DescriptorTableBuilder::with_endpoint0_size(0x16c0, 0x03f1, DEFAULT_ENDPOINT0_SIZE);
    {
        let device = config.device_mut();
        device.manufacturer = Some("Simpkins".into());
        device.product = Some("Keyboard v2".into());
        device.serial_number = Some("KBD2-0001".into());
    }

    config.define_constants(vec![
        ("KEYBOARD_INTERFACE", KEYBOARD_INTERFACE),
        ("KEYBOARD_ENDPOINT", KEYBOARD_ENDPOINT),
        ("KEYBOARD_SIZE", KEYBOARD_SIZE),
        ("DEBUG_INTERFACE", DEBUG_INTERFACE),
        ("DEBUG_ENDPOINT", DEBUG_ENDPOINT),
        ("DEBUG_SIZE", DEBUG_SIZE),
    ])?;

    let kbd_iface = InterfaceDescriptor::new(
        KEYBOARD_INTERFACE,
        InterfaceClass::HID.to_value(),
        HIDInterfaceSubClass::Boot.to_value(),
        HIDInterfaceBootProtocol::Keyboard.to_value(),
    )
    .with_endpoint(EndpointDescriptor::interrupt_in(KEYBOARD_ENDPOINT, KEYBOARD_SIZE as u16, 1));

    let dbg_iface = InterfaceDescriptor::new(DEBUG_INTERFACE, InterfaceClass::HID.to_value(), 0, 0)
        .with_endpoint(EndpointDescriptor::interrupt_in(DEBUG_ENDPOINT, DEBUG_SIZE as u16, 1));

    config
        .add_hid_interface(0, kbd_iface, boot_keyboard_report_descriptor(), "keyboard_hid_report_desc")?
        .add_hid_interface(0, dbg_iface, debug_report_descriptor(DEBUG_SIZE), "debug_hid_report_desc")?;

    Ok(config)
}

fn main() -> Result<()> {
    usb::cli::run(gen_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_and_debug_interfaces() {
        let table = gen_config().unwrap().compile().unwrap();

        let config = table.find(0x0200, 0).unwrap();
        assert_eq!(config.len(), 59);
        assert_eq!(config[4], 2);
        assert_eq!(&config[27..34], &[7, 5, 0x83, 0x03, 8, 0, 1]);
        assert_eq!(&config[52..59], &[7, 5, 0x84, 0x03, 32, 0, 1]);

        assert_eq!(table.find(0x2200, 0).unwrap().len(), 63);
        assert_eq!(table.find(0x2200, 1).unwrap().len(), 21);
        assert!(table.find(0x0303, 0x0409).is_some());

        let names: Vec<&str> = table.constants.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ENDPOINT0_SIZE",
                "KEYBOARD_INTERFACE",
                "KEYBOARD_ENDPOINT",
                "KEYBOARD_SIZE",
                "DEBUG_INTERFACE",
                "DEBUG_ENDPOINT",
                "DEBUG_SIZE"
            ]
        );
    }
}
