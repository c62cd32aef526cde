//! Report item streams shared by the devices in this workspace.

use super::HIDReportDescriptor;

/// Size in bytes of the input report described by
/// [boot_keyboard_report_descriptor].
pub const BOOT_KEYBOARD_REPORT_SIZE: u8 = 8;

/// Highest key code reported by [boot_keyboard_report_descriptor].
pub const BOOT_KEYBOARD_MAX_KEY_CODE: u8 = 0x68;

/// Keyboard report following the boot protocol layout from appendix B.1 of
/// the HID 1.11 spec: a modifier byte, a reserved byte and six key codes,
/// plus a 5 bit LED output report.
pub fn boot_keyboard_report_descriptor() -> HIDReportDescriptor {
    keyboard_report_descriptor(BOOT_KEYBOARD_MAX_KEY_CODE)
}

/// Same layout as [boot_keyboard_report_descriptor] but with key codes up to
/// `max_key_code` in the key array.
pub fn keyboard_report_descriptor(max_key_code: u8) -> HIDReportDescriptor {
    HIDReportDescriptor::new(vec![
        0x05, 0x01, // Usage Page (Generic Desktop),
        0x09, 0x06, // Usage (Keyboard),
        0xA1, 0x01, // Collection (Application),
        0x75, 0x01, //   Report Size (1),
        0x95, 0x08, //   Report Count (8),
        0x05, 0x07, //   Usage Page (Key Codes),
        0x19, 0xE0, //   Usage Minimum (224),
        0x29, 0xE7, //   Usage Maximum (231),
        0x15, 0x00, //   Logical Minimum (0),
        0x25, 0x01, //   Logical Maximum (1),
        0x81, 0x02, //   Input (Data, Variable, Absolute), ;Modifier byte
        0x95, 0x01, //   Report Count (1),
        0x75, 0x08, //   Report Size (8),
        0x81, 0x03, //   Input (Constant),                 ;Reserved byte
        0x95, 0x05, //   Report Count (5),
        0x75, 0x01, //   Report Size (1),
        0x05, 0x08, //   Usage Page (LEDs),
        0x19, 0x01, //   Usage Minimum (1),
        0x29, 0x05, //   Usage Maximum (5),
        0x91, 0x02, //   Output (Data, Variable, Absolute), ;LED report
        0x95, 0x01, //   Report Count (1),
        0x75, 0x03, //   Report Size (3),
        0x91, 0x03, //   Output (Constant),                 ;LED report padding
        0x95, 0x06, //   Report Count (6),
        0x75, 0x08, //   Report Size (8),
        0x15, 0x00, //   Logical Minimum (0),
        0x25, max_key_code, //   Logical Maximum
        0x05, 0x07, //   Usage Page (Key Codes),
        0x19, 0x00, //   Usage Minimum (0),
        0x29, max_key_code, //   Usage Maximum
        0x81, 0x00, //   Input (Data, Array),
        0xC0, // End Collection
    ])
}

/// Vendor defined input report used to stream debug log bytes to the host.
///
/// `report_size` is the number of bytes in each report and should match the
/// max packet size of the interface's endpoint.
pub fn debug_report_descriptor(report_size: u8) -> HIDReportDescriptor {
    HIDReportDescriptor::new(vec![
        0x06, 0x31, 0xFF, // Usage Page 0xFF31 (vendor defined)
        0x09, 0x74, // Usage 0x74
        0xA1, 0x53, // Collection 0x53
        0x75, 0x08, //   report size = 8 bits
        0x15, 0x00, //   logical minimum = 0
        0x26, 0xFF, 0x00, //   logical maximum = 255
        0x95, report_size, //   report count
        0x09, 0x75, //   usage
        0x81, 0x02, //   Input (array)
        0xC0, // end collection
    ])
}

/// Debug report that additionally carries a one byte feature report the
/// host can set.
pub fn debug_report_descriptor_with_feature(report_size: u8) -> HIDReportDescriptor {
    HIDReportDescriptor::new(vec![
        0x06, 0x31, 0xFF, // Usage Page 0xFF31 (vendor defined)
        0x09, 0x74, // Usage 0x74
        0xA1, 0x53, // Collection 0x53
        0x75, 0x08, //   Report Size = 8 bits
        0x15, 0x00, //   Logical minimum = 0
        0x26, 0xFF, 0x00, //   Logical maximum = 255
        0x95, report_size, //   Report Count
        0x09, 0x75, //   Local Usage
        0x81, 0x02, //   Input (array)
        0x09, 0x76, //   Local Usage
        0x95, 0x01, //   Report Count = 1
        0xB1, 0x00, //   Feature (variable)
        0xC0, // end collection
    ])
}
