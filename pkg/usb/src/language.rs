// USB language codes
// The full list of USB language ID codes is available at
// http://www.usb.org/developers/docs/USB_LANGIDs.pdf

pub const LANG_ENGLISH_US: u16 = 0x0409;

/// Languages in which a device's strings are offered. Strings are only
/// written in US English for now.
pub const SUPPORTED_LANGUAGES: &[u16] = &[LANG_ENGLISH_US];
