//! Renders a CompiledTable as the C++ source and header linked into the
//! firmware. The table rows are `UsbDescriptor` structs as declared by
//! `avrpp/usb_descriptors.h`.

use common::line_builder::LineBuilder;

use crate::descriptor_table::CompiledTable;

const TABLE_SYMBOL: &str = "usb_descriptors";

const BYTES_PER_LINE: usize = 8;

pub fn render_header(table: &CompiledTable) -> String {
    let mut lines = LineBuilder::new();
    lines.add("#pragma once");
    lines.nl();
    lines.add("#include <avrpp/progmem.h>");
    lines.nl();
    lines.add("class UsbDescriptor;");
    lines.add(format!("extern const UsbDescriptor PROGMEM {}[];", TABLE_SYMBOL));

    if !table.constants.is_empty() {
        lines.nl();
    }
    for (name, value) in &table.constants {
        lines.add(format!("#define {} ({})", name, value));
    }

    lines.to_string()
}

pub fn render_source(table: &CompiledTable) -> String {
    let mut lines = LineBuilder::new();
    lines.add("#include <avrpp/progmem.h>");
    lines.add("#include <avrpp/usb_descriptors.h>");
    lines.add("#include <stdint.h>");
    lines.nl();
    lines.add(format!("extern const UsbDescriptor PROGMEM {}[];", TABLE_SYMBOL));

    for entry in &table.entries {
        lines.nl();
        if let Some(comment) = &entry.comment {
            lines.add(format!("// {}", comment));
        }
        lines.append(byte_array(&entry.name, &entry.data));
    }

    lines.nl();
    lines.add(format!("const UsbDescriptor PROGMEM {}[] = {{", TABLE_SYMBOL));
    lines.indented(|rows| {
        for entry in &table.entries {
            let mut row = LineBuilder::new();
            row.add(format!("{:#06x}, {:#06x},", entry.value, entry.index));
            row.add(format!("{}, sizeof({}),", entry.name, entry.name));
            row.indent();
            row.wrap_with("{", "},");
            rows.append(row);
        }

        rows.add("{ 0, 0, nullptr, 0 }");
    });
    lines.add("};");

    lines.to_string()
}

fn byte_array(name: &str, data: &[u8]) -> LineBuilder {
    let mut lines = LineBuilder::new();
    for chunk in data.chunks(BYTES_PER_LINE) {
        let values = chunk
            .iter()
            .map(|b| format!("{:#04x}", b))
            .collect::<Vec<_>>()
            .join(", ");
        lines.add(format!("{},", values));
    }

    lines.indent();
    lines.wrap_with(
        format!("static const uint8_t PROGMEM {}[{}] = {{", name, data.len()),
        "};",
    );
    lines
}
