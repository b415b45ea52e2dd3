use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::reading::{ReadingSet, Value};

pub fn build_readings_table(readings: &ReadingSet) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Reading", "Value", "Unit"]);
    for reading in readings {
        let value = match &reading.value {
            Value::Text(text) if text.is_empty() => Cell::new("-").add_attribute(Attribute::Dim),
            Value::Number(number) if *number < 0.0 => {
                Cell::new(number).set_alignment(CellAlignment::Right).fg(Color::Red)
            }
            Value::Number(_) | Value::Count(_) => {
                Cell::new(&reading.value).set_alignment(CellAlignment::Right)
            }
            Value::Text(_) | Value::Date(_) => Cell::new(&reading.value),
        };
        table.add_row(vec![
            Cell::new(&reading.key),
            value,
            Cell::new(reading.unit.map_or_else(String::new, |unit| unit.to_string())).add_attribute(Attribute::Dim),
        ]);
    }
    table
}
