//! Reusable widgets
//!
//! Each component keeps only its own UI state; the data it shows is passed
//! in by the caller on every render and interaction.

pub mod data_table;
pub mod input_field;

pub use data_table::{Column, DataTable};
pub use input_field::{InputField, InputType, Size, Variant};

/// Flatten a rendered buffer into lines of text
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
