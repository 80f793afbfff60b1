//! Text panel with the station and the derived quantities.
use super::left_top;
use crate::{analysis::Analysis, error::Result};
use plotters::{coord::Shift, prelude::*};

/// The lines of text in the panel, labels padded so the values line up.
pub fn panel_lines(anal: &Analysis) -> Vec<String> {
    anal.panel_entries()
        .into_iter()
        .map(|entry| format!("{:<22}{}", entry.label, entry.value))
        .collect()
}

pub(super) fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    anal: &Analysis,
) -> Result<()> {
    let (_, height) = area.dim_in_pixel();
    let lines = panel_lines(anal);
    let line_height = (height.saturating_sub(40) / (lines.len() as u32 + 1)).clamp(12, 26) as i32;

    let style = ("monospace", f64::from(line_height) * 0.75)
        .into_font()
        .color(&BLACK)
        .pos(left_top());

    for (i, line) in lines.into_iter().enumerate() {
        area.draw(&Text::new(
            line,
            (25, 20 + i as i32 * line_height),
            style.clone(),
        ))?;
    }

    Ok(())
}
