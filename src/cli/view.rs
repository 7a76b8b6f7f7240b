//! Rendering of the swap form.

use super::ui;
use crate::core::amount;
use crate::core::sync::InputPair;
use crate::core::{Quote, Side, TokenPair};
use comfy_table::{Cell, CellAlignment};

/// Renders both sides of the swap with their USD values, the cross rate
/// and the submit state.
pub fn render_swap(pair: &TokenPair, inputs: &InputPair, quotes: &[Quote; 2]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Side"),
        ui::header_cell("Token"),
        ui::header_cell("Amount"),
        ui::header_cell("Value (USD)"),
    ]);

    for side in [Side::From, Side::To] {
        let token = pair.get(side);
        let quote = &quotes[side.index()];
        let raw = inputs.value(side);

        let amount_cell = if raw.is_empty() {
            Cell::new("0").set_alignment(CellAlignment::Right)
        } else {
            Cell::new(raw).set_alignment(CellAlignment::Right)
        };
        let value_cell = match quote {
            Quote::Pending => Cell::new("…").set_alignment(CellAlignment::Right),
            Quote::Failed(_) => ui::na_cell(true),
            Quote::Ready { usd, .. } => {
                ui::format_optional_cell(amount::usd_value(raw, Some(*usd)), |v| v)
            }
        };

        // The side the user typed into; the other one is computed.
        let side_label = if inputs.last_edited() == Some(side) {
            format!("{side} (entered)")
        } else {
            side.to_string()
        };

        table.add_row(vec![
            Cell::new(side_label),
            Cell::new(token.display_symbol()),
            amount_cell,
            value_cell,
        ]);
    }

    let mut output = table.to_string();

    let cross_rate = inputs
        .rates()
        .and_then(|rates| rates.cross_rate())
        .unwrap_or_default();
    output.push_str(&format!(
        "\n1 {} = {} {}",
        pair.to_token().display_symbol(),
        cross_rate,
        pair.from_token().display_symbol()
    ));

    for side in [Side::From, Side::To] {
        match &quotes[side.index()] {
            Quote::Failed(e) => output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "Price unavailable for {}: {}",
                        pair.get(side).display_symbol(),
                        e
                    ),
                    ui::StyleType::Error
                )
            )),
            Quote::Ready { fetched_at, .. } => output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "{} price as of {}",
                        pair.get(side).display_symbol(),
                        fetched_at.format("%H:%M:%S UTC")
                    ),
                    ui::StyleType::Subtle
                )
            )),
            Quote::Pending => {}
        }
    }

    let submit = if inputs.can_submit() {
        ui::style_text("[ Swap ]", ui::StyleType::Highlight)
    } else {
        ui::style_text("[ Enter an amount ]", ui::StyleType::Subtle)
    };
    output.push_str(&format!("\n{submit}"));

    output
}
