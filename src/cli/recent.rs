use super::ui;
use crate::core::LocalStorage;
use crate::core::recent::RecencyList;
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn render_recent(list: &RecencyList) -> String {
    if list.is_empty() {
        return "No recent tokens yet".to_string();
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
    ]);

    for (i, token) in list.iter().enumerate() {
        if token.is_placeholder() {
            continue;
        }
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(token.display_symbol()),
            Cell::new(&token.name),
        ]);
    }

    table.to_string()
}

pub fn run(storage: &dyn LocalStorage, clear: bool) -> Result<()> {
    if clear {
        RecencyList::forget(storage).context("Failed to clear recent tokens")?;
        println!("Cleared recent tokens");
        return Ok(());
    }

    println!("{}", render_recent(&RecencyList::load(storage)));
    Ok(())
}
