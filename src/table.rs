use crate::constants::CRITICAL_LABELS;
use crate::engine::RunView;
use crate::model::RevealItem;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

pub fn is_critical(label: &str) -> bool {
    CRITICAL_LABELS.contains(&label)
}

/// Summary grid of every revealed row, grouped by section
///
/// Critical labels are flagged only once the run has completed.
pub fn diagnostics_table(view: &RunView) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(vec!["Section", "Field", "Value"]);

    let mut section = "";
    for item in &view.items {
        match item {
            RevealItem::Heading { .. } if item.is_divider() => {}
            RevealItem::Heading { text } => section = text.as_str(),
            RevealItem::Kv { label, value, .. } => {
                let highlight = view.complete && is_critical(label);
                let mut label_cell = Cell::new(label);
                let mut value_cell = Cell::new(value);
                if highlight {
                    label_cell = label_cell.fg(Color::Red).add_attribute(Attribute::Bold);
                    value_cell = value_cell.fg(Color::Red);
                }
                table.add_row(vec![Cell::new(section), label_cell, value_cell]);
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RunId;

    #[test]
    fn rows_are_grouped_under_their_heading() {
        let view = RunView {
            run: RunId(1),
            items: vec![
                RevealItem::heading("Network"),
                RevealItem::kv("IP", "198.51.100.7").unwrap(),
                RevealItem::divider(),
                RevealItem::kv("City", "Lisbon").unwrap(),
            ],
            complete: true,
        };
        let table = diagnostics_table(&view);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("198.51.100.7"));
        assert!(rendered.contains("Lisbon"));
    }

    #[test]
    fn critical_labels() {
        assert!(is_critical("IP"));
        assert!(is_critical("Battery"));
        assert!(!is_critical("City"));
    }
}
