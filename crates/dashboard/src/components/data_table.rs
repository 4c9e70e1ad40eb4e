//! Data table component types.
//!
//! Column definitions for the orders table and the header links that drive
//! server-side sorting.

use serde::Serialize;

use floresta_core::query::{SortDirection, SortKey, SortState};

/// Column definition for a data table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableColumn {
    /// Sort key behind the column.
    pub key: SortKey,
    /// Display label for the column header.
    pub label: &'static str,
    /// Column width as a percentage of the table.
    pub width: u8,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub const fn new(key: SortKey, label: &'static str, width: u8) -> Self {
        Self { key, label, width }
    }
}

/// A rendered header cell.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderCell {
    pub label: &'static str,
    pub width: u8,
    /// Link that applies the next sort for this column.
    pub href: String,
    /// Whether the table is currently sorted by this column.
    pub active: bool,
    /// Arrow shown next to the active column.
    pub indicator: &'static str,
}

/// The orders table columns, in display order.
#[must_use]
pub const fn orders_table_columns() -> [TableColumn; 7] {
    [
        TableColumn::new(SortKey::Id, "Pedido", 10),
        TableColumn::new(SortKey::Customer, "Cliente", 13),
        TableColumn::new(SortKey::Reservation, "Reserva", 18),
        TableColumn::new(SortKey::Logistics, "Logística", 24),
        TableColumn::new(SortKey::Message, "Mensaje y observaciones", 24),
        TableColumn::new(SortKey::Status, "Estado", 6),
        TableColumn::new(SortKey::Total, "Total", 5),
    ]
}

/// Build header cells for `columns`.
///
/// Each link carries the state that clicking the header produces: the active
/// column flips direction, any other column starts in its default direction.
/// `base_href` already holds the query parameters to preserve and ends in
/// `?` or `&`.
#[must_use]
pub fn header_cells(
    columns: &[TableColumn],
    current: Option<SortState>,
    base_href: &str,
) -> Vec<HeaderCell> {
    columns
        .iter()
        .map(|column| {
            let next = current.map_or_else(
                || SortState::new(column.key),
                |state| state.select(column.key),
            );
            let active = current.is_some_and(|state| state.key == column.key);
            let indicator = match current {
                Some(state) if active => match state.direction {
                    SortDirection::Ascending => "▲",
                    SortDirection::Descending => "▼",
                },
                _ => "",
            };
            HeaderCell {
                label: column.label,
                width: column.width,
                href: format!(
                    "{base_href}sort={}&dir={}",
                    next.key.as_str(),
                    next.direction.as_str()
                ),
                active,
                indicator,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_cover_every_sort_key() {
        let columns = orders_table_columns();
        for key in SortKey::ALL {
            assert!(columns.iter().any(|c| c.key == key));
        }
        assert_eq!(columns.iter().map(|c| u32::from(c.width)).sum::<u32>(), 100);
    }

    #[test]
    fn test_header_links_without_active_sort() {
        let cells = header_cells(&orders_table_columns(), None, "/orders?view=table&");
        assert_eq!(cells[0].href, "/orders?view=table&sort=id&dir=desc");
        assert_eq!(cells[1].href, "/orders?view=table&sort=customer&dir=asc");
        assert!(cells.iter().all(|c| !c.active));
    }

    #[test]
    fn test_header_links_toggle_active_column() {
        let current = SortState::new(SortKey::Total);
        let cells = header_cells(&orders_table_columns(), Some(current), "/orders?");

        let total = cells.iter().find(|c| c.label == "Total").unwrap_or(&cells[0]);
        assert!(total.active);
        assert_eq!(total.indicator, "▼");
        assert_eq!(total.href, "/orders?sort=total&dir=asc");

        let id = cells.iter().find(|c| c.label == "Pedido").unwrap_or(&cells[0]);
        assert!(!id.active);
        assert_eq!(id.href, "/orders?sort=id&dir=desc");
    }
}
