//! Authoritative records and their construction from a header + rows table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::InputError;

/// One row of the authoritative sheet. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritativeRecord {
    /// Sheet row number; the header occupies row 1.
    pub row: usize,
    pub brand: String,
    pub model: String,
    pub variant: String,
    pub price: String,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

impl AuthoritativeRecord {
    /// Human-readable label: brand, model and variant joined by spaces.
    #[must_use]
    pub fn label(&self) -> String {
        [&self.brand, &self.model, &self.variant]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Spec-field key for a column header: lowercase, runs of non-alphanumerics
/// collapsed to a single `_`, no leading or trailing `_`.
///
/// `"Battery Size (kWh)"` becomes `"battery_size_kwh"`.
#[must_use]
pub fn field_key(header: &str) -> String {
    header
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Brand,
    Model,
    Variant,
    Price,
    Spec(usize),
}

fn classify_header(idx: usize, header: &str) -> Column {
    match header.trim().to_lowercase().as_str() {
        "brand" => Column::Brand,
        "model" => Column::Model,
        "variant" => Column::Variant,
        "price" => Column::Price,
        _ => Column::Spec(idx),
    }
}

/// Build records from a table. `Brand`/`Model`/`Variant`/`Price` headers are
/// matched case-insensitively; every other non-blank header becomes a spec
/// field keyed by [`field_key`]. Rows with neither brand nor model are
/// skipped, as are blank spec cells.
///
/// # Errors
///
/// - [`InputError::MissingHeader`]: `headers` is empty.
/// - [`InputError::MissingColumn`]: no `Brand` or no `Model` column.
/// - [`InputError::Empty`]: no row produced a record.
pub fn records_from_table(
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Vec<AuthoritativeRecord>, InputError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(InputError::MissingHeader);
    }

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| classify_header(idx, h))
        .collect();

    if !columns.contains(&Column::Brand) {
        return Err(InputError::MissingColumn("Brand"));
    }
    if !columns.contains(&Column::Model) {
        return Err(InputError::MissingColumn("Model"));
    }

    let spec_keys: BTreeMap<usize, String> = columns
        .iter()
        .filter_map(|col| match col {
            Column::Spec(idx) => {
                let key = field_key(&headers[*idx]);
                (!key.is_empty()).then_some((*idx, key))
            }
            _ => None,
        })
        .collect();

    let mut records = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).map_or("", |s| s.trim());
        let mut record = AuthoritativeRecord {
            row: row_idx + 2,
            brand: String::new(),
            model: String::new(),
            variant: String::new(),
            price: String::new(),
            specs: BTreeMap::new(),
        };

        for (idx, column) in columns.iter().enumerate() {
            let value = cell(idx);
            match column {
                Column::Brand => value.clone_into(&mut record.brand),
                Column::Model => value.clone_into(&mut record.model),
                Column::Variant => value.clone_into(&mut record.variant),
                Column::Price => value.clone_into(&mut record.price),
                Column::Spec(_) => {
                    if let Some(key) = spec_keys.get(&idx) {
                        if !value.is_empty() {
                            record.specs.insert(key.clone(), value.to_string());
                        }
                    }
                }
            }
        }

        if record.brand.is_empty() && record.model.is_empty() {
            tracing::debug!(row = record.row, "skipping row without brand or model");
            continue;
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn field_key_collapses_separators() {
        assert_eq!(field_key("Battery Size (kWh)"), "battery_size_kwh");
        assert_eq!(field_key("  0-100 km/h "), "0_100_km_h");
        assert_eq!(field_key("Range"), "range");
    }

    #[test]
    fn records_from_table_maps_core_columns_case_insensitively() {
        let headers = strings(&["BRAND", "model", "Variant", "Price", "Battery Size (kWh)"]);
        let rows = vec![strings(&["Tesla", "Model 3", "Long Range", "174,000", "75"])];
        let records = records_from_table(&headers, &rows).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.row, 2);
        assert_eq!(record.brand, "Tesla");
        assert_eq!(record.price, "174,000");
        assert_eq!(record.specs.get("battery_size_kwh").map(String::as_str), Some("75"));
        assert_eq!(record.label(), "Tesla Model 3 Long Range");
    }

    #[test]
    fn records_from_table_skips_blank_rows_and_cells() {
        let headers = strings(&["Brand", "Model", "Range"]);
        let rows = vec![
            strings(&["", "", "500"]),
            strings(&["BYD", "Seal", ""]),
            strings(&["BYD"]),
        ];
        let records = records_from_table(&headers, &rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 3);
        assert!(records[0].specs.is_empty());
        assert_eq!(records[1].row, 4);
        assert_eq!(records[1].model, "");
    }

    #[test]
    fn records_from_table_requires_brand_and_model() {
        let err = records_from_table(&strings(&["Brand", "Price"]), &[]).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn("Model")));
        let err = records_from_table(&strings(&["Model"]), &[]).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn("Brand")));
    }

    #[test]
    fn records_from_table_rejects_empty_input() {
        assert!(matches!(
            records_from_table(&[], &[]),
            Err(InputError::MissingHeader)
        ));
        let headers = strings(&["Brand", "Model"]);
        assert!(matches!(
            records_from_table(&headers, &[]),
            Err(InputError::Empty)
        ));
    }
}
