//! Audit log
//!
//! Records of who changed what, as kept by the backend. The admin view sorts
//! them by any column and filters them by actor.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer};

use crate::{dates::parse_instant, menu::contains_ignore_case};

/// One audited change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuditRecord {
    /// Record identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// National id of the user who acted.
    #[serde(rename = "usuarioCedula", default)]
    pub actor: String,

    /// When the change happened, as sent by the backend.
    #[serde(rename = "fechaHora", default)]
    pub occurred_at: String,

    /// Action type, e.g. `UPDATE`.
    #[serde(rename = "tipoAccion", default)]
    pub action: String,

    /// Table the change touched.
    #[serde(rename = "nombreTabla", default)]
    pub table: String,

    /// Identifier of the changed row.
    #[serde(rename = "registroId", default, deserialize_with = "string_or_number")]
    pub record_id: String,

    /// Row contents before the change.
    #[serde(rename = "datosAnteriores", default)]
    pub before: serde_json::Value,

    /// Row contents after the change.
    #[serde(rename = "datosNuevos", default)]
    pub after: serde_json::Value,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
        Raw::Null => String::new(),
    })
}

/// Pretty JSON for a before/after payload, `-` when absent.
#[must_use]
pub fn render_payload(value: &serde_json::Value) -> String {
    if value.is_null() {
        return "-".to_string();
    }

    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Sortable audit columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditColumn {
    /// Record id.
    Id,
    /// Acting user.
    Actor,
    /// Time of change.
    OccurredAt,
    /// Action type.
    Action,
    /// Table name.
    Table,
    /// Changed row id.
    RecordId,
}

impl AuditColumn {
    /// Columns in table order.
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Actor,
        Self::OccurredAt,
        Self::Action,
        Self::Table,
        Self::RecordId,
    ];

    /// Column heading.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Actor => "Usuario",
            Self::OccurredAt => "Fecha y hora",
            Self::Action => "Acción",
            Self::Table => "Tabla",
            Self::RecordId => "Registro",
        }
    }

    fn compare(self, a: &AuditRecord, b: &AuditRecord) -> Ordering {
        match self {
            Self::Id => compare_ids(&a.id, &b.id),
            Self::Actor => a.actor.cmp(&b.actor),
            Self::OccurredAt => parse_instant(&a.occurred_at)
                .cmp(&parse_instant(&b.occurred_at))
                .then_with(|| a.occurred_at.cmp(&b.occurred_at)),
            Self::Action => a.action.cmp(&b.action),
            Self::Table => a.table.cmp(&b.table),
            Self::RecordId => compare_ids(&a.record_id, &b.record_id),
        }
    }
}

/// Numeric ids compare by value so "9" sorts before "10".
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Current audit table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSort {
    /// Column sorted on.
    pub column: AuditColumn,
    /// Direction.
    pub direction: SortDirection,
}

impl Default for AuditSort {
    fn default() -> Self {
        Self {
            column: AuditColumn::OccurredAt,
            direction: SortDirection::Descending,
        }
    }
}

impl AuditSort {
    /// Ordering after clicking `column`: ascending on a new column, flipped
    /// to descending on a second click, back to ascending on a third.
    #[must_use]
    pub fn request(self, column: AuditColumn) -> Self {
        let direction = if self.column == column && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        Self { column, direction }
    }

    /// Direction indicator for `column`'s heading, `None` when unsorted.
    #[must_use]
    pub fn indicator(self, column: AuditColumn) -> Option<&'static str> {
        (self.column == column).then_some(match self.direction {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        })
    }

    fn compare(self, a: &AuditRecord, b: &AuditRecord) -> Ordering {
        let ordering = self.column.compare(a, b);

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Records whose actor contains `actor_filter`, ordered by `sort`.
pub fn arrange<'a>(
    records: &'a [AuditRecord],
    sort: AuditSort,
    actor_filter: &str,
) -> Vec<&'a AuditRecord> {
    let mut visible: Vec<&AuditRecord> = records
        .iter()
        .filter(|record| contains_ignore_case(&record.actor, actor_filter))
        .collect();

    visible.sort_by(|a, b| sort.compare(a, b));

    visible
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn records() -> TestResult<Vec<AuditRecord>> {
        Ok(serde_json::from_str(
            r#"[
                { "id": 1, "usuarioCedula": "1712345678", "fechaHora": "2025-03-02T09:00:00Z",
                  "tipoAccion": "UPDATE", "nombreTabla": "pedidos", "registroId": 10,
                  "datosAnteriores": { "estadoPedido": "Pendiente" },
                  "datosNuevos": { "estadoPedido": "Autorizado" } },
                { "id": "2", "usuarioCedula": "0102030405", "fechaHora": "2025-03-03T09:00:00Z",
                  "tipoAccion": "INSERT", "nombreTabla": "platillos", "registroId": "4",
                  "datosAnteriores": null, "datosNuevos": { "nombreItem": "Humita" } },
                { "id": 3, "usuarioCedula": "1712345678", "fechaHora": "2025-03-01T09:00:00Z",
                  "tipoAccion": "DELETE", "nombreTabla": "usuarios", "registroId": null }
            ]"#,
        )?)
    }

    fn ids(records: &[&AuditRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn default_order_is_newest_first() -> TestResult {
        let records = records()?;

        let arranged = arrange(&records, AuditSort::default(), "");

        assert_eq!(ids(&arranged), vec!["2", "1", "3"]);

        Ok(())
    }

    #[test]
    fn clicking_a_column_cycles_direction() {
        let sort = AuditSort::default().request(AuditColumn::Action);

        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(sort.request(AuditColumn::Action).direction, SortDirection::Descending);
        assert_eq!(
            sort.request(AuditColumn::Action)
                .request(AuditColumn::Action)
                .direction,
            SortDirection::Ascending
        );
        assert_eq!(sort.indicator(AuditColumn::Action), Some("▲"));
        assert_eq!(sort.indicator(AuditColumn::Table), None);
    }

    #[test]
    fn sorts_and_filters_together() -> TestResult {
        let records = records()?;
        let sort = AuditSort::default().request(AuditColumn::Table);

        let arranged = arrange(&records, sort, "171234");

        assert_eq!(ids(&arranged), vec!["1", "3"]);

        Ok(())
    }

    #[test]
    fn numeric_ids_sort_by_value() -> TestResult {
        let records: Vec<AuditRecord> = serde_json::from_str(
            r#"[
                { "id": 10, "usuarioCedula": "1712345678", "fechaHora": "2025-03-02T09:00:00Z",
                  "tipoAccion": "UPDATE", "nombreTabla": "pedidos", "registroId": 9 },
                { "id": 9, "usuarioCedula": "1712345678", "fechaHora": "2025-03-01T09:00:00Z",
                  "tipoAccion": "UPDATE", "nombreTabla": "pedidos", "registroId": 10 }
            ]"#,
        )?;

        let by_id = AuditSort {
            column: AuditColumn::Id,
            direction: SortDirection::Ascending,
        };
        let by_record = AuditSort {
            column: AuditColumn::RecordId,
            direction: SortDirection::Ascending,
        };

        assert_eq!(ids(&arrange(&records, by_id, "")), vec!["9", "10"]);
        assert_eq!(ids(&arrange(&records, by_record, "")), vec!["10", "9"]);

        Ok(())
    }

    #[test]
    fn payloads_render_as_pretty_json() -> TestResult {
        let records = records()?;
        let record = records.get(1).ok_or("missing record")?;

        assert_eq!(render_payload(&record.before), "-");
        assert!(render_payload(&record.after).contains("\"nombreItem\": \"Humita\""));
        assert_eq!(records.get(2).map(|record| record.record_id.as_str()), Some(""));

        Ok(())
    }
}
