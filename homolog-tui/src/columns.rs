//! Grid column descriptors.

use homolog_core::{FieldKind, RecordField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: RecordField,
    pub header: &'static str,
    /// Width in terminal cells.
    pub width: u16,
}

impl ColumnDef {
    const fn new(field: RecordField, header: &'static str, width: u16) -> Self {
        Self {
            field,
            header,
            width,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.field.kind() == FieldKind::Number
    }
}

pub const HOMOLOG_COLUMNS: [ColumnDef; 19] = [
    ColumnDef::new(RecordField::Id, "ID", 20),
    ColumnDef::new(RecordField::QueryTranscriptName, "Query Transcript", 18),
    ColumnDef::new(RecordField::QueryLocusName, "Query Locus", 18),
    ColumnDef::new(RecordField::QueryIdentifier, "Query ID", 12),
    ColumnDef::new(RecordField::HitTranscriptName, "Hit Transcript", 18),
    ColumnDef::new(RecordField::HitLocusName, "Hit Locus", 18),
    ColumnDef::new(RecordField::HitIdentifier, "Hit ID", 12),
    ColumnDef::new(RecordField::HitDefline, "Hit Description", 30),
    ColumnDef::new(RecordField::HitProteome, "Hit Proteome", 13),
    ColumnDef::new(RecordField::ToProt, "To Prot", 10),
    ColumnDef::new(RecordField::Identities, "Identities", 12),
    ColumnDef::new(RecordField::Coverage, "Coverage", 12),
    ColumnDef::new(RecordField::Positives, "Positives", 12),
    ColumnDef::new(RecordField::Score, "Score", 10),
    ColumnDef::new(RecordField::Evalue, "E-value", 12),
    ColumnDef::new(RecordField::IsPrimary, "Is Primary", 12),
    ColumnDef::new(RecordField::IntQueryIdentifier, "Int Query ID", 14),
    ColumnDef::new(RecordField::IntHitIdentifier, "Int Hit ID", 14),
    ColumnDef::new(RecordField::InsertString, "Insert String", 15),
];

/// The longest run of columns starting at `first` that fits in `width`
/// cells, allowing one cell of spacing between columns. Always at least one.
pub fn visible_columns(first: usize, width: u16) -> &'static [ColumnDef] {
    let first = first.min(HOMOLOG_COLUMNS.len() - 1);
    let mut used: u16 = 0;
    let mut end = first;
    for column in &HOMOLOG_COLUMNS[first..] {
        let needed = column.width + u16::from(end > first);
        if end > first && used + needed > width {
            break;
        }
        used = used.saturating_add(needed);
        end += 1;
    }
    &HOMOLOG_COLUMNS[first..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_one_column() {
        for field in RecordField::ALL {
            assert_eq!(
                HOMOLOG_COLUMNS.iter().filter(|c| c.field == field).count(),
                1,
                "{field}"
            );
        }
    }

    #[test]
    fn test_visible_columns_fit_width() {
        let columns = visible_columns(0, 60);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].header, "ID");
        assert_eq!(visible_columns(18, 5).len(), 1);
        assert_eq!(visible_columns(0, u16::MAX).len(), 19);
    }
}
