//! Parameter key resolution against field metadata.

use crate::metadata::{EntityTypeMeta, FieldDef};

/// Resolves a parameter key to a field and one of its storage columns.
///
/// Candidates are scanned longest field name first, so a key like
/// `body_extra_value` resolves against `body_extra` before the shorter `body`
/// is considered. A key equal to a field name resolves to that field's only
/// column (multi-column fields need the explicit column suffix); otherwise the
/// remainder after the field name, minus one separator character, must name a
/// declared column.
pub(crate) fn resolve_field_column<'a>(
    meta: &'a EntityTypeMeta,
    key: &str,
) -> Option<(&'a FieldDef, &'a str)> {
    for field in meta.prefix_candidates() {
        if !key.starts_with(field.name.as_str()) {
            continue;
        }
        if key.len() == field.name.len() {
            if let Some(column) = field.single_column() {
                return Some((field, column));
            }
            continue;
        }
        let rest = &key[field.name.len()..];
        let mut chars = rest.chars();
        chars.next();
        let column = chars.as_str();
        if column.is_empty() {
            continue;
        }
        if let Some(declared) = field.columns.iter().find(|c| c.as_str() == column) {
            return Some((field, declared.as_str()));
        }
    }
    None
}
