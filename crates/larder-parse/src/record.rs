/// One successfully decomposed inventory line.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRecord {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
}

/// Decompose a free-text line into `(item, quantity, unit)` by peeling
/// the last two whitespace-separated fields off the right: the final
/// field is the unit, the one before it the quantity, everything left
/// is the item (interior spaces preserved). Returns `None` when the
/// line does not have that shape or the quantity is not a bare number —
/// callers keep the original line for the skipped report.
pub fn parse_record_line(line: &str) -> Option<ParsedRecord> {
    let (rest, unit) = split_trailing_field(line.trim())?;
    let (item, quantity_field) = split_trailing_field(rest)?;
    let item = item.trim();
    if item.is_empty() {
        return None;
    }
    let quantity = parse_quantity(quantity_field)?;
    Some(ParsedRecord {
        item: item.to_string(),
        quantity,
        unit: unit.to_string(),
    })
}

/// Split off the last whitespace-separated field. Runs of whitespace
/// count as one boundary.
fn split_trailing_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_end();
    let boundary = s.rfind(char::is_whitespace)?;
    Some((&s[..boundary], s[boundary..].trim_start()))
}

/// Lexical quantity parse: digits with optional comma-grouped thousands
/// and an optional decimal fraction. No sign, no exponent.
fn parse_quantity(field: &str) -> Option<f64> {
    static QUANTITY: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let pattern = QUANTITY.get_or_init(|| {
        regex::Regex::new(r"^(?:\d+|\d{1,3}(?:,\d{3})+)(?:\.\d+)?$").unwrap()
    });
    if !pattern.is_match(field) {
        return None;
    }
    field.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_triple() {
        assert_eq!(
            parse_record_line("หมู 5 กก"),
            Some(ParsedRecord {
                item: "หมู".into(),
                quantity: 5.0,
                unit: "กก".into(),
            })
        );
    }

    #[test]
    fn decimal_quantity() {
        let rec = parse_record_line("ไก่ 3.5 กก").unwrap();
        assert_eq!(rec.quantity, 3.5);
    }

    #[test]
    fn comma_thousands_quantity() {
        let rec = parse_record_line("ข้าวสาร 1,200 กรัม").unwrap();
        assert_eq!(rec.quantity, 1200.0);
        let rec = parse_record_line("น้ำตาล 1,234,567.5 กรัม").unwrap();
        assert_eq!(rec.quantity, 1_234_567.5);
    }

    #[test]
    fn item_keeps_interior_spaces() {
        let rec = parse_record_line("pork  shoulder 5 kg").unwrap();
        assert_eq!(rec.item, "pork  shoulder");
        assert_eq!(rec.unit, "kg");
    }

    #[test]
    fn runs_of_whitespace_are_one_boundary() {
        let rec = parse_record_line("หมู  5   กก").unwrap();
        assert_eq!(rec.item, "หมู");
        assert_eq!(rec.quantity, 5.0);
        assert_eq!(rec.unit, "กก");
    }

    #[test]
    fn too_few_fields_rejected() {
        assert_eq!(parse_record_line("หมู 5"), None);
        assert_eq!(parse_record_line("หมู"), None);
        assert_eq!(parse_record_line(""), None);
    }

    #[test]
    fn missing_item_rejected() {
        assert_eq!(parse_record_line("5 กก"), None);
    }

    #[test]
    fn non_numeric_quantity_rejected() {
        assert_eq!(parse_record_line("หมู ห้า กก"), None);
        assert_eq!(parse_record_line("หมู 5kg กก"), None);
    }

    #[test]
    fn signed_quantity_rejected() {
        assert_eq!(parse_record_line("หมู -5 กก"), None);
        assert_eq!(parse_record_line("หมู +5 กก"), None);
    }

    #[test]
    fn malformed_number_rejected() {
        assert_eq!(parse_record_line("หมู 5. กก"), None);
        assert_eq!(parse_record_line("หมู 1,23 กก"), None);
        assert_eq!(parse_record_line("หมู ,500 กก"), None);
    }
}
