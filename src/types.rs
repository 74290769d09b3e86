/// Markers a data-frame reader treats as a missing value.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(val: &str) -> bool {
    NA_VALUES.contains(&val)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Infers the type of one column from its raw cells, ignoring missing values.
/// A column with nothing but missing values reads as `Float`, the way an
/// all-NaN column does.
pub fn infer_type(rows: &[Vec<String>], col_idx: usize) -> ColumnType {
    let mut is_int = true;
    let mut is_float = true;
    let mut is_bool = true;

    for val in rows.iter().filter_map(|row| row.get(col_idx)) {
        if is_missing(val) {
            continue;
        }
        let trimmed = val.trim();
        if is_int && trimmed.parse::<i64>().is_err() {
            is_int = false;
        }
        if is_float && trimmed.parse::<f64>().is_err() {
            is_float = false;
        }
        if is_bool && !val.eq_ignore_ascii_case("true") && !val.eq_ignore_ascii_case("false") {
            is_bool = false;
        }
        if !is_int && !is_float && !is_bool {
            return ColumnType::Text;
        }
    }

    match (is_int, is_float, is_bool) {
        // Every check survives only when no value was present.
        (true, true, true) => ColumnType::Float,
        (true, _, false) => ColumnType::Integer,
        (false, true, false) => ColumnType::Float,
        (false, false, true) => ColumnType::Boolean,
        _ => ColumnType::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn column(values: &[&str]) -> Vec<Vec<String>> {
        values.iter().map(|v| vec![v.to_string()]).collect()
    }

    #[rstest]
    #[case(&["1", "2", "-3"], ColumnType::Integer)]
    #[case(&["1", "2.5", "1e3"], ColumnType::Float)]
    #[case(&["true", "False", "TRUE"], ColumnType::Boolean)]
    #[case(&["1", "a"], ColumnType::Text)]
    #[case(&["1", "NA", ""], ColumnType::Integer)]
    #[case(&["NA", "", "nan"], ColumnType::Float)]
    #[case(&["1", "0"], ColumnType::Integer)]
    #[case(&[" 1", "2 "], ColumnType::Integer)]
    #[case(&[" 1.5", "\t2"], ColumnType::Float)]
    fn infers_column_types(#[case] values: &[&str], #[case] expected: ColumnType) {
        assert_eq!(infer_type(&column(values), 0), expected);
    }

    #[test]
    fn only_integer_and_float_are_numeric() {
        assert!(ColumnType::Integer.is_numeric());
        assert!(ColumnType::Float.is_numeric());
        assert!(!ColumnType::Boolean.is_numeric());
        assert!(!ColumnType::Text.is_numeric());
    }
}
