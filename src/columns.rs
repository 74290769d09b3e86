use crate::{ColumnError, Dataset};

/// A requested column that exists in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
    pub index: usize,
}

/// Checks each requested name in order and stops at the first one the
/// dataset does not have. Nothing after it is looked at.
pub fn resolve(dataset: &Dataset, names: &[String]) -> Result<Vec<ColumnRef>, ColumnError> {
    names
        .iter()
        .map(|name| {
            dataset
                .position(name)
                .map(|index| ColumnRef {
                    name: name.clone(),
                    index,
                })
                .ok_or_else(|| ColumnError::Missing(name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["x".into(), "y".into(), "name".into()],
            vec![vec!["1".into(), "2".into(), "a".into()]],
        )
        .expect("dataset builds")
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn resolves_in_request_order() {
        let refs = resolve(&dataset(), &names(&["name", "x"])).expect("columns exist");
        assert_eq!(
            refs,
            vec![
                ColumnRef {
                    name: "name".into(),
                    index: 2
                },
                ColumnRef {
                    name: "x".into(),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn duplicates_pass_through() {
        let refs = resolve(&dataset(), &names(&["x", "x"])).expect("columns exist");
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn stops_at_first_missing_name() {
        let err = resolve(&dataset(), &names(&["x", "z", "w"])).expect_err("z is missing");
        assert_eq!(err, ColumnError::Missing("z".into()));
    }

    #[test]
    fn names_are_case_sensitive() {
        let err = resolve(&dataset(), &names(&["X"])).expect_err("X is missing");
        assert_eq!(err, ColumnError::Missing("X".into()));
    }
}
