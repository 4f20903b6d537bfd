//! Assertion checks against a captured act outcome.

use dbtest_construct::{convert, Constructor};
use dbtest_core::{MethodSignature, Outcome, Value};

use crate::error::{AssertionFailure, FailureKind, RunError, RunResult};
use crate::{Assertion, Column, Database, ExpectedRow};

/// Checks assertions for one scenario against the single act outcome.
pub(crate) struct Verifier<'a, 'r> {
    scenario: &'a str,
    signature: &'a MethodSignature,
    outcome: &'a Outcome,
    constructor: Constructor<'r>,
}

impl<'a, 'r> Verifier<'a, 'r> {
    pub(crate) fn new(
        scenario: &'a str,
        signature: &'a MethodSignature,
        outcome: &'a Outcome,
        constructor: Constructor<'r>,
    ) -> Self {
        Self {
            scenario,
            signature,
            outcome,
            constructor,
        }
    }

    /// Verify one assertion.
    pub(crate) fn verify(&self, db: &mut dyn Database, assertion: &Assertion) -> RunResult<()> {
        // An error nobody asked about fails before anything else is looked at
        if let Some(err) = &self.outcome.error {
            if !matches!(assertion, Assertion::Error(_)) {
                return Err(self.fail(
                    FailureKind::UnexpectedError,
                    format!("unexpected error: {}", err.message()),
                ));
            }
        }

        match assertion {
            Assertion::Error(expected) => self.verify_error(expected),
            Assertion::Query { query, rows } => self.verify_rows(db, query, rows),
            Assertion::Value(expected) => {
                if self.signature.returns.len() != 1 {
                    return Err(self.fail(
                        FailureKind::ReturnCountMismatch,
                        format!(
                            "invalid number of return values of method '{}'",
                            self.signature.name
                        ),
                    ));
                }
                let expected = self.constructor.build(expected)?;
                let actual = self.outcome.values.first().cloned().unwrap_or(Value::Null);
                if expected != actual {
                    return Err(self.mismatch(
                        format!("return values not equal: '{}' /= '{}'", expected, actual),
                        expected,
                        actual,
                    ));
                }
                Ok(())
            }
        }
    }

    fn verify_error(&self, expected: &str) -> RunResult<()> {
        let actual = match &self.outcome.error {
            Some(err) => err.message(),
            None => return Err(self.fail(FailureKind::ExpectedErrorMissing, "expected error")),
        };
        if actual != expected {
            return Err(RunError::from(
                AssertionFailure::new(
                    self.scenario,
                    FailureKind::ErrorMessageMismatch,
                    format!("different error: '{}' /= '{}'", expected, actual),
                )
                .with_values(Value::from(expected), Value::from(actual)),
            ));
        }
        Ok(())
    }

    /// Stream the query result and compare rows positionally. Rows beyond
    /// the expected ones are counted, not compared.
    fn verify_rows(
        &self,
        db: &mut dyn Database,
        query: &str,
        expected: &[ExpectedRow],
    ) -> RunResult<()> {
        let mut cursor = db.query(query).map_err(|e| RunError::query(query, e))?;
        let columns = cursor.columns().to_vec();

        let mut count = 0;
        while let Some(row) = cursor.next_row() {
            let row = row.map_err(|e| RunError::query(query, e))?;
            if let Some(expected_row) = expected.get(count) {
                self.compare_row(&columns, expected_row, row)?;
            }
            count += 1;
        }

        if count > expected.len() {
            return Err(self.fail(FailureKind::ExtraRows, "more rows expected"));
        }
        if count < expected.len() {
            return Err(self.fail(FailureKind::MissingRows, "less rows expected"));
        }
        Ok(())
    }

    fn compare_row(
        &self,
        columns: &[Column],
        expected: &ExpectedRow,
        actual: Vec<Value>,
    ) -> RunResult<()> {
        if expected.columns.len() != actual.len() {
            return Err(self.fail(
                FailureKind::ColumnCountMismatch,
                "invalid number of columns",
            ));
        }

        for (index, (description, actual)) in expected.columns.iter().zip(actual).enumerate() {
            let expected = self.constructor.build(description)?;
            let name = columns
                .get(index)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| index.to_string());
            self.compare_column(&name, expected, actual)?;
        }
        Ok(())
    }

    fn compare_column(&self, name: &str, expected: Value, actual: Value) -> RunResult<()> {
        let not_equal = |expected: Value, actual: Value| {
            self.mismatch(
                format!(
                    "values of field '{}' not equal: '{}' /= '{}'",
                    name, expected, actual
                ),
                expected,
                actual,
            )
        };

        if actual.is_null() && !expected.is_null() {
            return Err(not_equal(expected, actual));
        }

        let target = expected.value_type();
        let actual = if actual.value_type() == target {
            actual
        } else {
            match convert(actual, &target) {
                Some(converted) => converted,
                None => {
                    return Err(self.fail(
                        FailureKind::ColumnTypeIncompatible,
                        format!("incompatible types of field '{}'", name),
                    ))
                }
            }
        };

        if expected != actual {
            return Err(not_equal(expected, actual));
        }
        Ok(())
    }

    fn fail(&self, kind: FailureKind, message: impl Into<String>) -> RunError {
        RunError::from(AssertionFailure::new(self.scenario, kind, message))
    }

    fn mismatch(&self, message: String, expected: Value, actual: Value) -> RunError {
        RunError::from(
            AssertionFailure::new(self.scenario, FailureKind::ValueMismatch, message)
                .with_values(expected, actual),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cursor, DatabaseResult, MaterializedCursor};
    use dbtest_construct::TypedValue;
    use dbtest_core::{MethodError, Primitive, TypeDescriptor};
    use dbtest_registry::TypeRegistry;

    /// Answers every query with the same rows.
    struct Fixed(Vec<Vec<Value>>);

    impl Database for Fixed {
        fn execute(&mut self, _statement: &str) -> DatabaseResult<()> {
            Ok(())
        }

        fn query<'a>(&'a mut self, _query: &str) -> DatabaseResult<Box<dyn Cursor + 'a>> {
            Ok(Box::new(MaterializedCursor::new(
                vec![Column::new("v")],
                self.0.clone(),
            )))
        }
    }

    fn string_getter() -> MethodSignature {
        MethodSignature::new(
            "Get",
            vec![TypeDescriptor::Primitive(Primitive::Int)],
            vec![TypeDescriptor::Primitive(Primitive::String)],
        )
    }

    fn kind_of(result: RunResult<()>) -> Option<FailureKind> {
        result.err().and_then(|e| e.failure_kind())
    }

    fn rows(values: &[i64]) -> Assertion {
        Assertion::query(
            "SELECT v FROM t",
            values
                .iter()
                .map(|v| ExpectedRow::new(vec![TypedValue::int(*v)]))
                .collect(),
        )
    }

    #[test]
    fn test_unexpected_error_comes_first() {
        let registry = TypeRegistry::default();
        let signature = string_getter();
        let outcome = Outcome::failure(MethodError::new("not found"));
        let verifier = Verifier::new("s", &signature, &outcome, Constructor::new(&registry));
        let mut db = Fixed(vec![]);

        let err = verifier.verify(&mut db, &rows(&[])).unwrap_err();
        assert_eq!(err.to_string(), "s: unexpected error: not found");
        assert_eq!(err.failure_kind(), Some(FailureKind::UnexpectedError));

        assert!(verifier.verify(&mut db, &Assertion::error("not found")).is_ok());
        assert_eq!(
            kind_of(verifier.verify(&mut db, &Assertion::error("other"))),
            Some(FailureKind::ErrorMessageMismatch)
        );
    }

    #[test]
    fn test_expected_error_missing() {
        let registry = TypeRegistry::default();
        let signature = string_getter();
        let outcome = Outcome::success(vec![Value::from("a")]);
        let verifier = Verifier::new("s", &signature, &outcome, Constructor::new(&registry));

        let err = verifier
            .verify(&mut Fixed(vec![]), &Assertion::error("boom"))
            .unwrap_err();
        assert_eq!(err.to_string(), "s: expected error");
    }

    #[test]
    fn test_return_value() {
        let registry = TypeRegistry::default();
        let signature = string_getter();
        let outcome = Outcome::success(vec![Value::from("a")]);
        let verifier = Verifier::new("s", &signature, &outcome, Constructor::new(&registry));
        let mut db = Fixed(vec![]);

        assert!(verifier
            .verify(&mut db, &Assertion::value(TypedValue::string("a")))
            .is_ok());

        let err = verifier
            .verify(&mut db, &Assertion::value(TypedValue::string("b")))
            .unwrap_err();
        assert_eq!(err.to_string(), "s: return values not equal: 'b' /= 'a'");
        let failure = err.as_failure().unwrap();
        assert_eq!(failure.expected, Some(Value::from("b")));
        assert_eq!(failure.actual, Some(Value::from("a")));
    }

    #[test]
    fn test_return_count_mismatch() {
        let registry = TypeRegistry::default();
        let signature = MethodSignature::new("Put", vec![], vec![]);
        let outcome = Outcome::success(vec![]);
        let verifier = Verifier::new("s", &signature, &outcome, Constructor::new(&registry));

        let err = verifier
            .verify(&mut Fixed(vec![]), &Assertion::value(TypedValue::int(1)))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "s: invalid number of return values of method 'Put'"
        );
    }

    #[test]
    fn test_row_checks() {
        let registry = TypeRegistry::default();
        let signature = string_getter();
        let outcome = Outcome::success(vec![Value::from("a")]);
        let verifier = Verifier::new("s", &signature, &outcome, Constructor::new(&registry));

        let one = vec![vec![Value::Int(1)]];
        assert!(verifier.verify(&mut Fixed(one.clone()), &rows(&[1])).is_ok());

        let two = vec![vec![Value::Int(1)], vec![Value::Int(2)]];
        assert_eq!(
            kind_of(verifier.verify(&mut Fixed(two.clone()), &rows(&[1]))),
            Some(FailureKind::ExtraRows)
        );
        assert_eq!(
            kind_of(verifier.verify(&mut Fixed(vec![]), &rows(&[1]))),
            Some(FailureKind::MissingRows)
        );
        // positional: same rows, different order
        assert_eq!(
            kind_of(verifier.verify(&mut Fixed(two), &rows(&[2, 1]))),
            Some(FailureKind::ValueMismatch)
        );
        assert_eq!(
            kind_of(verifier.verify(&mut Fixed(vec![vec![Value::Int(1), Value::Int(2)]]), &rows(&[1]))),
            Some(FailureKind::ColumnCountMismatch)
        );
    }

    #[test]
    fn test_column_coercion() {
        let registry = TypeRegistry::default();
        let signature = string_getter();
        let outcome = Outcome::success(vec![Value::from("a")]);
        let verifier = Verifier::new("s", &signature, &outcome, Constructor::new(&registry));

        // REAL 1.0 read back for an int expectation
        assert!(verifier
            .verify(&mut Fixed(vec![vec![Value::Float(1.0)]]), &rows(&[1]))
            .is_ok());

        let err = verifier
            .verify(&mut Fixed(vec![vec![Value::from("x")]]), &rows(&[1]))
            .unwrap_err();
        assert_eq!(err.to_string(), "s: incompatible types of field 'v'");

        let err = verifier
            .verify(&mut Fixed(vec![vec![Value::Null]]), &rows(&[1]))
            .unwrap_err();
        assert_eq!(err.to_string(), "s: values of field 'v' not equal: '1' /= 'null'");

        let err = verifier
            .verify(&mut Fixed(vec![vec![Value::Int(2)]]), &rows(&[1]))
            .unwrap_err();
        assert_eq!(err.to_string(), "s: values of field 'v' not equal: '1' /= '2'");
    }
}
