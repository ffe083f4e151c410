//! Tests for error module

use dwellmap::error::{DwellMapError, FieldError, OptionExt, ParseError};

#[test]
fn test_error_display() {
    let err = ParseError::InvalidNumber {
        line: 12,
        field: "xpos".to_string(),
        value: "abc".to_string(),
    };
    assert!(err.to_string().contains("line 12"));
    assert!(err.to_string().contains("xpos"));
    assert!(err.to_string().contains("abc"));

    let err = ParseError::FieldCountMismatch {
        line: 4,
        expected: 9,
        found: 7,
    };
    assert!(err.to_string().contains("expected 9 fields, found 7"));

    let err = ParseError::InvalidSeparator {
        separator: ';',
        reason: "decimal separator must differ from the delimiter",
    };
    assert!(err.to_string().contains("';'"));
    assert!(err.to_string().contains("must differ"));
}

#[test]
fn test_wrapped_errors() {
    let err: DwellMapError = FieldError::Missing {
        field: "zpos".to_string(),
    }
    .into();
    assert!(matches!(err, DwellMapError::Field(_)));
    assert!(err.to_string().contains("zpos"));

    let err: DwellMapError = ParseError::MissingHeader.into();
    assert!(matches!(err, DwellMapError::Parse(ParseError::MissingHeader)));
}

#[test]
fn test_option_ext() {
    let none: Option<i32> = None;
    let result = none.ok_or_missing_field("EtPositionY");
    assert_eq!(
        result,
        Err(FieldError::Missing {
            field: "EtPositionY".to_string()
        })
    );

    assert_eq!(Some(3).ok_or_missing_field("x"), Ok(3));
}
