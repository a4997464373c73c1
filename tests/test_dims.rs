// Tests for hidden-width specification parsing.

use mlp_autoencoder::dims::{format_hidden_dims, parse_hidden_dims};
use mlp_autoencoder::NetworkError;

#[test]
fn test_segment_count_and_values() {
    let cases: &[(&str, &[usize])] = &[
        ("32-16", &[32, 16]),
        ("8", &[8]),
        ("128-64-32-16", &[128, 64, 32, 16]),
        ("1-1-1", &[1, 1, 1]),
        ("16-32", &[16, 32]),
    ];
    for (spec, expected) in cases {
        let dims = parse_hidden_dims(spec).unwrap();
        assert_eq!(dims.len(), spec.split('-').count());
        assert_eq!(&dims[..], *expected);
    }
}

#[test]
fn test_format_then_parse_preserves_order() {
    let dims = vec![500, 250, 125, 3];
    let text = format_hidden_dims(&dims);
    assert_eq!(text, "500-250-125-3");
    assert_eq!(parse_hidden_dims(&text).unwrap(), dims);
}

#[test]
fn test_reverse_via_string() {
    let mut dims = parse_hidden_dims("32-16").unwrap();
    dims.reverse();
    assert_eq!(format_hidden_dims(&dims), "16-32");
}

#[test]
fn test_trailing_separator() {
    let err = parse_hidden_dims("32-").unwrap_err();
    assert!(matches!(err, NetworkError::Format { .. }));
    assert!(err.to_string().contains("\"32-\""));
}

#[test]
fn test_non_numeric() {
    assert!(matches!(
        parse_hidden_dims("abc"),
        Err(NetworkError::Format { .. })
    ));
}

#[test]
fn test_empty() {
    assert!(matches!(parse_hidden_dims(""), Err(NetworkError::Format { .. })));
}

#[test]
fn test_overflow_is_format_error() {
    assert!(matches!(
        parse_hidden_dims("99999999999999999999999999-4"),
        Err(NetworkError::Format { .. })
    ));
}
