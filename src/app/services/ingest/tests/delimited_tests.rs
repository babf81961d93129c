//! Tests for the delimited-text decoder

use super::super::delimited::decode_delimited;
use crate::Error;

#[test]
fn test_decodes_basic_input() {
    let table = decode_delimited("id,lat,lon\n1,36.17,-115.14\n2,34.05,-118.24").unwrap();

    assert_eq!(table.headers, vec!["id", "lat", "lon"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].index, 1);
    assert_eq!(table.rows[0].fields, vec!["1", "36.17", "-115.14"]);
    assert_eq!(table.rows[1].index, 2);
    assert_eq!(table.rows[1].fields, vec!["2", "34.05", "-118.24"]);
}

#[test]
fn test_fields_and_headers_are_trimmed() {
    let table = decode_delimited(" id , lat , lon \n 1 , 36.17 , -115.14 ").unwrap();

    assert_eq!(table.headers, vec!["id", "lat", "lon"]);
    assert_eq!(table.rows[0].fields, vec!["1", "36.17", "-115.14"]);
}

#[test]
fn test_blank_lines_are_excluded_but_shift_indices() {
    let table = decode_delimited("lat,lon\n36.17,-115.14\n   \n\n34.05,-118.24").unwrap();

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].index, 1);
    // Two skipped lines still advance the raw index
    assert_eq!(table.rows[1].index, 4);
}

#[test]
fn test_rows_with_fewer_than_two_fields_are_dropped() {
    let table = decode_delimited("lat,lon\n36.17,-115.14\nmalformed\n34.05,-118.24").unwrap();

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1].index, 3);
}

#[test]
fn test_missing_longitude_header_fails() {
    let err = decode_delimited("id,lat\n1,36.17").unwrap_err();
    assert!(matches!(err, Error::MissingColumn { .. }));
}

#[test]
fn test_empty_input_fails_resolution() {
    assert!(decode_delimited("").is_err());
}

#[test]
fn test_decode_is_deterministic() {
    let text = "id,lat,lon\n1,36.17,-115.14\n\n2,34.05,-118.24";

    let first = decode_delimited(text).unwrap();
    let second = decode_delimited(text).unwrap();

    assert_eq!(first.rows, second.rows);
    assert_eq!(first.headers, second.headers);
    assert_eq!(first.roles, second.roles);
}
