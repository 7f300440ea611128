// Action tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use rust_lazy_data_engine::{
    from_delimited, from_range, from_vec, ErrorKind, PipelineError, RecordDecoder, SchemaBuilder,
    ShowOptions,
};
use tempfile::NamedTempFile;

#[test]
fn test_count_and_collect() {
    let pipeline = from_range(3, 8);
    assert_eq!(pipeline.count().unwrap(), 5);
    assert_eq!(pipeline.collect().unwrap(), vec![3, 4, 5, 6, 7]);
    assert_eq!(from_range(0, 0).count().unwrap(), 0);
}

#[test]
fn test_reduce() {
    assert_eq!(from_range(1, 5).reduce(|a, b| a * b).unwrap(), 24);

    let words = from_vec(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    assert_eq!(words.reduce(|a, b| format!("{}{}", a, b)).unwrap(), "abc");

    let err = from_range(0, 0).reduce(|a, b| a + b).unwrap_err();
    assert!(matches!(err, PipelineError::EmptySequence { action: "reduce" }));
}

#[test]
fn test_fold() {
    assert_eq!(from_range(1, 4).fold(10, |acc, x| acc + x).unwrap(), 16);
    assert_eq!(from_range(0, 0).fold(10, |acc, x| acc + x).unwrap(), 10);

    let lengths = from_vec(vec!["ab", "cde"]).fold(Vec::new(), |mut acc, s| {
        acc.push(s.len());
        acc
    });
    assert_eq!(lengths.unwrap(), vec![2, 3]);
}

#[test]
fn test_min_max() {
    let pipeline = from_vec(vec![4, -2, 9, 0, 9]);
    assert_eq!(pipeline.min().unwrap(), -2);
    assert_eq!(pipeline.max().unwrap(), 9);

    let empty = from_range(0, 0);
    assert_eq!(empty.min().unwrap_err().kind(), ErrorKind::EmptySequence);
    assert_eq!(empty.max().unwrap_err().kind(), ErrorKind::EmptySequence);

    let floats = from_vec(vec![1.5f64, -0.5, 3.25]);
    assert_eq!(floats.min_by(|a, b| a.total_cmp(b)).unwrap(), -0.5);
    assert_eq!(floats.max_by(|a, b| a.total_cmp(b)).unwrap(), 3.25);
}

#[test]
fn test_sum_and_mean() {
    let pipeline = from_range(1, 5);
    assert_eq!(pipeline.sum().unwrap(), 10);
    assert_eq!(pipeline.mean().unwrap(), 2.5);

    let floats = from_vec(vec![0.5f64, 1.5]);
    assert_eq!(floats.sum().unwrap(), 2.0);

    assert_eq!(from_range(0, 0).sum().unwrap(), 0);
}

#[test]
fn test_mean_on_empty_fails() {
    let err = from_range(0, 10).filter(|x| *x > 100).mean().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptySequence);
    assert_eq!(err.to_string(), "mean() called on an empty sequence");
}

#[test]
fn test_integer_sum_overflow_is_an_error() {
    let err = from_vec(vec![i64::MAX, 1]).sum().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(err.to_string(), "sum() overflowed the element type");

    assert_eq!(from_vec(vec![u8::MAX - 1, 1]).sum().unwrap(), u8::MAX);
    assert!(from_vec(vec![u8::MAX, 1]).sum().is_err());
    assert_eq!(from_vec(vec![f64::MAX, f64::MAX]).sum().unwrap(), f64::INFINITY);
}

#[test]
fn test_empty_failure_leaves_pipeline_usable() {
    let pipeline = from_range(0, 3);
    let empty = pipeline.drop(10);

    assert!(empty.mean().is_err());
    assert_eq!(pipeline.mean().unwrap(), 1.0);
    assert_eq!(empty.count().unwrap(), 0);
}

#[test]
fn test_for_each_and_first() {
    let mut seen = Vec::new();
    from_range(0, 3).for_each(|x| seen.push(x)).unwrap();
    assert_eq!(seen, vec![0, 1, 2]);

    assert_eq!(from_range(7, 9).first().unwrap(), Some(7));
    assert_eq!(from_range(0, 0).first().unwrap(), None);
}

#[test]
fn test_show_string_for_records() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1,Alice\n2,Bartholomew Fitzgerald\n3,Carol").unwrap();

    let schema = SchemaBuilder::new().add_integer("id").add_string("name").build().unwrap();
    let decoder = RecordDecoder::new(schema, ',').unwrap();
    let records = from_delimited(file.path(), decoder, false);

    let options = ShowOptions {
        rows: 2,
        column_width: 8,
    };
    let table = records.show_string(&options).unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(
        lines,
        vec![
            "+--------+--------+",
            "|id      |name    |",
            "+--------+--------+",
            "|1       |Alice   |",
            "|2       |Barthol…|",
            "+--------+--------+",
        ]
    );
}

#[test]
fn test_show_does_not_evaluate_remainder() {
    // the third line would fail to decode if it were reached
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1,Alice\n2,Bob\nbroken").unwrap();

    let schema = SchemaBuilder::new().add_integer("id").add_string("name").build().unwrap();
    let decoder = RecordDecoder::new(schema, ',').unwrap();
    let records = from_delimited(file.path(), decoder, false);

    assert!(records.show_rows(2).is_ok());
    assert!(records.show_string(&ShowOptions::default()).is_err());
}

#[test]
fn test_show_widths_are_stable() {
    let short = from_vec(vec![(1, "a"), (2, "b")]);
    let long = from_vec(vec![(1, "a"), (2, "a value that is far too long for any column")]);

    let options = ShowOptions::default();
    let short_table = short.show_string(&options).unwrap();
    let long_table = long.show_string(&options).unwrap();

    let width = |table: &str| -> Vec<usize> { table.lines().map(|l| l.chars().count()).collect() };
    assert_eq!(width(&short_table), width(&long_table));
    assert!(short_table.contains("|Field0"));
}

#[test]
fn test_show_empty() {
    let table = from_range(0, 0).show_string(&ShowOptions::default()).unwrap();
    assert_eq!(table, "(empty)\n");
}

#[test]
fn test_show_zero_rows_prints_header_only() {
    let options = ShowOptions {
        rows: 0,
        column_width: 6,
    };
    let table = from_vec(vec![(1, "a"), (2, "b")]).show_string(&options).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines, vec!["+------+------+", "|Field0|Field1|", "+------+------+"]);

    let empty = from_range(0, 0).show_string(&options).unwrap();
    assert_eq!(empty, "(empty)\n");
}
