// Cache tests
// Author: Gabriel Demetrios Lafis

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use rust_lazy_data_engine::{from_file, from_range, ErrorKind, StageKind};
use tempfile::NamedTempFile;

fn counted_range(end: i64) -> (rust_lazy_data_engine::Pipeline<i64>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let pipeline = from_range(0, end).map(move |x| {
        counter.set(counter.get() + 1);
        x
    });
    (pipeline, calls)
}

#[test]
fn test_cache_materializes_exactly_once() {
    let (pipeline, calls) = counted_range(10);

    let cached = pipeline.cache().unwrap();
    assert_eq!(calls.get(), 10);

    // two independent actions on the cache do not touch upstream
    assert_eq!(cached.count().unwrap(), 10);
    assert_eq!(cached.filter(|x| x % 2 == 0).collect().unwrap(), vec![0, 2, 4, 6, 8]);
    assert_eq!(calls.get(), 10);
}

#[test]
fn test_cache_is_eager() {
    let (pipeline, calls) = counted_range(5);
    let doubled = pipeline.map(|x| x * 2);

    assert_eq!(calls.get(), 0);
    let cached = doubled.cache().unwrap();
    assert_eq!(calls.get(), 5);

    let dataset = cached.cached().unwrap();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.rows(), &[0, 2, 4, 6, 8]);
}

#[test]
fn test_uncached_pipeline_still_replays() {
    let (pipeline, calls) = counted_range(4);
    let _cached = pipeline.cache().unwrap();

    pipeline.count().unwrap();
    assert_eq!(calls.get(), 8);
}

#[test]
fn test_recache_does_not_rerun_upstream() {
    let (pipeline, calls) = counted_range(6);

    let cached = pipeline.cache().unwrap();
    let again = cached.cache().unwrap();
    let narrowed = again.take(2).cache().unwrap();

    assert_eq!(calls.get(), 6);
    assert_eq!(again.collect().unwrap(), cached.collect().unwrap());
    assert_eq!(narrowed.collect().unwrap(), vec![0, 1]);
    assert_eq!(calls.get(), 6);
}

#[test]
fn test_cached_pipeline_is_a_new_root() {
    let cached = from_range(0, 10).filter(|x| *x > 4).cache().unwrap();
    let downstream = cached.map(|x| x + 1);

    assert!(cached.is_cached());
    assert!(!downstream.is_cached());
    assert_eq!(downstream.lineage(), vec![StageKind::Cached(5), StageKind::Map]);
    assert_eq!(downstream.explain(), "cache(5) -> map");
}

#[test]
fn test_cached_file_survives_file_removal() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "a\nb\nc").unwrap();

    let lines = from_file(file.path());
    let cached = lines.cache().unwrap();
    drop(file);

    assert_eq!(cached.collect().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(lines.count().unwrap_err().kind(), ErrorKind::Io);
}

#[test]
fn test_cache_propagates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let err = from_file(dir.path().join("absent.csv")).cache().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_cloned_pipeline_shares_cached_rows() {
    let cached = from_range(0, 3).cache().unwrap();
    let copy = cached.clone();

    let original = cached.cached().unwrap();
    let shared = copy.cached().unwrap();
    assert!(std::ptr::eq(original, shared));
    assert_eq!(copy.collect().unwrap(), vec![0, 1, 2]);
}
