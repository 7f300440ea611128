// Configuration tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use rust_lazy_data_engine::utils::ConfigError;
use rust_lazy_data_engine::{Config, Schema, ShowOptions};
use tempfile::Builder;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.show_options(), ShowOptions::default());
    assert_eq!(config.decode.delimiter, ',');
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_yaml_config() {
    let file = write_config(
        ".yaml",
        "logging:\n  level: debug\ndisplay:\n  rows: 5\n  column_width: 12\ndecode:\n  delimiter: \"|\"\n  has_header: true\n",
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.show_options(), ShowOptions { rows: 5, column_width: 12 });
    assert_eq!(config.decode.delimiter, '|');
    assert!(config.decode.has_header);
    assert!(!config.decode.quoted);
}

#[test]
fn test_load_json_config_and_build_decoder() {
    let file = write_config(".json", r#"{"decode": {"delimiter": ";", "quoted": true}}"#);
    let config = Config::from_file(file.path()).unwrap();

    let schema = Schema::parse("id:int,name:string").unwrap();
    let decoder = config.decoder_for(schema.into()).unwrap();
    assert!(decoder.is_quoted());

    let record = decoder.decode(1, "4;\"a;b\"").unwrap();
    assert_eq!(record.get_str("name"), Some("a;b"));
}

#[test]
fn test_invalid_configs() {
    let file = write_config(".json", r#"{"display": {"column_width": 1}}"#);
    assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Invalid(_))));

    let file = write_config(".toml", "[display]\nrows = 3\n");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    let file = write_config(".yaml", "logging:\n  level: verbose\n");
    assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Invalid(_))));

    let file = write_config(".json", "{not json");
    assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Json(_))));
}

#[test]
fn test_header_setting_skips_first_line() {
    let config_file = write_config(".json", r#"{"decode": {"has_header": true}}"#);
    let config = Config::from_file(config_file.path()).unwrap();

    let mut data = tempfile::NamedTempFile::new().unwrap();
    data.write_all(b"id,name\n1,Ann\n2,Ben\n").unwrap();

    let schema = Schema::parse("id:int,name:string").unwrap();
    let people = config.from_delimited(data.path(), schema.into()).unwrap();
    let ids: Vec<i64> = people
        .collect()
        .unwrap()
        .iter()
        .filter_map(|r| r.get_i64("id"))
        .collect();
    assert_eq!(ids, vec![1, 2]);

    // without the setting the header is decoded as data
    let schema = Schema::parse("id:int,name:string").unwrap();
    let raw = Config::default().from_delimited(data.path(), schema.into()).unwrap();
    let err = raw.count().unwrap_err();
    assert_eq!(err.as_decode_failure().map(|f| f.line_number), Some(1));
}
