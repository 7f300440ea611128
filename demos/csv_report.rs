// Delimited file report example
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use rust_lazy_data_engine::utils::AppResult;
use rust_lazy_data_engine::{init_logging, Config, Schema};

fn main() -> AppResult<()> {
    let mut config = Config::default();
    config.decode.has_header = true;
    init_logging(config.log_level_filter())?;

    // Write a small sample file
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "id,name,city,salary")?;
    writeln!(file, "1,Alice,Lisbon,75000.0")?;
    writeln!(file, "2,Bob,Porto,65000.0")?;
    writeln!(file, "3,Charlie,Lisbon,85000.0")?;
    writeln!(file, "4,Diana,Faro,70000.0")?;
    writeln!(file, "5,Alice,Lisbon,75000.0")?;

    let schema = Schema::parse("id:int,name:string,city:string,salary:float")?;
    let people = config.from_delimited(file.path(), schema.into())?;

    println!("All rows:");
    people.show_with(&config.show_options())?;

    let cities = people
        .map(|r| r.get_str("city").unwrap_or_default().to_string())
        .unique();
    println!("Distinct cities: {:?}", cities.collect()?);

    let lisbon = people
        .filter(|r| r.get_str("city") == Some("Lisbon"))
        .map(|r| r.get_f64("salary").unwrap_or_default())
        .cache()?;
    println!(
        "Lisbon: {} people, mean salary {:.1}",
        lisbon.count()?,
        lisbon.mean()?
    );

    Ok(())
}
