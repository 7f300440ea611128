// Simple pipeline example
// Author: Gabriel Demetrios Lafis

use rust_lazy_data_engine::{from_range, init_logging};

fn main() -> anyhow::Result<()> {
    init_logging(log::LevelFilter::Debug)?;

    // Describe the computation; nothing runs yet
    let multiples = from_range(0, 1_000_000)
        .filter(|x| x % 7 == 0)
        .map(|x| (x, x * x));

    println!("Plan: {}", multiples.explain());

    // Only the first five elements are ever computed
    multiples.show_rows(5)?;

    // Materialize a slice once and reuse it
    let window = multiples.drop(10).take(1_000).map(|(x, _)| x).cache()?;
    println!("count = {}", window.count()?);
    println!("sum   = {}", window.sum()?);
    println!("mean  = {:.2}", window.mean()?);
    println!("max   = {}", window.max()?);

    Ok(())
}
