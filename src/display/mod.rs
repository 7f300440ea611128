// Display module for rendering rows as text tables
// Author: Gabriel Demetrios Lafis

mod table;

pub use table::*;

use serde::{Deserialize, Serialize};

use crate::data::Record;

/// Number of rows `show()` prints by default
pub const DEFAULT_SHOW_ROWS: usize = 20;

/// Fixed width of every rendered column, in characters
pub const DEFAULT_COLUMN_WIDTH: usize = 20;

/// Options for `show()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowOptions {
    /// Rows to print; `0` prints only the header
    pub rows: usize,
    pub column_width: usize,
}

impl Default for ShowOptions {
    fn default() -> Self {
        ShowOptions {
            rows: DEFAULT_SHOW_ROWS,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Values that can be rendered as one table row.
///
/// Types without column names get synthesized `Field0..FieldK-1` headers.
pub trait Tabular {
    fn cells(&self) -> Vec<String>;

    fn column_names(&self) -> Option<Vec<String>> {
        None
    }
}

impl Tabular for Record {
    fn cells(&self) -> Vec<String> {
        self.values().iter().map(|v| v.to_string()).collect()
    }

    fn column_names(&self) -> Option<Vec<String>> {
        Some(self.schema().column_names())
    }
}

macro_rules! impl_tabular_scalar {
    ($($t:ty),*) => {
        $(
            impl Tabular for $t {
                fn cells(&self) -> Vec<String> {
                    vec![self.to_string()]
                }
            }
        )*
    };
}

impl_tabular_scalar!(
    bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String,
    crate::data::Value
);

impl Tabular for &str {
    fn cells(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

macro_rules! impl_tabular_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: std::fmt::Display),+> Tabular for ($($name,)+) {
            fn cells(&self) -> Vec<String> {
                vec![$(self.$idx.to_string()),+]
            }
        }
    };
}

impl_tabular_tuple!(A: 0);
impl_tabular_tuple!(A: 0, B: 1);
impl_tabular_tuple!(A: 0, B: 1, C: 2);
impl_tabular_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_tabular_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tabular_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
