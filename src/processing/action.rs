// Actions: drive a pipeline to completion and return an eager result
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use log::debug;

use crate::display::{ShowOptions, TableFormatter, Tabular};
use super::{Numeric, Pipeline, PipelineError};

impl<T: 'static> Pipeline<T> {
    /// Number of elements
    pub fn count(&self) -> Result<usize, PipelineError> {
        let count = self.iter().try_fold(0usize, |n, row| row.map(|_| n + 1))?;
        debug!("count() over {} = {}", self.explain(), count);
        Ok(count)
    }

    /// All elements, in order
    pub fn collect(&self) -> Result<Vec<T>, PipelineError> {
        let rows = self.iter().collect::<Result<Vec<T>, _>>()?;
        debug!("collect() over {} = {} rows", self.explain(), rows.len());
        Ok(rows)
    }

    /// The first element, without evaluating the rest of the pipeline
    pub fn first(&self) -> Result<Option<T>, PipelineError> {
        self.iter().next().transpose()
    }

    /// Run `f` on every element
    pub fn for_each<F>(&self, mut f: F) -> Result<(), PipelineError>
    where
        F: FnMut(T),
    {
        for row in self.iter() {
            f(row?);
        }
        Ok(())
    }

    /// Left-to-right fold without a seed. Fails on an empty pipeline.
    pub fn reduce<F>(&self, f: F) -> Result<T, PipelineError>
    where
        F: Fn(T, T) -> T,
    {
        self.reduce_as("reduce", f)
    }

    /// Left-to-right fold starting from `seed`
    pub fn fold<A, F>(&self, seed: A, f: F) -> Result<A, PipelineError>
    where
        F: Fn(A, T) -> A,
    {
        self.iter().try_fold(seed, |acc, row| row.map(|v| f(acc, v)))
    }

    /// Smallest element according to `compare`; the first one wins ties
    pub fn min_by<F>(&self, compare: F) -> Result<T, PipelineError>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.reduce_as("min", |a, b| if compare(&b, &a) == Ordering::Less { b } else { a })
    }

    /// Largest element according to `compare`; the first one wins ties
    pub fn max_by<F>(&self, compare: F) -> Result<T, PipelineError>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.reduce_as("max", |a, b| if compare(&b, &a) == Ordering::Greater { b } else { a })
    }

    fn reduce_as<F>(&self, action: &'static str, f: F) -> Result<T, PipelineError>
    where
        F: Fn(T, T) -> T,
    {
        let mut rows = self.iter();
        let first = match rows.next() {
            Some(row) => row?,
            None => return Err(PipelineError::EmptySequence { action }),
        };
        rows.try_fold(first, |acc, row| row.map(|v| f(acc, v)))
    }
}

impl<T: Ord + 'static> Pipeline<T> {
    pub fn min(&self) -> Result<T, PipelineError> {
        self.min_by(Ord::cmp)
    }

    pub fn max(&self) -> Result<T, PipelineError> {
        self.max_by(Ord::cmp)
    }
}

impl<T: Numeric + 'static> Pipeline<T> {
    /// Sum of all elements; zero for an empty pipeline.
    /// Fails with [`PipelineError::Overflow`] when an integer total does not fit.
    pub fn sum(&self) -> Result<T, PipelineError> {
        self.iter().try_fold(T::zero(), |total, row| {
            total
                .checked_add(row?)
                .ok_or(PipelineError::Overflow { action: "sum" })
        })
    }

    /// Arithmetic mean. Fails on an empty pipeline instead of returning NaN.
    pub fn mean(&self) -> Result<f64, PipelineError> {
        let (total, count) = self.fold((0.0f64, 0usize), |(total, count), v| {
            (total + v.to_f64(), count + 1)
        })?;

        if count == 0 {
            return Err(PipelineError::EmptySequence { action: "mean" });
        }
        Ok(total / count as f64)
    }
}

impl<T: Tabular + 'static> Pipeline<T> {
    /// Print the first rows as a table on standard output
    pub fn show(&self) -> Result<(), PipelineError> {
        self.show_with(&ShowOptions::default())
    }

    /// Print the first `rows` rows as a table on standard output
    pub fn show_rows(&self, rows: usize) -> Result<(), PipelineError> {
        self.show_with(&ShowOptions {
            rows,
            ..ShowOptions::default()
        })
    }

    pub fn show_with(&self, options: &ShowOptions) -> Result<(), PipelineError> {
        print!("{}", self.show_string(options)?);
        Ok(())
    }

    /// Render the first `options.rows` rows; the rest of the pipeline is never evaluated.
    /// With `rows == 0` only the header is rendered, shaped by the first element.
    pub fn show_string(&self, options: &ShowOptions) -> Result<String, PipelineError> {
        let formatter = TableFormatter::new(options.column_width);
        if options.rows == 0 {
            return Ok(match self.first()? {
                Some(shape) => formatter.render_header(&shape),
                None => formatter.render::<T>(&[]),
            });
        }

        let rows = self.take(options.rows).collect()?;
        Ok(formatter.render(&rows))
    }
}
