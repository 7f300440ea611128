// One-shot materialization of a pipeline into memory
// Author: Gabriel Demetrios Lafis

use std::rc::Rc;
use std::time::Instant;

use log::info;

use super::{Node, Pipeline, PipelineError, RowIter, StageKind};

/// Resident rows produced by exactly one evaluation of a pipeline.
///
/// The rows are never modified after construction.
#[derive(Debug)]
pub struct CachedDataset<T> {
    rows: Vec<T>,
}

impl<T> CachedDataset<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}

/// Source leaf reading a cached dataset
struct CachedNode<T> {
    dataset: Rc<CachedDataset<T>>,
}

impl<T: Clone + 'static> Node<T> for CachedNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        Box::new(self.dataset.rows.iter().cloned().map(Ok))
    }

    fn kind(&self) -> StageKind {
        StageKind::Cached(self.dataset.len())
    }

    fn lineage(&self) -> Vec<StageKind> {
        vec![self.kind()]
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Evaluate this pipeline now and keep the result in memory.
    ///
    /// The returned pipeline is rooted at the cached rows: transformations
    /// and actions on it never re-run the chain that produced them. Calling
    /// `cache` on a pipeline that is already a cache copies its rows without
    /// touching anything further upstream.
    pub fn cache(&self) -> Result<Pipeline<T>, PipelineError> {
        let started = Instant::now();
        let rows = self.collect()?;
        let dataset = Rc::new(CachedDataset { rows });

        info!(
            "cached {} rows from {} in {:?}",
            dataset.len(),
            self.explain(),
            started.elapsed()
        );

        Ok(Pipeline {
            node: Rc::new(CachedNode {
                dataset: Rc::clone(&dataset),
            }),
            cached: Some(dataset),
        })
    }

    /// The cached dataset, if this pipeline is directly rooted at one
    pub fn cached(&self) -> Option<&CachedDataset<T>> {
        self.cached.as_deref()
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
