// Pipeline stages: lazy transformations over an upstream node
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{Record, RecordDecoder};
use super::{Node, Pipeline, PipelineError, RowIter, StageKind};

fn chain<T>(upstream: &dyn Node<T>, kind: StageKind) -> Vec<StageKind> {
    let mut lineage = upstream.lineage();
    lineage.push(kind);
    lineage
}

/// 1:1 transform
pub struct MapNode<T, U> {
    upstream: Rc<dyn Node<T>>,
    f: Box<dyn Fn(T) -> U>,
}

impl<T: 'static, U: 'static> Node<U> for MapNode<T, U> {
    fn iter(&self) -> RowIter<'_, U> {
        let f = &self.f;
        Box::new(self.upstream.iter().map(move |row| row.map(|v| f(v))))
    }

    fn kind(&self) -> StageKind {
        StageKind::Map
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Fallible 1:1 transform; the first error aborts the running action
pub struct TryMapNode<T, U> {
    upstream: Rc<dyn Node<T>>,
    f: Box<dyn Fn(T) -> Result<U, PipelineError>>,
}

impl<T: 'static, U: 'static> Node<U> for TryMapNode<T, U> {
    fn iter(&self) -> RowIter<'_, U> {
        let f = &self.f;
        Box::new(self.upstream.iter().map(move |row| row.and_then(|v| f(v))))
    }

    fn kind(&self) -> StageKind {
        StageKind::TryMap
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Keep elements matching a predicate
pub struct FilterNode<T> {
    upstream: Rc<dyn Node<T>>,
    predicate: Box<dyn Fn(&T) -> bool>,
}

impl<T: 'static> Node<T> for FilterNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        let predicate = &self.predicate;
        Box::new(self.upstream.iter().filter(move |row| match row {
            Ok(v) => predicate(v),
            Err(_) => true,
        }))
    }

    fn kind(&self) -> StageKind {
        StageKind::Filter
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Keep elements matching a predicate that also sees the upstream position
pub struct FilterWithIndexNode<T> {
    upstream: Rc<dyn Node<T>>,
    predicate: Box<dyn Fn(&T, usize) -> bool>,
}

impl<T: 'static> Node<T> for FilterWithIndexNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        let predicate = &self.predicate;
        let mut position = 0usize;
        Box::new(self.upstream.iter().filter(move |row| match row {
            Ok(v) => {
                let keep = predicate(v, position);
                position += 1;
                keep
            }
            Err(_) => true,
        }))
    }

    fn kind(&self) -> StageKind {
        StageKind::FilterWithIndex
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Yield at most `n` elements, then stop pulling from upstream
pub struct TakeNode<T> {
    upstream: Rc<dyn Node<T>>,
    n: usize,
}

struct TakeIter<'a, T> {
    // dropped as soon as the limit is reached so upstream resources are released
    inner: Option<RowIter<'a, T>>,
    remaining: usize,
}

impl<'a, T> Iterator for TakeIter<'a, T> {
    type Item = Result<T, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            if self.inner.take().is_some() {
                trace!("take limit reached, releasing upstream");
            }
            return None;
        }

        let row = self.inner.as_mut()?.next();
        match row {
            Some(Ok(v)) => {
                self.remaining -= 1;
                Some(Ok(v))
            }
            Some(Err(e)) => {
                self.remaining = 0;
                self.inner = None;
                Some(Err(e))
            }
            None => {
                self.inner = None;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<T: 'static> Node<T> for TakeNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        // take(0) never opens its upstream
        let inner = if self.n == 0 {
            None
        } else {
            Some(self.upstream.iter())
        };
        Box::new(TakeIter {
            inner,
            remaining: self.n,
        })
    }

    fn kind(&self) -> StageKind {
        StageKind::Take(self.n)
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Discard the first `n` elements
pub struct DropNode<T> {
    upstream: Rc<dyn Node<T>>,
    n: usize,
}

struct DropIter<'a, T> {
    inner: RowIter<'a, T>,
    to_skip: usize,
}

impl<'a, T> Iterator for DropIter<'a, T> {
    type Item = Result<T, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.to_skip > 0 {
            match self.inner.next()? {
                Ok(_) => self.to_skip -= 1,
                Err(e) => {
                    self.to_skip = 0;
                    return Some(Err(e));
                }
            }
        }
        self.inner.next()
    }
}

impl<T: 'static> Node<T> for DropNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        Box::new(DropIter {
            inner: self.upstream.iter(),
            to_skip: self.n,
        })
    }

    fn kind(&self) -> StageKind {
        StageKind::Drop(self.n)
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Yield each distinct element once, at its first occurrence
pub struct UniqueNode<T> {
    upstream: Rc<dyn Node<T>>,
}

struct UniqueIter<'a, T> {
    inner: RowIter<'a, T>,
    seen: HashSet<T>,
}

impl<'a, T: Eq + Hash + Clone> Iterator for UniqueIter<'a, T> {
    type Item = Result<T, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(v) => {
                    if !self.seen.contains(&v) {
                        self.seen.insert(v.clone());
                        return Some(Ok(v));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<T: Eq + Hash + Clone + 'static> Node<T> for UniqueNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        Box::new(UniqueIter {
            inner: self.upstream.iter(),
            seen: HashSet::new(),
        })
    }

    fn kind(&self) -> StageKind {
        StageKind::Unique
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Bernoulli sampling; a fixed seed makes every run pick the same elements
pub struct SampleNode<T> {
    upstream: Rc<dyn Node<T>>,
    fraction: f64,
    seed: Option<u64>,
}

impl<T: 'static> Node<T> for SampleNode<T> {
    fn iter(&self) -> RowIter<'_, T> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let fraction = self.fraction;
        Box::new(self.upstream.iter().filter(move |row| match row {
            Ok(_) => rng.gen::<f64>() < fraction,
            Err(_) => true,
        }))
    }

    fn kind(&self) -> StageKind {
        StageKind::Sample(self.fraction)
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

/// Decode raw lines into records.
///
/// Line numbers are 1-based positions in the upstream sequence. With
/// `skip_header` the first upstream line is consumed without decoding.
pub struct DecodeNode {
    upstream: Rc<dyn Node<String>>,
    decoder: Arc<RecordDecoder>,
    skip_header: bool,
}

struct DecodeIter<'a> {
    inner: RowIter<'a, String>,
    decoder: &'a RecordDecoder,
    skip_header: bool,
    line_number: usize,
}

impl<'a> Iterator for DecodeIter<'a> {
    type Item = Result<Record, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.inner.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            self.line_number += 1;

            if self.skip_header && self.line_number == 1 {
                continue;
            }

            return Some(self.decoder.decode(self.line_number, &line).map_err(|failure| {
                debug!("{}", failure);
                PipelineError::from(failure)
            }));
        }
    }
}

impl Node<Record> for DecodeNode {
    fn iter(&self) -> RowIter<'_, Record> {
        Box::new(DecodeIter {
            inner: self.upstream.iter(),
            decoder: &*self.decoder,
            skip_header: self.skip_header,
            line_number: 0,
        })
    }

    fn kind(&self) -> StageKind {
        StageKind::Decode
    }

    fn lineage(&self) -> Vec<StageKind> {
        chain(&*self.upstream, self.kind())
    }
}

impl<T: 'static> Pipeline<T> {
    /// Transform every element
    pub fn map<U, F>(&self, f: F) -> Pipeline<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Pipeline::from_node(MapNode {
            upstream: Rc::clone(self.node()),
            f: Box::new(f),
        })
    }

    /// Transform every element with a function that may fail.
    /// The first failure aborts whichever action is running.
    pub fn try_map<U, E, F>(&self, f: F) -> Pipeline<U>
    where
        U: 'static,
        E: Into<PipelineError>,
        F: Fn(T) -> Result<U, E> + 'static,
    {
        Pipeline::from_node(TryMapNode {
            upstream: Rc::clone(self.node()),
            f: Box::new(move |v: T| -> Result<U, PipelineError> { f(v).map_err(Into::into) }),
        })
    }

    /// Keep elements for which `predicate` returns true
    pub fn filter<F>(&self, predicate: F) -> Pipeline<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Pipeline::from_node(FilterNode {
            upstream: Rc::clone(self.node()),
            predicate: Box::new(predicate),
        })
    }

    /// Like [`Pipeline::filter`], but the predicate also receives the
    /// zero-based position of the element in the upstream sequence
    pub fn filter_with_index<F>(&self, predicate: F) -> Pipeline<T>
    where
        F: Fn(&T, usize) -> bool + 'static,
    {
        Pipeline::from_node(FilterWithIndexNode {
            upstream: Rc::clone(self.node()),
            predicate: Box::new(predicate),
        })
    }

    /// Keep the first `n` elements
    pub fn take(&self, n: usize) -> Pipeline<T> {
        Pipeline::from_node(TakeNode {
            upstream: Rc::clone(self.node()),
            n,
        })
    }

    /// Skip the first `n` elements
    pub fn drop(&self, n: usize) -> Pipeline<T> {
        Pipeline::from_node(DropNode {
            upstream: Rc::clone(self.node()),
            n,
        })
    }

    /// Keep each element with probability `fraction`
    pub fn sample(&self, fraction: f64, seed: Option<u64>) -> Result<Pipeline<T>, PipelineError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PipelineError::InvalidArgument(format!(
                "Sample fraction must be between 0.0 and 1.0, got {}",
                fraction
            )));
        }

        Ok(Pipeline::from_node(SampleNode {
            upstream: Rc::clone(self.node()),
            fraction,
            seed,
        }))
    }
}

impl<T: Eq + Hash + Clone + 'static> Pipeline<T> {
    /// Remove duplicates, keeping first occurrences in order
    pub fn unique(&self) -> Pipeline<T> {
        Pipeline::from_node(UniqueNode {
            upstream: Rc::clone(self.node()),
        })
    }
}

impl Pipeline<String> {
    /// Decode every line with `decoder`
    pub fn decode(&self, decoder: impl Into<Arc<RecordDecoder>>) -> Pipeline<Record> {
        self.decode_lines(decoder.into(), false)
    }

    pub(crate) fn decode_lines(&self, decoder: Arc<RecordDecoder>, skip_header: bool) -> Pipeline<Record> {
        Pipeline::from_node(DecodeNode {
            upstream: Rc::clone(self.node()),
            decoder,
            skip_header,
        })
    }
}
