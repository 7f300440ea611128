// Processing module: the lazy pipeline graph, caching and actions
// Author: Gabriel Demetrios Lafis

mod action;
mod cache;
mod numeric;
mod stage;

pub use action::*;
pub use cache::*;
pub use numeric::*;
pub use stage::*;

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::data::DecodeFailure;

/// A fresh, single-use cursor over the elements of a pipeline
pub type RowIter<'a, T> = Box<dyn Iterator<Item = Result<T, PipelineError>> + 'a>;

/// A node of the pipeline graph: a source leaf or a stage wrapping one upstream.
///
/// Nodes are immutable descriptions. All execution state lives in the
/// iterator returned by [`Node::iter`], so every call starts from scratch.
pub trait Node<T> {
    /// Open a new cursor over this node
    fn iter(&self) -> RowIter<'_, T>;

    /// Describe this node
    fn kind(&self) -> StageKind;

    /// The chain from the root source down to this node
    fn lineage(&self) -> Vec<StageKind>;
}

/// Represents a stage type in the pipeline chain
#[derive(Debug, Clone, PartialEq)]
pub enum StageKind {
    File(PathBuf),
    Range { start: i64, end: i64 },
    Memory(usize),
    Cached(usize),
    Map,
    TryMap,
    Filter,
    FilterWithIndex,
    Take(usize),
    Drop(usize),
    Unique,
    Sample(f64),
    Decode,
}

impl StageKind {
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            StageKind::File(_) | StageKind::Range { .. } | StageKind::Memory(_) | StageKind::Cached(_)
        )
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StageKind::File(path) => write!(f, "file({})", path.display()),
            StageKind::Range { start, end } => write!(f, "range[{}..{})", start, end),
            StageKind::Memory(len) => write!(f, "memory({})", len),
            StageKind::Cached(len) => write!(f, "cache({})", len),
            StageKind::Map => write!(f, "map"),
            StageKind::TryMap => write!(f, "try_map"),
            StageKind::Filter => write!(f, "filter"),
            StageKind::FilterWithIndex => write!(f, "filter_with_index"),
            StageKind::Take(n) => write!(f, "take({})", n),
            StageKind::Drop(n) => write!(f, "drop({})", n),
            StageKind::Unique => write!(f, "unique"),
            StageKind::Sample(fraction) => write!(f, "sample({})", fraction),
            StageKind::Decode => write!(f, "decode"),
        }
    }
}

/// Flat classification of [`PipelineError`] for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Decode,
    EmptySequence,
    Overflow,
    InvalidArgument,
    Other,
}

/// Represents an error raised while running an action
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decode failure: {0}")]
    Decode(#[from] DecodeFailure),
    #[error("{action}() called on an empty sequence")]
    EmptySequence { action: &'static str },
    #[error("{action}() overflowed the element type")]
    Overflow { action: &'static str },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Io { .. } => ErrorKind::Io,
            PipelineError::Decode(_) => ErrorKind::Decode,
            PipelineError::EmptySequence { .. } => ErrorKind::EmptySequence,
            PipelineError::Overflow { .. } => ErrorKind::Overflow,
            PipelineError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PipelineError::Other(_) => ErrorKind::Other,
        }
    }

    /// The decode failure carried by this error, if any
    pub fn as_decode_failure(&self) -> Option<&DecodeFailure> {
        match self {
            PipelineError::Decode(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A lazy, replayable description of a computation over elements of type `T`.
///
/// Transformations return new pipelines and never touch data. Actions walk
/// the chain from its root every time they are called, unless the root is
/// a cache produced by [`Pipeline::cache`].
pub struct Pipeline<T> {
    node: Rc<dyn Node<T>>,
    cached: Option<Rc<CachedDataset<T>>>,
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Pipeline {
            node: Rc::clone(&self.node),
            cached: self.cached.clone(),
        }
    }
}

impl<T: 'static> Pipeline<T> {
    /// Root a pipeline at a custom node
    pub fn from_node<N>(node: N) -> Self
    where
        N: Node<T> + 'static,
    {
        Pipeline {
            node: Rc::new(node),
            cached: None,
        }
    }

    pub(crate) fn node(&self) -> &Rc<dyn Node<T>> {
        &self.node
    }

    /// Open a fresh cursor over the elements of this pipeline
    pub fn iter(&self) -> RowIter<'_, T> {
        self.node.iter()
    }

    /// The stage chain from the root source to this pipeline
    pub fn lineage(&self) -> Vec<StageKind> {
        self.node.lineage()
    }

    /// Render the stage chain, e.g. `range[0..10) -> filter -> take(3)`
    pub fn explain(&self) -> String {
        self.lineage()
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl<T: 'static> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Pipeline").field(&self.explain()).finish()
    }
}
