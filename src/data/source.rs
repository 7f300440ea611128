// Source readers: the leaves of every pipeline
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::processing::{Node, Pipeline, PipelineError, RowIter, StageKind};
use super::{Record, RecordDecoder};

/// Lines of a text file. The file is opened on the first pull of every
/// iteration and closed when that iteration is dropped.
pub struct FileSource {
    path: PathBuf,
}

enum LineState {
    Pending,
    Open(Lines<BufReader<File>>),
    Done,
}

struct LineIter<'a> {
    path: &'a Path,
    state: LineState,
}

impl<'a> Iterator for LineIter<'a> {
    type Item = Result<String, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let LineState::Pending = self.state {
            match File::open(self.path) {
                Ok(file) => {
                    debug!("opened {}", self.path.display());
                    self.state = LineState::Open(BufReader::new(file).lines());
                }
                Err(source) => {
                    self.state = LineState::Done;
                    return Some(Err(self.io_error(source)));
                }
            }
        }

        let lines = match &mut self.state {
            LineState::Open(lines) => lines,
            _ => return None,
        };

        match lines.next() {
            Some(Ok(line)) => Some(Ok(line)),
            Some(Err(source)) => {
                self.close();
                Some(Err(self.io_error(source)))
            }
            None => {
                self.close();
                None
            }
        }
    }
}

impl<'a> LineIter<'a> {
    fn close(&mut self) {
        if let LineState::Open(_) = self.state {
            debug!("closed {}", self.path.display());
        }
        self.state = LineState::Done;
    }

    fn io_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::Io {
            path: self.path.to_path_buf(),
            source,
        }
    }
}

impl Node<String> for FileSource {
    fn iter(&self) -> RowIter<'_, String> {
        Box::new(LineIter {
            path: &self.path,
            state: LineState::Pending,
        })
    }

    fn kind(&self) -> StageKind {
        StageKind::File(self.path.clone())
    }

    fn lineage(&self) -> Vec<StageKind> {
        vec![self.kind()]
    }
}

/// Integers in `[start, end)`
pub struct RangeSource {
    start: i64,
    end: i64,
}

impl Node<i64> for RangeSource {
    fn iter(&self) -> RowIter<'_, i64> {
        Box::new((self.start..self.end).map(Ok))
    }

    fn kind(&self) -> StageKind {
        StageKind::Range {
            start: self.start,
            end: self.end,
        }
    }

    fn lineage(&self) -> Vec<StageKind> {
        vec![self.kind()]
    }
}

/// Rows held in memory; each iteration yields clones
pub struct MemorySource<T> {
    rows: Vec<T>,
}

impl<T: Clone + 'static> Node<T> for MemorySource<T> {
    fn iter(&self) -> RowIter<'_, T> {
        Box::new(self.rows.iter().cloned().map(Ok))
    }

    fn kind(&self) -> StageKind {
        StageKind::Memory(self.rows.len())
    }

    fn lineage(&self) -> Vec<StageKind> {
        vec![self.kind()]
    }
}

/// Lazy sequence of the lines of a file, without line terminators.
/// Nothing is opened until an action runs.
pub fn from_file<P: AsRef<Path>>(path: P) -> Pipeline<String> {
    Pipeline::from_node(FileSource {
        path: path.as_ref().to_path_buf(),
    })
}

/// Lazy sequence of integers, `start` inclusive and `end` exclusive
pub fn from_range(start: i64, end: i64) -> Pipeline<i64> {
    Pipeline::from_node(RangeSource { start, end })
}

/// Pipeline over rows already in memory
pub fn from_vec<T: Clone + 'static>(rows: Vec<T>) -> Pipeline<T> {
    Pipeline::from_node(MemorySource { rows })
}

/// Records decoded from a delimited text file.
///
/// With `has_header` the first line is skipped. Decode failures report
/// physical file line numbers either way.
pub fn from_delimited<P: AsRef<Path>>(
    path: P,
    decoder: impl Into<Arc<RecordDecoder>>,
    has_header: bool,
) -> Pipeline<Record> {
    from_file(path).decode_lines(decoder.into(), has_header)
}
