//! Per-(depth, channel) storage of registered slices.

use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView2};

use crate::error::{Result, ZregError};
use crate::frame::ChannelSlice;

/// The cells of one depth, one per channel.
#[derive(Clone, Debug)]
pub struct DepthRow {
    cells: Vec<Option<ChannelSlice>>,
    source: Option<PathBuf>,
}

impl DepthRow {
    fn new(channels: usize) -> Self {
        Self {
            cells: vec![None; channels],
            source: None,
        }
    }

    /// The file this depth was read from, when known.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The source file if recorded, otherwise `depth {depth}`.
    pub fn describe(&self, depth: usize) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => format!("depth {depth}"),
        }
    }

    /// Every channel of this depth has been written.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn slice(&self, channel: usize) -> Option<&ChannelSlice> {
        self.cells.get(channel).and_then(Option::as_ref)
    }

    pub fn slices_mut(&mut self) -> impl Iterator<Item = &mut ChannelSlice> {
        self.cells.iter_mut().flatten()
    }
}

/// Channel index to ordered sequence of slices, one per depth.
///
/// Depth order is the sorted input file order. Each cell is written at most
/// once; depths whose file failed stay empty.
#[derive(Clone, Debug)]
pub struct ResultTable {
    channels: usize,
    rows: Vec<DepthRow>,
}

impl ResultTable {
    pub fn new(depths: usize, channels: usize) -> Self {
        Self {
            channels,
            rows: (0..depths).map(|_| DepthRow::new(channels)).collect(),
        }
    }

    pub fn depth_count(&self) -> usize {
        self.rows.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels
    }

    /// Store a slice in its (depth, channel) cell.
    pub fn insert(&mut self, slice: ChannelSlice) -> Result<()> {
        let (depth, channel) = (slice.depth, slice.channel);
        let cell = self
            .rows
            .get_mut(depth)
            .and_then(|row| row.cells.get_mut(channel))
            .ok_or(ZregError::CellOutOfRange { depth, channel })?;
        if cell.is_some() {
            return Err(ZregError::CellOccupied { depth, channel });
        }
        *cell = Some(slice);
        Ok(())
    }

    /// Store one slice per channel for `depth`.
    pub fn insert_depth(&mut self, depth: usize, slices: Vec<Array2<f32>>) -> Result<()> {
        for (channel, data) in slices.into_iter().enumerate() {
            self.insert(ChannelSlice::new(depth, channel, data))?;
        }
        Ok(())
    }

    /// Record the file `depth` was read from. Failed depths keep theirs too.
    pub fn set_source(&mut self, depth: usize, path: impl Into<PathBuf>) -> Result<()> {
        let row = self
            .rows
            .get_mut(depth)
            .ok_or(ZregError::CellOutOfRange { depth, channel: 0 })?;
        row.source = Some(path.into());
        Ok(())
    }

    pub fn get(&self, depth: usize, channel: usize) -> Option<&ChannelSlice> {
        self.rows.get(depth).and_then(|row| row.slice(channel))
    }

    pub fn row(&self, depth: usize) -> Option<&DepthRow> {
        self.rows.get(depth)
    }

    pub fn is_depth_complete(&self, depth: usize) -> bool {
        self.rows.get(depth).is_some_and(DepthRow::is_complete)
    }

    /// The slices of `channel` in depth order; `None` marks an empty cell.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = Option<&ChannelSlice>> {
        self.rows.iter().map(move |row| row.slice(channel))
    }

    /// Views of `channel` for the given depths, or `None` if any cell is empty.
    pub fn channel_views(
        &self,
        channel: usize,
        depths: std::ops::Range<usize>,
    ) -> Option<Vec<ArrayView2<'_, f32>>> {
        depths
            .map(|depth| self.get(depth, channel).map(|s| s.data.view()))
            .collect()
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [DepthRow] {
        &mut self.rows
    }
}
