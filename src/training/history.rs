use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::Result;

/// The cumulative loss of every epoch, in order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    losses: Vec<f32>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, loss: f32) {
        self.losses.push(loss);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.losses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    pub fn first(&self) -> Option<f32> {
        self.losses.first().copied()
    }

    pub fn last(&self) -> Option<f32> {
        self.losses.last().copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.losses
    }

    /// Writes the history as json to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
