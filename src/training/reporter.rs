use log::info;

/// Observes the progress of a training.
pub trait Reporter {
    /// Called once at the end of every epoch.
    ///
    /// # Arguments
    /// * `epoch` - The zero based index of the epoch.
    /// * `avg_loss` - The epoch's cumulative loss divided by the amount of samples.
    fn on_epoch_complete(&mut self, epoch: usize, avg_loss: f32);
}

/// Logs every epoch at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn on_epoch_complete(&mut self, epoch: usize, avg_loss: f32) {
        info!("{}", epoch_line(epoch, avg_loss));
    }
}

/// Formats the progress line logged at the end of an epoch.
pub fn epoch_line(epoch: usize, avg_loss: f32) -> String {
    format!("Epoch {epoch}, loss: {avg_loss}")
}

impl<F: FnMut(usize, f32)> Reporter for F {
    fn on_epoch_complete(&mut self, epoch: usize, avg_loss: f32) {
        self(epoch, avg_loss)
    }
}
