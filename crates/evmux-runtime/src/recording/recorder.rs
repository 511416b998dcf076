//! Input/output recording for one channel.

use super::{Record, RecordStream, RecordingError};
use crate::channel::ChannelConfig;
use evmux_event::Event;
use std::path::PathBuf;
use tracing::warn;

/// Optional input and output logs owned by a channel.
///
/// Channels hold a `Recorder` in their core and call into it around
/// delivery and posting. Both streams are disabled until [`open`] is
/// called with a config that names them.
///
/// [`open`]: Self::open
#[derive(Debug, Default)]
pub struct Recorder {
    input: Option<RecordStream>,
    output: Option<RecordStream>,
}

impl Recorder {
    /// Creates a recorder with both streams disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the streams `config` enables, replacing any open ones.
    ///
    /// Either both requested streams open or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Open`] for the first stream that can not
    /// be created.
    pub fn open(&mut self, config: &ChannelConfig) -> Result<(), RecordingError> {
        let delete = config.delete_recordings_on_abort;

        let input = config
            .input_recording()
            .map(|path| RecordStream::open(path, delete))
            .transpose()?;

        let output = match config
            .output_recording()
            .map(|path| RecordStream::open(path, delete))
            .transpose()
        {
            Ok(output) => output,
            Err(e) => {
                if let Some(input) = input {
                    if let Err(cleanup) = input.discard() {
                        warn!(error = %cleanup, "failed to discard input recording");
                    }
                }
                return Err(e);
            }
        };

        self.input = input;
        self.output = output;
        Ok(())
    }

    /// Returns `true` if either stream is open.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.input.is_some() || self.output.is_some()
    }

    /// Appends a delivered event to the input log, if enabled.
    ///
    /// # Errors
    ///
    /// Propagates [`RecordStream::append`] failures.
    pub fn record_input(&mut self, event: &Event) -> Result<(), RecordingError> {
        match self.input.as_mut() {
            Some(stream) => stream.append(&Record::from(event)),
            None => Ok(()),
        }
    }

    /// Appends a posted event to the output log, if enabled.
    ///
    /// # Errors
    ///
    /// Propagates [`RecordStream::append`] failures.
    pub fn record_output(&mut self, event: &Event) -> Result<(), RecordingError> {
        match self.output.as_mut() {
            Some(stream) => stream.append(&Record::from(event)),
            None => Ok(()),
        }
    }

    /// Flushes both streams without closing them.
    ///
    /// # Errors
    ///
    /// Returns the first flush failure.
    pub fn flush(&mut self) -> Result<(), RecordingError> {
        for stream in self.input.iter_mut().chain(self.output.iter_mut()) {
            stream.flush()?;
        }
        Ok(())
    }

    /// Closes both streams, moving temp logs to their final names.
    ///
    /// Both streams are always closed; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Write`] or [`RecordingError::Rename`].
    pub fn finish(&mut self) -> Result<Vec<PathBuf>, RecordingError> {
        let mut finished = Vec::new();
        let mut first_error = None;
        for stream in [self.input.take(), self.output.take()].into_iter().flatten() {
            match stream.finish() {
                Ok(path) => finished.push(path),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(finished),
        }
    }

    /// Closes both streams, unlinking temp logs.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordingError::Remove`] failure.
    pub fn discard(&mut self) -> Result<(), RecordingError> {
        let mut first_error = None;
        for stream in [self.input.take(), self.output.take()].into_iter().flatten() {
            if let Err(e) = stream.discard() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{read_records, temp_path};
    use evmux_event::EventCategory;
    use tempfile::TempDir;

    fn event(id: &str) -> Event {
        Event::parse(id, EventCategory::Data).unwrap()
    }

    #[test]
    fn disabled_recorder_accepts_everything() {
        let mut recorder = Recorder::new();
        recorder.open(&ChannelConfig::default()).unwrap();
        assert!(!recorder.is_recording());
        recorder.record_input(&event("a")).unwrap();
        recorder.record_output(&event("b")).unwrap();
        assert!(recorder.finish().unwrap().is_empty());
    }

    #[test]
    fn finish_renames_both_logs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.log");
        let output = dir.path().join("out.log");
        let config = ChannelConfig::default()
            .with_input_recording(&input)
            .with_output_recording(&output);

        let mut recorder = Recorder::new();
        recorder.open(&config).unwrap();
        assert!(temp_path(&input).exists());
        recorder.record_input(&event("in.1")).unwrap();
        recorder.record_output(&event("out.1")).unwrap();
        recorder.record_output(&event("out.2")).unwrap();

        let finished = recorder.finish().unwrap();
        assert_eq!(finished, vec![input.clone(), output.clone()]);
        assert!(!recorder.is_recording());
        assert_eq!(read_records(&input).unwrap().len(), 1);
        assert_eq!(read_records(&output).unwrap().len(), 2);
    }

    #[test]
    fn discard_removes_temp_logs() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.log");
        let config = ChannelConfig::default().with_output_recording(&output);

        let mut recorder = Recorder::new();
        recorder.open(&config).unwrap();
        recorder.record_output(&event("x")).unwrap();
        recorder.discard().unwrap();

        assert!(!output.exists());
        assert!(!temp_path(&output).exists());
    }

    #[test]
    fn failed_output_rolls_back_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.log");
        let config = ChannelConfig::default()
            .with_input_recording(&input)
            .with_output_recording(dir.path().join("missing/out.log"));

        let mut recorder = Recorder::new();
        let err = recorder.open(&config).unwrap_err();
        assert!(matches!(err, RecordingError::Open { .. }));
        assert!(!recorder.is_recording());
        assert!(!temp_path(&input).exists());
    }
}
