//! Pull-based frame stream
//!
//! The decoding / pose-estimation layer hands frames to the core through
//! `FrameSource`. The core pulls until `EndOfStream`; a caller cancels a run
//! by simply not producing more frames.

use super::landmarks::{Detection, Frame};
use crate::error::SourceError;

/// One frame with its pose detection
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInput {
    pub frame: Frame,
    pub detection: Detection,
}

impl FrameInput {
    pub fn new(frame: Frame, detection: Detection) -> Self {
        Self { frame, detection }
    }

    pub fn missing(frame: Frame) -> Self {
        Self {
            frame,
            detection: Detection::Missing,
        }
    }
}

/// Item pulled from a frame source
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    Frame(FrameInput),
    EndOfStream,
}

/// Producer of frames in strictly increasing index order
pub trait FrameSource {
    /// Pull the next frame, `EndOfStream`, or a fatal read failure
    fn next_event(&mut self) -> Result<StreamEvent, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn next_event(&mut self) -> Result<StreamEvent, SourceError> {
        (**self).next_event()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_event(&mut self) -> Result<StreamEvent, SourceError> {
        (**self).next_event()
    }
}

/// Infallible source over an iterator of frames
pub struct IterSource<I> {
    frames: I,
}

impl<I: Iterator<Item = FrameInput>> IterSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(frames: T) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl<I: Iterator<Item = FrameInput>> FrameSource for IterSource<I> {
    fn next_event(&mut self) -> Result<StreamEvent, SourceError> {
        Ok(match self.frames.next() {
            Some(frame) => StreamEvent::Frame(frame),
            None => StreamEvent::EndOfStream,
        })
    }
}

/// Source over an iterator whose items may fail
pub struct ResultSource<I> {
    items: I,
}

impl<I: Iterator<Item = Result<FrameInput, SourceError>>> ResultSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(items: T) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<I: Iterator<Item = Result<FrameInput, SourceError>>> FrameSource for ResultSource<I> {
    fn next_event(&mut self) -> Result<StreamEvent, SourceError> {
        match self.items.next() {
            Some(Ok(frame)) => Ok(StreamEvent::Frame(frame)),
            Some(Err(err)) => Err(err),
            None => Ok(StreamEvent::EndOfStream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_source_terminates() {
        let mut source = IterSource::new(vec![FrameInput::missing(Frame::new(0, 0.0))]);
        assert!(matches!(source.next_event(), Ok(StreamEvent::Frame(_))));
        assert_eq!(source.next_event().unwrap(), StreamEvent::EndOfStream);
        assert_eq!(source.next_event().unwrap(), StreamEvent::EndOfStream);
    }

    #[test]
    fn test_result_source_propagates_failure() {
        let mut source = ResultSource::new(vec![
            Ok(FrameInput::missing(Frame::new(0, 0.0))),
            Err(SourceError::Fatal("camera unplugged".into())),
        ]);
        assert!(source.next_event().is_ok());
        assert!(matches!(source.next_event(), Err(SourceError::Fatal(_))));
    }
}
