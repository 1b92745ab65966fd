//! Capture flow on the camera screen.

use crate::error::{AppError, Result};
use log::debug;
use std::path::PathBuf;

/// Where the camera screen is in the capture → review → save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStage {
    #[default]
    Preview,
    Paused,
    Processing,
    Review,
}

/// Tracks the capture stage.
///
/// Each capture gets a generation number so a result that finishes after the
/// user left the screen (or captured again) can be told apart and dropped.
#[derive(Debug, Default)]
pub struct CaptureSession {
    stage: CaptureStage,
    result_path: Option<PathBuf>,
    generation: u64,
    saving: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> CaptureStage {
        self.stage
    }

    /// Whether `generation` is still the capture this session waits for.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn check_generation(&self, generation: u64) -> Result<()> {
        if self.is_current(generation) {
            Ok(())
        } else {
            Err(AppError::InvalidState(format!(
                "capture {} was superseded by {}",
                generation, self.generation
            )))
        }
    }

    fn transition(
        &mut self,
        expected: &[CaptureStage],
        next: CaptureStage,
        action: &str,
    ) -> Result<()> {
        if !expected.contains(&self.stage) {
            return Err(AppError::InvalidState(format!(
                "cannot {} while {:?}",
                action, self.stage
            )));
        }
        debug!("Capture stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
        Ok(())
    }

    /// Pauses or resumes the live preview. Returns the new stage.
    pub fn toggle_preview(&mut self) -> Result<CaptureStage> {
        if self.stage == CaptureStage::Preview {
            self.transition(&[CaptureStage::Preview], CaptureStage::Paused, "pause")?;
        } else {
            self.transition(&[CaptureStage::Paused], CaptureStage::Preview, "resume")?;
        }
        Ok(self.stage)
    }

    /// Starts processing a new capture and returns its generation.
    pub fn begin_capture(&mut self) -> Result<u64> {
        self.transition(&[CaptureStage::Preview], CaptureStage::Processing, "capture")?;
        self.generation += 1;
        Ok(self.generation)
    }

    pub fn finish_processing(&mut self, generation: u64, result_path: PathBuf) -> Result<()> {
        self.check_generation(generation)?;
        self.transition(&[CaptureStage::Processing], CaptureStage::Review, "show result")?;
        self.result_path = Some(result_path);
        Ok(())
    }

    pub fn fail_processing(&mut self, generation: u64) -> Result<()> {
        self.check_generation(generation)?;
        self.transition(&[CaptureStage::Processing], CaptureStage::Preview, "abort processing")
    }

    /// Discards the result and returns to the preview.
    pub fn cancel(&mut self) -> Result<()> {
        if self.saving {
            return Err(AppError::InvalidState("cannot cancel while saving".to_string()));
        }
        self.transition(&[CaptureStage::Review], CaptureStage::Preview, "cancel")?;
        self.result_path = None;
        Ok(())
    }

    /// Marks a save as in progress and returns the result path to copy.
    /// The session stays in review until `finish_save` or `fail_save`.
    pub fn begin_save(&mut self) -> Result<PathBuf> {
        match (self.stage, &self.result_path, self.saving) {
            (CaptureStage::Review, Some(path), false) => {
                self.saving = true;
                Ok(path.clone())
            }
            (CaptureStage::Review, _, true) => {
                Err(AppError::InvalidState("a save is already in progress".to_string()))
            }
            _ => Err(AppError::InvalidState(format!(
                "cannot save while {:?}",
                self.stage
            ))),
        }
    }

    pub fn finish_save(&mut self) -> Result<()> {
        if !self.saving {
            return Err(AppError::InvalidState("no save in progress".to_string()));
        }
        self.transition(&[CaptureStage::Review], CaptureStage::Preview, "finish save")?;
        self.saving = false;
        self.result_path = None;
        Ok(())
    }

    /// Keeps the result for another try after a failed copy.
    pub fn fail_save(&mut self) {
        self.saving = false;
    }

    /// Returns to the preview unconditionally, e.g. when leaving the screen.
    /// Any capture still processing is superseded.
    pub fn reset(&mut self) {
        self.stage = CaptureStage::Preview;
        self.result_path = None;
        self.saving = false;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        Toggle,
        Capture,
        Processed,
        ProcessingFailed,
        Cancel,
        BeginSave,
        FinishSave,
    }

    const EVENTS: [Event; 7] = [
        Event::Toggle,
        Event::Capture,
        Event::Processed,
        Event::ProcessingFailed,
        Event::Cancel,
        Event::BeginSave,
        Event::FinishSave,
    ];

    const STAGES: [CaptureStage; 4] = [
        CaptureStage::Preview,
        CaptureStage::Paused,
        CaptureStage::Processing,
        CaptureStage::Review,
    ];

    /// Builds a session in `stage` and returns it with its latest generation.
    fn session_in(stage: CaptureStage) -> (CaptureSession, u64) {
        let mut session = CaptureSession::new();
        let mut generation = 0;
        match stage {
            CaptureStage::Preview => {}
            CaptureStage::Paused => {
                session.toggle_preview().unwrap();
            }
            CaptureStage::Processing => generation = session.begin_capture().unwrap(),
            CaptureStage::Review => {
                generation = session.begin_capture().unwrap();
                session
                    .finish_processing(generation, PathBuf::from("out.jpg"))
                    .unwrap();
            }
        }
        assert_eq!(session.stage(), stage);
        (session, generation)
    }

    fn apply(session: &mut CaptureSession, generation: u64, event: Event) -> Result<()> {
        match event {
            Event::Toggle => session.toggle_preview().map(|_| ()),
            Event::Capture => session.begin_capture().map(|_| ()),
            Event::Processed => session.finish_processing(generation, PathBuf::from("out.jpg")),
            Event::ProcessingFailed => session.fail_processing(generation),
            Event::Cancel => session.cancel(),
            Event::BeginSave => session.begin_save().map(|_| ()),
            Event::FinishSave => session.finish_save(),
        }
    }

    #[test]
    fn only_listed_transitions_are_accepted() {
        let allowed = [
            (CaptureStage::Preview, Event::Toggle, CaptureStage::Paused),
            (CaptureStage::Paused, Event::Toggle, CaptureStage::Preview),
            (CaptureStage::Preview, Event::Capture, CaptureStage::Processing),
            (CaptureStage::Processing, Event::Processed, CaptureStage::Review),
            (CaptureStage::Processing, Event::ProcessingFailed, CaptureStage::Preview),
            (CaptureStage::Review, Event::Cancel, CaptureStage::Preview),
            (CaptureStage::Review, Event::BeginSave, CaptureStage::Review),
        ];

        for stage in STAGES {
            for event in EVENTS {
                let (mut session, generation) = session_in(stage);
                let result = apply(&mut session, generation, event);

                match allowed.iter().find(|(from, on, _)| *from == stage && *on == event) {
                    Some((_, _, to)) => {
                        assert!(result.is_ok(), "{:?} on {:?} was rejected", event, stage);
                        assert_eq!(session.stage(), *to, "{:?} on {:?}", event, stage);
                    }
                    None => {
                        assert!(
                            matches!(result, Err(AppError::InvalidState(_))),
                            "{:?} on {:?} was accepted",
                            event,
                            stage
                        );
                        assert_eq!(session.stage(), stage, "{:?} on {:?} moved", event, stage);
                    }
                }
            }
        }
    }

    #[test]
    fn save_returns_to_preview() {
        let (mut session, _) = session_in(CaptureStage::Review);
        assert_eq!(session.begin_save().unwrap(), PathBuf::from("out.jpg"));
        session.finish_save().unwrap();
        assert_eq!(session.stage(), CaptureStage::Preview);
        assert!(session.begin_save().is_err());
    }

    #[test]
    fn second_save_is_refused_while_one_is_pending() {
        let (mut session, _) = session_in(CaptureStage::Review);
        session.begin_save().unwrap();

        assert!(matches!(session.begin_save(), Err(AppError::InvalidState(_))));
        assert!(session.cancel().is_err());
        assert_eq!(session.stage(), CaptureStage::Review);

        session.finish_save().unwrap();
        assert!(session.finish_save().is_err());
    }

    #[test]
    fn failed_save_can_be_retried() {
        let (mut session, _) = session_in(CaptureStage::Review);
        session.begin_save().unwrap();
        session.fail_save();
        assert_eq!(session.stage(), CaptureStage::Review);
        assert_eq!(session.begin_save().unwrap(), PathBuf::from("out.jpg"));
    }

    #[test]
    fn result_of_superseded_capture_is_rejected() {
        let mut session = CaptureSession::new();
        let first = session.begin_capture().unwrap();
        session.reset();
        let second = session.begin_capture().unwrap();
        assert_ne!(first, second);
        assert!(!session.is_current(first));

        assert!(matches!(
            session.finish_processing(first, PathBuf::from("old.jpg")),
            Err(AppError::InvalidState(_))
        ));
        assert!(session.fail_processing(first).is_err());
        assert_eq!(session.stage(), CaptureStage::Processing);

        session
            .finish_processing(second, PathBuf::from("new.jpg"))
            .unwrap();
        assert_eq!(session.begin_save().unwrap(), PathBuf::from("new.jpg"));
    }

    #[test]
    fn reset_clears_review() {
        let (mut session, _) = session_in(CaptureStage::Review);
        session.begin_save().unwrap();
        session.reset();
        assert_eq!(session.stage(), CaptureStage::Preview);
        assert!(session.begin_save().is_err());
    }
}
