//! Submission draft workflow

mod draft;

pub use draft::{Draft, DraftEvent, DraftState, StepPrompt};
