pub mod mood;

pub use mood::{Mood, ParseMoodError};
