pub mod transition_log;

pub use transition_log::{read_csv, TransitionCause, TransitionLog, TransitionRecord};
