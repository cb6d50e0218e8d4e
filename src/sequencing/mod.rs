pub mod clock;
pub mod note;

pub use clock::Clock;
pub use note::{schedule_note, Note, ScheduleError};
