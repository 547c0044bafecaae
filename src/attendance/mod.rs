//! Attendance time tracking: session state machine, elapsed-time ticker and
//! regularization checks.

pub mod clock;
pub mod machine;
pub mod regularization;
pub mod ticker;

pub use clock::{Clock, SystemClock};
pub use machine::{AttendanceError, AttendanceSessionMachine};
pub use regularization::RegularizationWindow;
