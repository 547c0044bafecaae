use chrono::{Local, NaiveDate, NaiveDateTime};

/// Wall clock in the employee's local time, the frame the backend records
/// attendance in.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::Clock;
    use chrono::{Duration, NaiveDateTime};
    use std::sync::Mutex;

    /// Clock that only moves when told to
    pub(crate) struct ManualClock(Mutex<NaiveDateTime>);

    impl ManualClock {
        pub(crate) fn at(start: NaiveDateTime) -> Self {
            Self(Mutex::new(start))
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            *self.0.lock().unwrap()
        }
    }
}
