use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Источник текущего времени; подменяется в тестах.
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;

	/// Дата в формате `YYYY-MM-DD`.
	fn today(&self) -> String {
		self.now().format("%Y-%m-%d").to_string()
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// Часы, которые двигаются только вручную.
#[derive(Debug)]
pub struct ManualClock {
	now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
	pub fn new(now: DateTime<Utc>) -> Self {
		Self {
			now: Mutex::new(now),
		}
	}

	pub fn advance(&self, by: Duration) {
		let mut now = self.now.lock();
		*now += by;
	}

	pub fn set(&self, to: DateTime<Utc>) {
		*self.now.lock() = to;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> DateTime<Utc> {
		*self.now.lock()
	}
}
