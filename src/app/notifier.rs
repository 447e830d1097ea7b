use chrono::{DateTime, Duration, Utc};
use log::{error, info};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::utils::Clock;

pub const NOTIFICATION_TTL_MS: i64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
	Info,
	Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
	pub message: String,
	pub kind: NotificationKind,
	pub shown_at: DateTime<Utc>,
}

/// Одно всплывающее сообщение. Новое заменяет старое, через 3 секунды
/// после показа оно пропадает.
#[derive(Clone)]
pub struct Notifier {
	current: Arc<Mutex<Option<Notification>>>,
	clock: Arc<dyn Clock>,
	ttl: Duration,
}

impl Notifier {
	pub fn new(clock: Arc<dyn Clock>) -> Self {
		Self {
			current: Arc::new(Mutex::new(None)),
			clock,
			ttl: Duration::milliseconds(NOTIFICATION_TTL_MS),
		}
	}

	pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
		let message = message.into();
		match kind {
			NotificationKind::Info => info!("[Notify] {}", message),
			NotificationKind::Error => error!("[Notify] {}", message),
		}
		*self.current.lock() = Some(Notification {
			message,
			kind,
			shown_at: self.clock.now(),
		});
	}

	pub fn info(&self, message: impl Into<String>) {
		self.show(message, NotificationKind::Info)
	}

	pub fn error(&self, message: impl Into<String>) {
		self.show(message, NotificationKind::Error)
	}

	pub fn current(&self) -> Option<Notification> {
		let mut current = self.current.lock();
		let expired = current
			.as_ref()
			.is_some_and(|n| self.clock.now() - n.shown_at >= self.ttl);
		if expired {
			*current = None;
		}
		current.clone()
	}

	pub fn dismiss(&self) {
		*self.current.lock() = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::ManualClock;
	use chrono::TimeZone;

	#[test]
	fn message_expires_after_three_seconds() {
		let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
		let notifier = Notifier::new(clock.clone());

		notifier.error("Balans yetarli emas");
		clock.advance(Duration::milliseconds(2999));
		assert_eq!(
			notifier.current().map(|n| n.kind),
			Some(NotificationKind::Error)
		);

		clock.advance(Duration::milliseconds(1));
		assert!(notifier.current().is_none());
	}

	#[test]
	fn newer_message_replaces_and_restarts_timer() {
		let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
		let notifier = Notifier::new(clock.clone());

		notifier.info("birinchi");
		clock.advance(Duration::seconds(2));
		notifier.info("ikkinchi");
		clock.advance(Duration::seconds(2));
		assert_eq!(notifier.current().map(|n| n.message).as_deref(), Some("ikkinchi"));

		notifier.dismiss();
		assert!(notifier.current().is_none());
	}
}
