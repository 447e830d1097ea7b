use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Интервалы между проверками статуса.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollSchedule {
	/// `fast` для первых `fast_attempts` проверок, дальше `slow`.
	Progressive {
		fast: Duration,
		fast_attempts: u32,
		slow: Duration,
	},
	Fixed(Duration),
}

impl PollSchedule {
	/// Пауза перед следующей проверкой, когда уже сделано `done` проверок.
	pub fn delay(&self, done: u32) -> Duration {
		match *self {
			PollSchedule::Progressive {
				fast,
				fast_attempts,
				slow,
			} => {
				if done < fast_attempts {
					fast
				} else {
					slow
				}
			}
			PollSchedule::Fixed(interval) => interval,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
	Stop,
	Continue,
}

#[derive(Debug, PartialEq)]
pub enum PollStep<T> {
	Pending,
	Done(T),
}

#[derive(Debug, PartialEq)]
pub enum PollOutcome<T> {
	Finished(T),
	Cancelled,
}

/// Опрашивает `check` до терминального ответа или отмены. Отмена
/// прерывает и паузу, и запрос в полете. Лимита попыток нет.
pub async fn poll_until<T, F, Fut>(
	schedule: PollSchedule,
	cancel: &CancellationToken,
	on_error: ErrorPolicy,
	mut check: F,
) -> Result<PollOutcome<T>, ApiError>
where
	F: FnMut(u32) -> Fut,
	Fut: Future<Output = Result<PollStep<T>, ApiError>>,
{
	let mut done = 0u32;
	loop {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
			_ = sleep(schedule.delay(done)) => {}
		}

		done += 1;
		let result = tokio::select! {
			biased;
			_ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
			result = check(done) => result,
		};

		match result {
			Ok(PollStep::Done(value)) => {
				debug!("polling finished after {} checks", done);
				return Ok(PollOutcome::Finished(value));
			}
			Ok(PollStep::Pending) => {}
			Err(e) => match on_error {
				ErrorPolicy::Stop => return Err(e),
				ErrorPolicy::Continue => warn!("status check #{} failed: {}", done, e),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::Arc;

	const FAST: PollSchedule = PollSchedule::Fixed(Duration::from_millis(1));

	#[test]
	fn progressive_delays() {
		let schedule = PollSchedule::Progressive {
			fast: Duration::from_secs(2),
			fast_attempts: 3,
			slow: Duration::from_secs(5),
		};
		assert_eq!(schedule.delay(0), Duration::from_secs(2));
		assert_eq!(schedule.delay(2), Duration::from_secs(2));
		assert_eq!(schedule.delay(3), Duration::from_secs(5));
		assert_eq!(schedule.delay(100), Duration::from_secs(5));
	}

	#[tokio::test]
	async fn stops_on_first_terminal_step() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = calls.clone();
		let outcome = poll_until(FAST, &CancellationToken::new(), ErrorPolicy::Stop, |n| {
			counter.fetch_add(1, Ordering::SeqCst);
			async move {
				if n == 3 {
					Ok(PollStep::Done("ready"))
				} else {
					Ok(PollStep::Pending)
				}
			}
		})
		.await
		.unwrap();
		assert_eq!(outcome, PollOutcome::Finished("ready"));
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn stop_policy_surfaces_error() {
		let result = poll_until::<(), _, _>(FAST, &CancellationToken::new(), ErrorPolicy::Stop, |_| async {
			Err(ApiError::Network)
		})
		.await;
		assert!(matches!(result, Err(ApiError::Network)));
	}

	#[tokio::test]
	async fn continue_policy_keeps_polling_after_errors() {
		let outcome = poll_until(FAST, &CancellationToken::new(), ErrorPolicy::Continue, |n| async move {
			if n < 3 {
				Err(ApiError::Network)
			} else {
				Ok(PollStep::Done(n))
			}
		})
		.await
		.unwrap();
		assert_eq!(outcome, PollOutcome::Finished(3));
	}

	#[tokio::test]
	async fn cancellation_interrupts_in_flight_check() {
		let cancel = CancellationToken::new();
		let trigger = cancel.clone();
		let outcome = poll_until::<(), _, _>(FAST, &cancel, ErrorPolicy::Stop, move |_| {
			let trigger = trigger.clone();
			async move {
				trigger.cancel();
				std::future::pending::<Result<PollStep<()>, ApiError>>().await
			}
		})
		.await
		.unwrap();
		assert_eq!(outcome, PollOutcome::Cancelled);
	}

	#[tokio::test]
	async fn cancelled_token_never_checks() {
		let cancel = CancellationToken::new();
		cancel.cancel();
		let calls = Arc::new(AtomicU32::new(0));
		let counter = calls.clone();
		let outcome = poll_until::<(), _, _>(FAST, &cancel, ErrorPolicy::Stop, |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			async { Ok(PollStep::Pending) }
		})
		.await
		.unwrap();
		assert_eq!(outcome, PollOutcome::Cancelled);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}
}
