use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
	NotStarted,
	InFlight,
	Done,
}

/// Не дает запустить одну и ту же операцию (по id задачи или платежа)
/// второй раз, пока первая идет или уже завершилась.
#[derive(Debug, Clone, Default)]
pub struct OnceGuard {
	states: Arc<Mutex<HashMap<String, GuardState>>>,
}

/// Пропуск на выполнение. Если его уронить без `finish`, id снова
/// становится свободным.
#[derive(Debug)]
pub struct GuardTicket {
	guard: OnceGuard,
	id: String,
	finished: bool,
}

impl OnceGuard {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self, id: &str) -> GuardState {
		self.states
			.lock()
			.get(id)
			.copied()
			.unwrap_or(GuardState::NotStarted)
	}

	/// `Err` с текущим состоянием, если id уже занят или завершен.
	pub fn try_start(&self, id: &str) -> Result<GuardTicket, GuardState> {
		let mut states = self.states.lock();
		match states.get(id).copied().unwrap_or(GuardState::NotStarted) {
			GuardState::NotStarted => {
				states.insert(id.to_string(), GuardState::InFlight);
				debug!("guard {}: started", id);
				Ok(GuardTicket {
					guard: self.clone(),
					id: id.to_string(),
					finished: false,
				})
			}
			other => Err(other),
		}
	}

	fn release(&self, id: &str) {
		let mut states = self.states.lock();
		if states.get(id) == Some(&GuardState::InFlight) {
			states.remove(id);
			debug!("guard {}: released", id);
		}
	}

	fn finish(&self, id: &str) {
		self.states.lock().insert(id.to_string(), GuardState::Done);
		debug!("guard {}: done", id);
	}
}

impl GuardTicket {
	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn finish(mut self) {
		self.finished = true;
		self.guard.finish(&self.id);
	}
}

impl Drop for GuardTicket {
	fn drop(&mut self) {
		if !self.finished {
			self.guard.release(&self.id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn second_start_is_rejected_while_in_flight() {
		let guard = OnceGuard::new();
		let ticket = guard.try_start("task-1").unwrap();
		assert_eq!(guard.try_start("task-1").unwrap_err(), GuardState::InFlight);
		assert!(guard.try_start("task-2").is_ok());
		drop(ticket);
	}

	#[test]
	fn dropped_ticket_frees_the_id() {
		let guard = OnceGuard::new();
		drop(guard.try_start("task-1").unwrap());
		assert_eq!(guard.state("task-1"), GuardState::NotStarted);
		assert!(guard.try_start("task-1").is_ok());
	}

	#[test]
	fn finished_id_never_runs_again() {
		let guard = OnceGuard::new();
		guard.try_start("pay-9").unwrap().finish();
		assert_eq!(guard.state("pay-9"), GuardState::Done);
		assert_eq!(guard.try_start("pay-9").unwrap_err(), GuardState::Done);
	}
}
