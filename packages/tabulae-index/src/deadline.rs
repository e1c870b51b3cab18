use std::time::{Duration, Instant};

/// Point in time after which an outbound call must be abandoned.
///
/// The deadline belongs to the inbound request; every remote call made on its behalf takes the
/// smaller of the time left and the call's own timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);
impl Deadline {
	pub fn none() -> Self {
		Self(None)
	}

	pub fn at(instant: Instant) -> Self {
		Self(Some(instant))
	}

	pub fn after(duration: Duration) -> Self {
		Self(Some(Instant::now() + duration))
	}

	pub fn instant(&self) -> Option<Instant> {
		self.0
	}

	pub fn is_expired(&self) -> bool {
		self.0.map(|instant| instant <= Instant::now()).unwrap_or(false)
	}

	/// Time budget for the next call, or `None` once the deadline has passed.
	pub fn budget(&self, call_timeout: Duration) -> Option<Duration> {
		match self.0 {
			None => Some(call_timeout),
			Some(instant) => {
				let left = instant.checked_duration_since(Instant::now())?;

				if left.is_zero() { None } else { Some(left.min(call_timeout)) }
			},
		}
	}
}
impl Default for Deadline {
	fn default() -> Self {
		Self::none()
	}
}
