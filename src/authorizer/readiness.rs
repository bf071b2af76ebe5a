//! Tri-state readiness flag and the background probe that settles it.

// crates.io
use tokio::{runtime::Handle, sync::watch};
// self
use crate::{
	_prelude::*,
	authorizer::Authorizer,
	obs::{self, Operation},
	service::IdentityService,
};

/// Outcome of the construction-time liveness probe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Readiness {
	/// The probe has not finished yet.
	#[default]
	Unknown,
	/// The endpoint answered the probe.
	Ready,
	/// The probe failed or could not run.
	Unready,
}
impl Readiness {
	/// Whether the probe has finished.
	pub const fn is_settled(&self) -> bool {
		!matches!(self, Self::Unknown)
	}

	/// Whether the probe finished successfully.
	pub const fn is_ready(&self) -> bool {
		matches!(self, Self::Ready)
	}

	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unknown => "unknown",
			Self::Ready => "ready",
			Self::Unready => "unready",
		}
	}
}
impl Display for Readiness {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Shared write-once readiness cell.
///
/// Clones observe the same value. Only the first settlement sticks; later writes are ignored.
#[derive(Clone, Debug)]
pub struct ReadinessFlag(Arc<watch::Sender<Readiness>>);
impl ReadinessFlag {
	/// Returns the current state.
	pub fn get(&self) -> Readiness {
		*self.0.borrow()
	}

	/// Settles the flag; returns `false` if it was already settled or `state` is `Unknown`.
	pub fn settle(&self, state: Readiness) -> bool {
		self.0.send_if_modified(|current| {
			if current.is_settled() || !state.is_settled() {
				return false;
			}

			*current = state;

			true
		})
	}

	/// Waits until the flag is settled.
	pub async fn settled(&self) -> Readiness {
		let mut rx = self.0.subscribe();
		// The sender lives in `self`, so the channel cannot close while we wait.
		let state = rx.wait_for(Readiness::is_settled).await.map(|state| *state);

		state.unwrap_or_else(|_| self.get())
	}
}
impl Default for ReadinessFlag {
	fn default() -> Self {
		Self(Arc::new(watch::Sender::new(Readiness::Unknown)))
	}
}

impl<S> Authorizer<S>
where
	S: ?Sized + IdentityService,
{
	/// Issues one liveness request and returns the raw response body.
	///
	/// Any HTTP response counts as alive; only transport failures are errors. Calls are
	/// independent of each other and never touch the readiness flag.
	pub async fn health_check(&self) -> Result<String> {
		obs::observe(Operation::HealthCheck, "health_check", self.service.ping()).await
	}

	pub(super) fn spawn_readiness_probe(&self) {
		let service = self.service.clone();
		let flag = self.readiness.clone();

		match Handle::try_current() {
			Ok(handle) => {
				handle.spawn(async move {
					let probe = service.ping();

					match obs::observe(Operation::HealthCheck, "readiness_probe", probe).await {
						Ok(_body) => {
							flag.settle(Readiness::Ready);

							#[cfg(feature = "tracing")]
							tracing::debug!("Identity service endpoint is ready.");
						},
						Err(_e) => {
							flag.settle(Readiness::Unready);

							#[cfg(feature = "tracing")]
							tracing::warn!(
								error = %_e,
								"Identity service endpoint is unreachable."
							);
						},
					}
				});
			},
			Err(_e) => {
				flag.settle(Readiness::Unready);

				#[cfg(feature = "tracing")]
				tracing::warn!(
					error = %_e,
					"No tokio runtime is available; the readiness probe cannot run."
				);
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn flag_settles_once() {
		let flag = ReadinessFlag::default();
		let clone = flag.clone();

		assert_eq!(flag.get(), Readiness::Unknown);
		assert!(!flag.settle(Readiness::Unknown));
		assert!(flag.settle(Readiness::Unready));
		assert!(!clone.settle(Readiness::Ready));
		assert_eq!(clone.get(), Readiness::Unready);
	}

	#[tokio::test]
	async fn settled_waits_for_a_writer() {
		let flag = ReadinessFlag::default();
		let writer = flag.clone();

		tokio::spawn(async move {
			writer.settle(Readiness::Ready);
		});

		assert_eq!(flag.settled().await, Readiness::Ready);
		assert!(flag.get().is_ready());
	}
}
