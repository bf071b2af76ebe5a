//! Optional observability helpers for broker operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cognito_broker.operation` with the
//!   `operation` and `stage` fields.
//! - Enable `metrics` to increment the `cognito_broker_operation_total` counter for every
//!   attempt, success, and failure, labeled by `operation` + `outcome`.

// self
use crate::_prelude::*;

/// Broker operations that carry spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Liveness probe against the service endpoint.
	HealthCheck,
	/// Authoritative property to identity + OpenID token exchange.
	IdentityToken,
	/// OpenID token to temporary credentials exchange.
	Credentials,
	/// Both exchanges composed.
	Authorize,
	/// Identity pool listing.
	ListIdentities,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::HealthCheck => "health_check",
			Operation::IdentityToken => "identity_token",
			Operation::Credentials => "credentials",
			Operation::Authorize => "authorize",
			Operation::ListIdentities => "list_identities",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a broker operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Increments `cognito_broker_operation_total` for one outcome (when `metrics` is enabled).
pub fn record_operation_outcome(operation: Operation, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"cognito_broker_operation_total",
		"operation" => operation.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (operation, outcome);
}

/// Runs `fut` inside a `cognito_broker.operation` span and counts the attempt and its outcome.
pub(crate) async fn observe<T, Fut>(
	operation: Operation,
	stage: &'static str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record_operation_outcome(operation, OperationOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let result = {
		use tracing::Instrument;

		let span =
			tracing::info_span!("cognito_broker.operation", operation = operation.as_str(), stage);

		fut.instrument(span).await
	};
	#[cfg(not(feature = "tracing"))]
	let result = {
		let _ = stage;

		fut.await
	};
	let outcome =
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure };

	record_operation_outcome(operation, outcome);

	result
}
