//! Developer-authenticated Cognito identity broker.
//!
//! Configuration is validated once, the federation endpoint is probed in the background, and a
//! caller-supplied proof of identity is traded for temporary AWS credentials.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod authorizer;
pub mod config;
pub mod error;
pub mod identity;
pub mod obs;
pub mod service;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _};
