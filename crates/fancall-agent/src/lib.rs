//! Fancall companion agent.
//!
//! Turns a room dispatch into a time-boxed companion session: the job
//! metadata is merged with deployment and persona defaults, the speech,
//! language model and avatar capabilities are built, and the session runs
//! until the free trial elapses or the job is cancelled.

pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod initializer;
pub mod lifecycle;
pub mod prompts;
pub mod resolver;

pub use config::{load_config, Config, ConfigError};
pub use dispatch::{Dispatcher, JobContext};
pub use env::DeploymentEnv;
pub use error::{AvatarSourceError, CredentialError, DispatchError};
pub use initializer::{select_avatar_source, CapabilityInitializer};
pub use lifecycle::{DispatchOutcome, SessionController, SessionHandle, SessionState, TRIAL_DURATION};
pub use resolver::{resolve, Resolved, ResolvedConfig, ValueSource};
