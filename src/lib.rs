//! # Harvest - a typed client for the Harvest time-tracking API
//!
//! Harvest wraps every resource body in a single-key JSON envelope such as
//! `{"user": {...}}`. This crate implements the five CRUD verbs plus toggle
//! once, generically, for any type implementing [`Resource`], and classifies
//! failures into not-found, rate-limited and server-explained errors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use harvest::{Api, Harvest, Project};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), harvest::Error> {
//!     let api = Api::builder()
//!         .subdomain("acme")?
//!         .basic_auth("me@example.com", "secret")?
//!         .build()?;
//!     let harvest = Harvest::new(api);
//!
//!     let mut project = Project {
//!         name: "Apollo".to_string(),
//!         client_id: 7,
//!         ..Project::default()
//!     };
//!     let id = harvest.projects().create(&mut project).await?;
//!     println!("Created project {}", id);
//!
//!     let active = harvest.projects().toggle(&mut project).await?;
//!     println!("Project is now active: {}", active);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns its result or exactly one [`Error`]. Classified
//! failures are tested with capability checks:
//!
//! ```no_run
//! use harvest::{Api, Harvest};
//!
//! # async fn example() -> Result<(), harvest::Error> {
//! # let harvest = Harvest::new(Api::builder().subdomain("acme")?.build()?);
//! match harvest.users().find(999, None).await {
//!     Ok(user) => println!("Found {}", user.email),
//!     Err(e) if e.is_not_found() => println!("{}", e),
//!     Err(e) if e.is_rate_limit_reached() => {
//!         println!("Throttled, try again in {:?}", e.retry_after());
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is retried automatically. [`Error::is_retryable`] marks the one
//! failure kind that may succeed later; the retry policy is yours.

mod api;
mod classify;
pub mod envelope;
mod error;
pub mod metadata;
mod params;
pub mod rate_limit;
mod resource;
mod resources;
mod response;
mod service;
mod time;
mod transport;

pub use api::{Api, ApiBuilder, Endpoint};
pub use classify::{classify, ErrorPayload};
pub use envelope::Envelope;
pub use error::{
    BoxError, Error, Result, DEFAULT_NOT_FOUND_MESSAGE, DEFAULT_RATE_LIMIT_MESSAGE,
    DEFAULT_RESPONSE_ERROR_MESSAGE,
};
pub use params::{InvoiceStatus, Params};
pub use resource::{Resource, Toggle};
pub use resources::{
    Account, Client, Company, DayEntry, Invoice, Modules, Project, Task, TaskAssignment, User,
};
pub use response::RawResponse;
pub use service::{Harvest, Service};
pub use time::{ShortDate, Timeframe};
pub use transport::Transport;
