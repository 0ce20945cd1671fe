//! # Huddle Client
//!
//! Posts SurrealQL text to a SurrealDB HTTP endpoint on behalf of either a
//! trusted service account or a signed-in user session.
//!
//! ```rust,no_run
//! use huddle_client::{Auth, QueryClient, QueryOptions};
//! use huddle_config::ConfigLoader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load(None)?;
//! let client = QueryClient::new(&config.database)?;
//! if let Some(service) = &config.database.service {
//!     let all = client
//!         .query("SELECT * FROM a; SELECT * FROM b", QueryOptions::complete(), Auth::Service(service))
//!         .await?;
//!     println!("{}", all);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod report;
mod session;

pub use client::{Auth, QueryClient, QueryOptions, StatementResult};
pub use error::{QueryError, Result};
pub use report::{ErrorReporter, ReportingClient, TracingReporter};
pub use session::{RefreshingSession, Session, StaticSession, TokenRefresher};
