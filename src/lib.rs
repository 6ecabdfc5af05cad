//! Populates the fields of a record from named sources of raw strings.
//!
//! A record declares, per field, which sources may supply it and under
//! which key. [`Sources`] asks each source for the raw values of every
//! annotated field and coerces them into the field's declared type.
//!
//! ```
//! use std::time::Duration;
//!
//! use handover::{record, values, Sources};
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Server {
//!         #[from(env = "PORT")]
//!         pub port: u16,
//!         #[from(env = "TIMEOUT")]
//!         pub timeout: Duration,
//!         #[from(flags = "tag")]
//!         pub tags: Vec<String>,
//!     }
//! }
//!
//! let mut server = Server::default();
//! Sources::new()
//!     .with("env", |key| {
//!         Ok(match key {
//!             "PORT" => values!["8080"],
//!             "TIMEOUT" => values!["1m30s"],
//!             _ => values![],
//!         })
//!     })
//!     .with("flags", |_| Ok(values!["api", "edge"]))
//!     .populate(&mut server)?;
//!
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.timeout, Duration::from_secs(90));
//! assert_eq!(server.tags, ["api", "edge"]);
//! # Ok::<(), handover::Error>(())
//! ```

pub mod coerce;
mod error;
mod macros;
pub mod populate;

pub use coerce::{Coerce, CoerceError, Json, Kind};
pub use error::Error;
pub use populate::{
    Destination, EnvSource, Field, MapSource, Record, Resolve, ResolveError, Source, Sources,
    TomlSource, Values,
};
