//! Client core for the Maconomy timesheet RPC endpoint.
//!
//! # Overview
//! The vendor exposes every operation through one URL that accepts a
//! form-encoded POST whose `requestobj` field holds a JSON envelope. This
//! crate maps login, period fetch, entry save/delete and search onto that
//! transport and normalizes the loose responses into typed records.
//!
//! # Design
//! - `mapper` builds envelopes and parses bodies. Pure and synchronous.
//! - `envelope` pins the wire format: `encode_request` / `decode_response`
//!   work on plain-data `HttpRequest` / `HttpResponse` values.
//! - `transport::HttpTransport` is the only code doing I/O.
//! - `MaconomyClient` glues them together, one async fn per operation. It is
//!   stateless; the caller owns the `Session`.
//! - Failures are `MaconomyError::{Transport, Decode, Rpc}` with their
//!   payloads. Nothing is retried.

pub mod client;
pub mod config;
pub mod date;
pub mod envelope;
pub mod error;
pub mod http;
pub mod mapper;
pub mod transport;
pub mod types;

pub use client::MaconomyClient;
pub use config::{CommonOptions, RpcConfig};
pub use date::{format_date, parse_date};
pub use envelope::{decode_response, encode_request, Operation, RpcEnvelope};
pub use error::{MaconomyError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use transport::{HttpTransport, RpcTransport};
pub use types::{
    DailyEntry, DailyTotal, LoginInfo, Period, PeriodSummary, SaveEntry, SearchKind, SearchResult,
    Session, TimesheetLine,
};
