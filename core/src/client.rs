//! One async function per domain operation.
//!
//! # Design
//! `MaconomyClient` composes the mapper and a transport: build the envelope,
//! execute it, parse the body. It keeps no state between calls. The session
//! is owned by the caller and passed into every call, so the same client can
//! serve several sessions and be shared across concurrent tasks.

use chrono::NaiveDate;

use crate::config::RpcConfig;
use crate::error::Result;
use crate::mapper;
use crate::transport::{HttpTransport, RpcTransport};
use crate::types::{
    DailyTotal, LoginInfo, Period, PeriodSummary, SaveEntry, SearchKind, SearchResult, Session,
};

/// Async client for the timesheet operations, generic over the transport.
#[derive(Debug, Clone)]
pub struct MaconomyClient<T = HttpTransport> {
    transport: T,
}

impl MaconomyClient<HttpTransport> {
    /// Client talking HTTP to the configured endpoint.
    pub fn from_config(config: RpcConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: RpcTransport> MaconomyClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginInfo> {
        let json = self.transport.execute(&mapper::build_login(username, password)).await?;
        Ok(mapper::parse_login(&json))
    }

    pub async fn get_period(&self, session: &Session, start: NaiveDate, end: NaiveDate) -> Result<Period> {
        let json = self
            .transport
            .execute(&mapper::build_get_period(session, start, end))
            .await?;
        Ok(mapper::parse_period(&json))
    }

    /// Returns the instance key of the created or updated line.
    pub async fn save_entry(&self, session: &Session, entry: &SaveEntry) -> Result<String> {
        let json = self
            .transport
            .execute(&mapper::build_save_entry(session, entry))
            .await?;
        Ok(mapper::parse_saved_key(&json))
    }

    /// Not idempotent: deleting a key that is already gone is a vendor error.
    pub async fn delete_entry(&self, session: &Session, line_key: &str, date: NaiveDate) -> Result<()> {
        let envelope = mapper::build_delete_entry(session, line_key, date)?;
        self.transport.execute(&envelope).await?;
        Ok(())
    }

    pub async fn search(&self, session: &Session, kind: &SearchKind, query: &str) -> Result<Vec<SearchResult>> {
        let json = self
            .transport
            .execute(&mapper::build_search(session, kind, query))
            .await?;
        Ok(mapper::parse_search_results(&json))
    }

    pub async fn timesheet_periods(&self, session: &Session) -> Result<Vec<PeriodSummary>> {
        let json = self
            .transport
            .execute(&mapper::build_timesheet_periods(session))
            .await?;
        Ok(mapper::parse_timesheet_periods(&json))
    }

    pub async fn timesheet_totals(&self, session: &Session, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyTotal>> {
        let json = self
            .transport
            .execute(&mapper::build_timesheet_totals(session, from, to))
            .await?;
        Ok(mapper::parse_timesheet_totals(&json))
    }
}
