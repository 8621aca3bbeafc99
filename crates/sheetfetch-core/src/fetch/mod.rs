//! Spreadsheet-driven image fetcher.
//!
//! Walks records in row order and downloads every `http…` cell of the
//! configured column range to `{id}_{index:02}{ext}`. Existing destinations
//! are skipped without a request, so re-running the same sheet only fetches
//! what is missing. A URL that keeps failing is abandoned after the
//! configured number of attempts and the batch moves on.
//!
//! Runs strictly sequentially and takes no lock on the output directory;
//! two runs against the same directory at once are not supported.

mod target;

pub use target::DownloadTarget;

use crate::config::FetchConfig;
use crate::retry::{run_with_retry, Exhausted, Sleeper, ThreadSleeper};
use crate::sheet::{read_table, Record, Table};
use crate::storage;
use crate::transport::{CurlTransport, FetchError, Transport};
use anyhow::{Context, Result};
use std::fs;

/// Per-URL outcome, delivered to the observer passed to [`Fetcher::run`].
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// Body downloaded and written to the destination.
    Saved {
        target: &'a DownloadTarget,
        bytes: usize,
    },
    /// Destination already exists; no request was made.
    Skipped { target: &'a DownloadTarget },
    /// One attempt failed; a delay follows.
    Retry {
        target: &'a DownloadTarget,
        attempt: u32,
        max_attempts: u32,
        error: &'a FetchError,
    },
    /// Every attempt failed; the URL is abandoned.
    GaveUp {
        target: &'a DownloadTarget,
        attempts: u32,
        error: &'a FetchError,
    },
}

/// Totals for one fetch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Records with a usable identifier.
    pub records: usize,
    /// Qualifying URLs seen.
    pub urls: usize,
    pub saved: usize,
    pub skipped: usize,
    pub abandoned: usize,
    pub bytes: u64,
}

pub struct Fetcher<T, S = ThreadSleeper> {
    config: FetchConfig,
    transport: T,
    sleeper: S,
}

impl<T: Transport> Fetcher<T, ThreadSleeper> {
    pub fn new(config: FetchConfig, transport: T) -> Self {
        Self::with_sleeper(config, transport, ThreadSleeper)
    }
}

impl<T: Transport, S: Sleeper> Fetcher<T, S> {
    pub fn with_sleeper(config: FetchConfig, transport: T, sleeper: S) -> Self {
        Self {
            config,
            transport,
            sleeper,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Resolves the configured columns against `table` and runs every row.
    pub fn run_table(
        &mut self,
        table: &Table,
        observer: &mut dyn FnMut(&FetchEvent<'_>),
    ) -> Result<FetchReport> {
        let id_col = self
            .config
            .id_column
            .resolve(table)
            .context("identifier column")?;
        let records = table.records(id_col, &self.config.image_columns);
        self.run(&records, observer)
    }

    /// Processes `records` in order. Only setup failures (output directory
    /// cannot be created) are returned as errors; per-URL failures are
    /// reported through `observer` and counted in the report.
    pub fn run(
        &mut self,
        records: &[Record],
        observer: &mut dyn FnMut(&FetchEvent<'_>),
    ) -> Result<FetchReport> {
        let output_dir = self.config.output_dir.clone();
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;
        let delay = self.config.delay();
        let mut report = FetchReport::default();
        tracing::info!(records = records.len(), dir = %output_dir.display(), "fetch started");

        for record in records {
            let Some(id) = record.sanitized_identifier() else {
                tracing::trace!(row = record.row, "row has no identifier");
                continue;
            };
            report.records += 1;

            for (index, url) in record.http_urls().enumerate() {
                let target = DownloadTarget::new(&id, index, url.trim(), &output_dir);
                report.urls += 1;

                if target.path.exists() {
                    tracing::info!(file = %target.file_name(), "already downloaded, skipping");
                    report.skipped += 1;
                    observer(&FetchEvent::Skipped { target: &target });
                    continue;
                }

                match self.download(&target, observer) {
                    Ok(bytes) => {
                        tracing::info!(file = %target.file_name(), url = %target.url, bytes, "saved");
                        report.saved += 1;
                        report.bytes += bytes as u64;
                        observer(&FetchEvent::Saved {
                            target: &target,
                            bytes,
                        });
                        self.sleeper.sleep(delay);
                    }
                    Err(Exhausted { attempts, last }) => {
                        tracing::warn!(url = %target.url, attempts, error = %last, "giving up");
                        report.abandoned += 1;
                        observer(&FetchEvent::GaveUp {
                            target: &target,
                            attempts,
                            error: &last,
                        });
                    }
                }
            }
        }

        tracing::info!(
            saved = report.saved,
            skipped = report.skipped,
            abandoned = report.abandoned,
            "fetch finished"
        );
        Ok(report)
    }

    fn download(
        &mut self,
        target: &DownloadTarget,
        observer: &mut dyn FnMut(&FetchEvent<'_>),
    ) -> Result<usize, Exhausted<FetchError>> {
        let policy = self.config.retry_policy();
        let transport = &mut self.transport;
        run_with_retry(
            &policy,
            &mut self.sleeper,
            |attempt, error| {
                tracing::warn!(
                    url = %target.url,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %error,
                    "download attempt failed"
                );
                observer(&FetchEvent::Retry {
                    target,
                    attempt,
                    max_attempts: policy.max_attempts,
                    error,
                });
            },
            |_| -> Result<usize, FetchError> {
                let body = transport.get(&target.url)?;
                storage::write_atomic(&target.path, &body)?;
                Ok(body.len())
            },
        )
    }
}

/// Reads the configured table and downloads its images over HTTP.
pub fn run_fetch(
    config: &FetchConfig,
    observer: &mut dyn FnMut(&FetchEvent<'_>),
) -> Result<FetchReport> {
    config.validate()?;
    let table = read_table(&config.table, config.sheet.as_deref())
        .with_context(|| format!("failed to load {}", config.table.display()))?;
    let transport = CurlTransport::new(config.timeout(), config.user_agent.clone())
        .with_headers(config.headers.clone());
    Fetcher::new(config.clone(), transport).run_table(&table, observer)
}
