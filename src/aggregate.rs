use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use crate::endpoint::Endpoint;
use crate::error::ApiError;

/// Anything that can answer a GET for a path with a subscription key.
///
/// [`crate::Client`] is the real implementation; tests substitute canned
/// responses.
pub trait Fetch {
    fn fetch(&self, path: &str, api_key: &str) -> Result<Value, ApiError>;
}

impl Fetch for crate::Client {
    fn fetch(&self, path: &str, api_key: &str) -> Result<Value, ApiError> {
        self.call(path, api_key)
    }
}

#[derive(Debug)]
pub struct Failure {
    pub label: String,
    pub error: ApiError,
}

/// Outcome of driving a fetcher over a list of endpoints.
///
/// `results` keeps one entry per successful label in enumeration order.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub results: Map<String, Value>,
    pub failures: Vec<Failure>,
    pub attempted: usize,
}

impl Aggregation {
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Errors if any call failed and `strict` is set.
    pub fn check(&self, strict: bool) -> Result<()> {
        if strict && !self.is_complete() {
            let labels: Vec<&str> = self.failures.iter().map(|f| f.label.as_str()).collect();
            bail!(
                "{} of {} API call(s) failed: {}",
                self.failed(),
                self.attempted,
                labels.join(", ")
            );
        }
        Ok(())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.results)
    }
}

/// Calls every endpoint in order, one at a time, keeping going past failures.
pub fn collect<F: Fetch + ?Sized>(
    fetcher: &F,
    endpoints: &[Endpoint],
    api_key: &str,
    progress: bool,
) -> Aggregation {
    let pb = if progress {
        let pb = ProgressBar::new(endpoints.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {wide_bar} {msg}") {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut agg = Aggregation::default();
    for endpoint in endpoints {
        pb.set_message(endpoint.label.clone());
        agg.attempted += 1;

        match fetcher.fetch(&endpoint.path, api_key) {
            Ok(value) => {
                tracing::info!(label = %endpoint.label, path = %endpoint.path, "fetched");
                agg.results.insert(endpoint.label.clone(), value);
            }
            Err(error) => {
                tracing::warn!(label = %endpoint.label, path = %endpoint.path, "API call failed: {}", error);
                agg.failures.push(Failure {
                    label: endpoint.label.clone(),
                    error,
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    agg
}
