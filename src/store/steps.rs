//! Step document parsing and indexed lookup

use serde::Deserialize;
use thiserror::Error;

use crate::domain::step::{DefaultRecord, ResolvedStep, StepRecord};

/// Errors raised while reading a step document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read step source {origin}: {source}")]
    Unreachable {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed step document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Step index {index} appears more than once")]
    DuplicateIndex { index: usize },
    #[error("Step indices must run from 0 without gaps; missing {missing}")]
    MissingIndex { missing: usize },
}

/// On-disk shape of the step document
#[derive(Debug, Clone, Deserialize)]
pub struct StepDocument {
    #[serde(default)]
    pub default: DefaultRecord,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

impl StepDocument {
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Immutable set of loaded steps
///
/// Records are kept sorted so the record for step `i` sits at position `i`.
#[derive(Debug, Clone)]
pub struct StepStore {
    steps: Vec<StepRecord>,
    defaults: DefaultRecord,
}

impl StepStore {
    /// Builds a store, rejecting documents whose indices are not exactly `0..n`
    pub fn from_document(document: StepDocument) -> Result<Self, StoreError> {
        let StepDocument {
            default,
            mut steps,
        } = document;
        steps.sort_by_key(|step| step.index);

        for (position, step) in steps.iter().enumerate() {
            if step.index < position {
                return Err(StoreError::DuplicateIndex { index: step.index });
            }
            if step.index > position {
                return Err(StoreError::MissingIndex { missing: position });
            }
        }

        Ok(Self {
            steps,
            defaults: default,
        })
    }

    /// Parses and validates a JSON step document
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        Self::from_document(StepDocument::parse(text)?)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn defaults(&self) -> &DefaultRecord {
        &self.defaults
    }

    /// Raw record at `index`, without fallbacks
    pub fn record(&self, index: usize) -> Option<&StepRecord> {
        self.steps.get(index)
    }

    /// Record at `index` merged with the default record
    pub fn resolve(&self, index: usize) -> Option<ResolvedStep> {
        self.record(index).map(|record| record.resolve(&self.defaults))
    }
}
