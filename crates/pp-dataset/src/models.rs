use pp_core::core::QaExample;
use serde::{Deserialize, Serialize};

/// Which trainer recipe a dataset card entry targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFamily {
    GenericPreferenceOptimization,
    GenericInstruction,
}

/// One document of a dataset card.
///
/// A dataset is described by two documents: its family, and where the data
/// lives on a given cluster (`name@cluster`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardEntry {
    Family {
        name: String,
        dataset_family: DatasetFamily,
    },
    Location {
        name: String,
        data: String,
    },
}

/// A raw GSM8K line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gsm8kRecord {
    pub question: String,
    pub answer: String,
}

impl From<Gsm8kRecord> for QaExample {
    fn from(record: Gsm8kRecord) -> Self {
        QaExample {
            input: record.question,
            label: record.answer,
        }
    }
}

/// Result of a write-once attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { records: usize },
    AlreadyBuilt,
}
