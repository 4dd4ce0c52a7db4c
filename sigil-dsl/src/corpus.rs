//! Corpus and document validation harness
//!
//! Two consumers of the parser live here: a labeled-sample corpus checker
//! (valid samples must parse with an empty error list, invalid samples must
//! fail somewhere) and a document sweep that extracts declaration blocks and
//! reports per-block results.

use crate::extract::extract_blocks;
use crate::parser::{parse, DslError};
use serde::{Deserialize, Serialize};

/// A corpus file groups labeled samples for one declaration kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusFile {
    pub declaration_type: String,
    pub valid_samples: Vec<CorpusSample>,
    pub invalid_samples: Vec<CorpusSample>,
}

/// One labeled code sample. Invalid samples name their expected error class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSample {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub error_type: Option<String>,
}

/// Outcome for a single corpus sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub id: String,
    pub passed: bool,
    /// Error text when the sample's behavior differed from its label.
    pub detail: Option<String>,
}

/// Aggregate outcome for one corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub declaration_type: String,
    pub passed: usize,
    pub failed: usize,
    pub samples: Vec<SampleReport>,
}

/// Load a corpus file from its JSON form.
pub fn load_corpus(json: &str) -> Result<CorpusFile, serde_json::Error> {
    serde_json::from_str(json)
}

/// Check every sample in a corpus file against the parser.
pub fn validate_corpus(corpus: &CorpusFile) -> CorpusReport {
    let mut samples = Vec::new();

    for sample in &corpus.valid_samples {
        let report = match check_source(&sample.code) {
            Ok(_) => SampleReport {
                id: sample.id.clone(),
                passed: true,
                detail: None,
            },
            Err(detail) => SampleReport {
                id: sample.id.clone(),
                passed: false,
                detail: Some(detail),
            },
        };
        samples.push(report);
    }

    for sample in &corpus.invalid_samples {
        let report = match check_source(&sample.code) {
            // An invalid sample that parses clean is the failure case.
            Ok(count) => SampleReport {
                id: sample.id.clone(),
                passed: false,
                detail: Some(format!(
                    "expected a parse failure but got {} declaration(s)",
                    count
                )),
            },
            Err(_) => SampleReport {
                id: sample.id.clone(),
                passed: true,
                detail: None,
            },
        };
        samples.push(report);
    }

    let passed = samples.iter().filter(|s| s.passed).count();
    CorpusReport {
        declaration_type: corpus.declaration_type.clone(),
        passed,
        failed: samples.len() - passed,
        samples,
    }
}

/// Per-block outcome of a document sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockReport {
    /// 1-based starting line of the block in the document.
    pub line: usize,
    pub passed: bool,
    pub declarations: usize,
    pub errors: Vec<String>,
}

/// Aggregate outcome of a document sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub parsed: usize,
    pub failed: usize,
    pub blocks: Vec<BlockReport>,
}

/// Extract every declaration block from a document and parse each one.
pub fn validate_document(content: &str) -> DocumentReport {
    let mut blocks = Vec::new();

    for block in extract_blocks(content) {
        let report = match parse(&block.text) {
            Ok(outcome) if outcome.is_clean() => BlockReport {
                line: block.line,
                passed: true,
                declarations: outcome.declarations.len(),
                errors: Vec::new(),
            },
            Ok(outcome) => BlockReport {
                line: block.line,
                passed: false,
                declarations: outcome.declarations.len(),
                errors: outcome.errors.iter().map(|e| e.to_string()).collect(),
            },
            Err(err) => BlockReport {
                line: block.line,
                passed: false,
                declarations: 0,
                errors: vec![err.to_string()],
            },
        };
        blocks.push(report);
    }

    let parsed = blocks.iter().filter(|b| b.passed).count();
    DocumentReport {
        parsed,
        failed: blocks.len() - parsed,
        blocks,
    }
}

/// A source is acceptable when it lexes, parses, and records no errors.
/// Returns the declaration count on success, the first error text otherwise.
fn check_source(source: &str) -> Result<usize, String> {
    match parse(source) {
        Ok(outcome) if outcome.is_clean() => Ok(outcome.declarations.len()),
        Ok(outcome) => Err(outcome.errors[0].to_string()),
        Err(DslError::Lex(err)) => Err(err.to_string()),
        Err(DslError::Syntax(err)) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_and_invalid_samples() {
        let corpus = CorpusFile {
            declaration_type: "kind".to_string(),
            valid_samples: vec![CorpusSample {
                id: "kind_ok".to_string(),
                code: "(kind Point x ∷ Number)".to_string(),
                error_type: None,
            }],
            invalid_samples: vec![CorpusSample {
                id: "kind_missing_name".to_string(),
                code: "(kind)".to_string(),
                error_type: Some("missing_name".to_string()),
            }],
        };

        let report = validate_corpus(&corpus);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_invalid_sample_that_parses_is_flagged() {
        let corpus = CorpusFile {
            declaration_type: "datum".to_string(),
            valid_samples: vec![],
            invalid_samples: vec![CorpusSample {
                id: "actually_fine".to_string(),
                code: "(datum D ⟦1⟧)".to_string(),
                error_type: Some("bad_value".to_string()),
            }],
        };

        let report = validate_corpus(&corpus);
        assert_eq!(report.failed, 1);
        assert!(report.samples[0].detail.is_some());
    }

    #[test]
    fn test_document_sweep() {
        let doc = "\
Notes on the model.

(kind Point x ∷ Number y ∷ Number)

Broken block below.

(kind)
";
        let report = validate_document(doc);
        assert_eq!(report.parsed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.blocks[0].declarations, 1);
        assert_eq!(report.blocks[1].declarations, 0);
        assert!(!report.blocks[1].errors.is_empty());
    }
}
