//! Fraud detection core
//!
//! - `patterns`: shared phrase sets and extraction regexes
//! - `classifier`: weighted keyword scoring into Safe / Unknown / Fraud
//! - `extractor`: UPI handles, phone numbers, links, accounts and keywords

pub mod classifier;
pub mod extractor;
pub mod patterns;

pub use classifier::{ClassificationResult, Classifier, FraudLabel, SignalBreakdown};
pub use extractor::{Extractor, IntelligenceBundle};
pub use patterns::PatternLibrary;
