//! Pulse Core Library
//!
//! Per-topic chronic disease risk assessment:
//! - CSV import for indicator exports and individual health records
//! - Long-to-wide reshaping with a canonical topic registry
//! - Median-split labels and leakage-safe feature selection
//! - Random forest, logistic regression and linear SVM classifiers over aprender
//! - Holdout-based model selection per topic
//! - Intervention planning for batch rows and ad-hoc input
//! - Threshold-rule monitor for individual records
//! - Yearly topic trends and CSV report export

pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod import;
pub mod label;
pub mod models;
pub mod monitor;
pub mod pipeline;
pub mod planner;
pub mod predict;
pub mod report;
pub mod reshape;
pub mod trainer;
pub mod trend;

pub use classifier::{Classifier, ClassifierParams};
pub use config::Config;
pub use error::{Error, Result};
pub use features::FeatureMatrix;
pub use import::{fingerprint, parse_health_csv, parse_indicator_csv, IndicatorImport};
pub use models::{
    ClassifierKind, IndicatorRecord, InterventionPlan, Recommendation, RiskAssessment, TopicId,
    TopicModel, TopicRegistry, WideTable,
};
pub use monitor::{
    Comparator, DetectionResult, HealthValues, MonitorConfig, MonitorRule, ThresholdMonitor,
};
pub use pipeline::{RiskPipeline, RiskRun};
pub use predict::{AdHocInput, BatchPredictor};
pub use report::{ModelReport, ReportRow, RiskReport, TopicFailure};
pub use trainer::{
    CandidateOutcome, CandidateScore, Holdout, RiskModelTrainer, TrainedModel, TrainingConfig,
};
pub use trend::{TrendRow, TrendTable};
