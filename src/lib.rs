//! Prospect Intelligence Engine
//!
//! Collects financial, transcript and market signals for a sales prospect,
//! turns them into bounded scores and deterministic recommendations, and
//! tracks the prospect through the six-stage sales workflow.

pub mod agents;
pub mod api;
pub mod bus;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod events;
pub mod llm;
pub mod services;
pub mod sources;

// Re-export commonly used types
pub use bus::EventBus;
pub use config::AppConfig;
pub use data::scores::{DataQuality, IntelligenceReport, ReadinessLevel, ScoreSet, UrgencyLevel};
pub use data::workflow::{WorkflowProgress, WorkflowStage, WorkflowState};
pub use error::EngineError;
pub use events::Event;
pub use services::intelligence::{IntelligenceEngine, IntelligenceRequest};
pub use services::workflow::WorkflowTracker;
