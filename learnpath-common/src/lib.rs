//! # LearnPath Common Library
//!
//! Shared code for the LearnPath e-learning backend including:
//! - Catalog and learner record models
//! - Progress aggregation and achievements
//! - Course recommendation engine
//! - Catalog filtering, quiz grading and learner settings
//! - In-memory record store with simulated latency
//! - Configuration loading

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod quiz;
pub mod recommend;
pub mod seed;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
pub use models::{Course, Difficulty, LearnerId, ProgressRecord};
pub use progress::{compute_achievements, compute_stats, Achievement, OverallStats};
pub use recommend::{get_recommendations, RecommendedCourse};
pub use store::LearnStore;
