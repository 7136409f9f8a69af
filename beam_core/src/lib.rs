//! # beam_core - Beam Analysis Engine
//!
//! `beam_core` computes shear, moment, deflection and safety margins for a
//! single-span beam under one of three support conditions and one of two load
//! types, using closed-form classical formulas. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from a [`BeamConfiguration`] to results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Never throws on input**: Bad inputs become [`Warning`]s on the result
//! - **Injected persistence**: Storage lives behind [`store::KeyValueStore`]
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::{evaluate, AnalysisSettings, BeamConfiguration, SupportType, LoadType};
//!
//! let config = BeamConfiguration {
//!     support_type: SupportType::Cantilever,
//!     load_type: LoadType::UniformDistributed,
//!     ..Default::default()
//! };
//! let evaluation = evaluate(&config, &AnalysisSettings::default());
//!
//! assert!((evaluation.result.moment_max_nm - 900_000.0).abs() < 1e-6);
//! let json = serde_json::to_string_pretty(&evaluation).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`configuration`] - Beam configuration, clamping and unit toggling
//! - [`calculations`] - Solver, diagram sampler and the export bundle
//! - [`equations`] - Closed-form formulas, plot shapes and citations
//! - [`validation`] - Warning taxonomy and staged input validation
//! - [`codec`] - Share tokens and share links
//! - [`store`] - Scenario store over an injected key/value backend
//! - [`session`] - Delayed recalculation of the latest configuration
//! - [`report`] - Configuration summary and report lines
//! - [`settings`] - Engine settings
//! - [`materials`] - Material constants
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - `file_io` - File-backed store and settings loading (native targets)

pub mod calculations;
pub mod codec;
pub mod configuration;
pub mod equations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod materials;
pub mod report;
pub mod session;
pub mod settings;
pub mod store;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{evaluate, solve, AnalysisResult, DiagramSeries, Evaluation};
pub use configuration::{BeamConfiguration, LoadType, SectionShape, SupportType};
pub use errors::{CalcError, CalcResult};
pub use materials::Material;
pub use settings::AnalysisSettings;
pub use units::UnitSystem;
pub use validation::{validate, Severity, Stage, Warning, WarningCode};
