//! # Beam Equations
//!
//! All formulas used by the engine, kept in one place:
//!
//! - [`section`] - Cross-section properties (I, Z, A) and the section geometry check
//! - [`beam`] - Exact closed-form extremes and internal-force distributions
//! - [`shapes`] - Deflected-shape curves for plotting only
//! - [`registry`] - Equation identifiers and citations for audit trails
//!
//! The safety and serviceability checks only read [`beam`]; nothing outside
//! the diagram sampler reads [`shapes`].
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Positive causes tension on bottom fiber (sagging)
//! - **Shear**: Positive when left side moves up relative to right
//! - **Deflection**: Positive downward

pub mod beam;
pub mod registry;
pub mod section;
pub mod shapes;

pub use registry::{CodeReference, Equation};
pub use section::{section_properties, SectionProperties};
