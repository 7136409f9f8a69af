//! # Recalculation Session
//!
//! Holds the current configuration of an interactive session and recomputes
//! after an artificial "processing" delay. The delay is cooperative: dropping
//! the future cancels it, and the evaluation that follows always reads the
//! configuration current *when the delay ends*, not when it started.
//!
//! ```rust
//! use beam_core::configuration::BeamConfiguration;
//! use beam_core::session::Recalculator;
//! use beam_core::settings::AnalysisSettings;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = Recalculator::new(BeamConfiguration::default(), AnalysisSettings {
//!     processing_delay_ms: 0,
//!     ..Default::default()
//! });
//! let evaluation = session.recalculate().await;
//! assert!(evaluation.diagram.is_some());
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::watch;

use crate::calculations::{evaluate, Evaluation};
use crate::configuration::BeamConfiguration;
use crate::errors::{CalcError, CalcResult};
use crate::settings::AnalysisSettings;

/// Cloneable handle that replaces the session's configuration
#[derive(Debug, Clone)]
pub struct ConfigUpdater {
    tx: Arc<watch::Sender<BeamConfiguration>>,
}

impl ConfigUpdater {
    pub fn update(&self, config: BeamConfiguration) {
        self.tx.send_replace(config);
    }
}

/// Latest-value session state with delayed recalculation
#[derive(Debug)]
pub struct Recalculator {
    settings: AnalysisSettings,
    tx: Arc<watch::Sender<BeamConfiguration>>,
    rx: watch::Receiver<BeamConfiguration>,
}

impl Recalculator {
    pub fn new(initial: BeamConfiguration, settings: AnalysisSettings) -> Self {
        let (tx, rx) = watch::channel(initial);
        Recalculator {
            settings,
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Replace the current configuration
    pub fn update(&self, config: BeamConfiguration) {
        self.tx.send_replace(config);
    }

    pub fn updater(&self) -> ConfigUpdater {
        ConfigUpdater {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Snapshot of the current configuration
    pub fn current(&self) -> BeamConfiguration {
        self.rx.borrow().clone()
    }

    /// Evaluate the current configuration without waiting
    pub fn evaluate_now(&self) -> Evaluation {
        evaluate(&self.rx.borrow(), &self.settings)
    }

    /// Wait out the processing delay, then evaluate the latest configuration
    pub async fn recalculate(&self) -> Evaluation {
        tokio::time::sleep(self.settings.processing_delay()).await;
        let evaluation = self.evaluate_now();
        tracing::debug!(
            warnings = evaluation.result.warnings.len(),
            "Recalculated after processing delay"
        );
        evaluation
    }

    /// Wait for the next configuration change, then recalculate
    pub async fn next_change(&mut self) -> CalcResult<Evaluation> {
        self.rx.changed().await.map_err(|_| CalcError::Internal {
            message: "configuration channel closed".to_string(),
        })?;
        Ok(self.recalculate().await)
    }
}
