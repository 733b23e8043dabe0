//! efr-kinetics: lumped pyrolysis kinetics and reactor integration.
//!
//! Provides:
//! - A mechanism model (built-in softwood scheme or YAML file)
//! - Capability traits for states, closed reactors and flow stages
//! - A built-in engine using backward Euler with Newton iterations
//!
//! # Example
//!
//! ```no_run
//! use efr_kinetics::{EnergyEquation, IsolatedReactor, KineticsEngine, LumpedEngine, ReactorKind};
//!
//! let engine = LumpedEngine::softwood()?;
//! let state = engine.state(773.15, 101_325.0, &[("CELL", 0.5), ("LIGC", 0.5)])?;
//! let mut reactor =
//!     engine.isolated_reactor(&state, ReactorKind::ConstantVolume, EnergyEquation::Off)?;
//! reactor.advance(1.0)?;
//! println!("T = {} K", reactor.state().temperature);
//! # Ok::<(), efr_kinetics::KineticsError>(())
//! ```

pub mod debiagi;
pub mod engine;
pub mod error;
pub mod integrator;
mod kinetics;
pub mod mechanism;
pub mod model;
pub mod newton;
pub mod reactor;
pub mod state;

pub use debiagi::phases;
pub use engine::{IntegrationOptions, LumpedEngine};
pub use error::{KineticsError, KineticsResult};
pub use mechanism::{Mechanism, MechanismDef, Reaction, ReactionDef, Species, SpeciesDef};
pub use model::{EnergyEquation, FlowReactor, IsolatedReactor, KineticsEngine, ReactorKind};
pub use newton::NewtonConfig;
pub use reactor::{BatchReactor, FlowStage};
pub use state::ThermoState;
