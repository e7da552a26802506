//! Tool-layout optimization for CNC turret magazines.
//!
//! A turret holds cutting tools in a ring of slots. Machining a part runs a
//! fixed sequence of operations, each needing one tool type, and every
//! rotation to the next tool costs travel and wear. This crate scores
//! layouts by simulating production and searches for better ones with a
//! genetic algorithm.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Tool`, `ToolLife`, `Turret`,
//!   `ProductionReport`, tool-life tables and slot distributions
//! - **`ga`**: Layout search: `Optimizer`, `OptimizerConfig`, `Fitness`,
//!   and the crossover/repair/mutation operators
//! - **`validation`**: Input integrity checks (unknown tools, reserved ids,
//!   distribution coverage, GA parameter ranges)
//! - **`error`**: `TurretError` and the crate `Result` alias
//!
//! # Example
//!
//! ```
//! use u_turret::models::{ToolLife, ToolLifeTable, Turret};
//!
//! let table: ToolLifeTable = [(1, 150), (2, 100), (3, 150), (4, 600)]
//!     .into_iter()
//!     .map(|(id, life)| (id, ToolLife::Finite(life)))
//!     .collect();
//! let mut turret = Turret::new(&[1, 1, 3, 2, 2, 3, 4, 2], &table).unwrap();
//!
//! assert_eq!(turret.find(4, 6), vec![(6, 0)]);
//! let report = turret.score(1, &[4, 2, 3, 4, 1], 6).unwrap();
//! assert_eq!(report.score, 6);
//! ```

pub mod error;
pub mod ga;
pub mod models;
pub mod validation;

pub use error::{Result, TurretError};
