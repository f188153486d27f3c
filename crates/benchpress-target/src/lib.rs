//! Target devices for benchpress.
//!
//! | Type | Role |
//! |------|------|
//! | [`CouplingMap`] | undirected qubit connectivity with precomputed distances |
//! | [`TopologySpec`] | named or explicit connectivity shape, sized on demand |
//! | [`Backend`] | connectivity plus native gate set |
//! | [`BackendRegistry`] | presets and configured backends by name |
//!
//! # Example
//!
//! ```rust
//! use benchpress_target::{Backend, TopologySpec};
//!
//! let backend = Backend::flexible(10, &"ring".parse::<TopologySpec>().unwrap()).unwrap();
//! assert!(backend.is_connected(9, 0));
//! assert_eq!(backend.two_q_gate(), "cz");
//! ```

pub mod backend;
pub mod coupling;
pub mod error;
pub mod registry;
pub mod topology;

pub use backend::{Backend, U_BASIS, ZSX_BASIS};
pub use coupling::CouplingMap;
pub use error::{ConfigResult, ConfigurationError};
pub use registry::{
    BackendDefinition, BackendRegistry, DEFAULT_BACKEND, presets, require_capacity,
};
pub use topology::TopologySpec;
