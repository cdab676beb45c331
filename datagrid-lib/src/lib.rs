//! Filter, sort and paginate engine for virtualized grids
//!
//! Decides which rows of a lazily loaded dataset a grid shows: infers typed
//! filters from free-text keywords, sorts heterogeneous cell content, loads
//! pages as the viewport scrolls, and aggregates column totals. Painting is
//! left to a [`grid::GridRenderer`].

pub mod error;
pub mod filter;
pub mod grid;
pub mod model;
pub mod pagination;
pub mod source;
pub mod view;

mod config;

pub use config::*;
pub use error::Error;
pub use grid::Grid;
pub use grid::GridRenderer;
pub use grid::GridView;
