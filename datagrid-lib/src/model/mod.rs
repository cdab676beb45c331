//! Grid data model

mod column;
mod columns;
mod compare;
mod record;
mod record_serde;
mod row;
mod value;

pub use column::*;
pub use columns::*;
pub use compare::*;
pub use record::*;
pub use row::*;
pub use value::*;
