//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod callback;
pub mod generation;
pub mod stager;
pub mod storage;

pub use callback::*;
pub use generation::*;
pub use stager::*;
pub use storage::*;
