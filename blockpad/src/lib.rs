pub mod catalog;
pub mod codegen;
pub mod exec;
pub mod workspace;

pub use catalog::{BlockTemplate, Catalog, Category};
pub use workspace::{BlockId, BlockInstance, InsertTarget, Workspace};
