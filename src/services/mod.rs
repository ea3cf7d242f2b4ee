pub mod cleanup;
pub mod mapper;

pub use cleanup::CleanupTask;
pub use mapper::{CreateMappingRequest, MapperService};
