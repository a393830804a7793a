pub mod memory;
pub mod mock_data;

pub use memory::InMemoryCatalog;
