pub mod atomic;
pub mod file;
pub mod journal;
pub mod memory;

pub use file::FileConfigStore;
pub use journal::DecisionJournal;
pub use memory::MemoryConfigStore;
