pub mod factory;
pub mod file;
pub mod in_memory;
pub mod window;

pub use factory::{SessionStore, create_store};
pub use file::FileChatHistory;
pub use in_memory::InMemoryChatHistory;
pub use window::WindowMemory;
