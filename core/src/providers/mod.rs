pub mod azure;
pub mod factory;

pub use azure::AzureOpenAIProvider;
pub use factory::create_provider;
