pub mod credentials;
pub mod token;
pub mod token_provider;

pub use credentials::Credentials;
pub use token::AccessToken;
pub use token_provider::TokenProvider;
