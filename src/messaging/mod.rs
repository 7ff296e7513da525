pub mod dispatcher;
pub mod outcome;
pub mod payload;
pub mod request;

pub use dispatcher::MessageDispatcher;
pub use outcome::DeliveryOutcome;
pub use payload::PayloadBuilder;
