//! The interaction model: requests, responses, and provider states.
//!
//! ## Module Structure
//!
//! - `request` - `ConsumerRequest`, the request the consumer will send
//! - `response` - `ProviderResponse`, the response it expects back
//! - `interaction` - `Interaction` and `ProviderState`

mod interaction;
mod request;
mod response;

pub use interaction::{Interaction, ProviderState};
pub use request::ConsumerRequest;
pub use response::ProviderResponse;
