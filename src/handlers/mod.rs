/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, validating it, calling the appropriate
/// repository functions, and returning a properly formatted response.

mod deck_handlers;
mod card_handlers;
mod review_handlers;

// Re-export all handlers
pub use deck_handlers::*;
pub use card_handlers::*;
pub use review_handlers::*;
