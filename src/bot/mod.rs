/// Callback payload encoding
pub mod callback;
/// Routing of commands and clicks to the flows
pub mod dispatcher;
/// Command flow state machines
pub mod flows;
/// Telegram update handlers
pub mod handlers;
/// Telegram API calls with retry
pub mod resilient;
/// Pagination and multi-select helpers
pub mod selection;
/// In-memory session registry
pub mod session_store;
/// Per-user conversation state
pub mod state;
/// Outgoing chat seam
pub mod transport;
/// Message texts and keyboards
pub mod views;

pub use dispatcher::FlowDispatcher;
pub use session_store::SessionStore;
