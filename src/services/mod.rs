pub mod llm_client;
pub mod renderer;
pub mod session_store;
pub mod symbol_service;

pub use llm_client::{GenerationError, OpenAiClient, SymbolGenerator};
pub use renderer::RenderService;
pub use session_store::SessionStore;
pub use symbol_service::{extract_svg_markup, SymbolError, SymbolService};
