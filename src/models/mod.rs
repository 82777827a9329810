pub mod config;
pub mod session;
pub mod version;

pub use config::{AppConfig, ExportConfig, LlmConfig, ServerConfig};
pub use session::{CanvasPatch, LogoSession, TextLayerPatch};
pub use version::{SymbolVersion, VersionHistory, VersionId};
