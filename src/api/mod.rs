pub mod compose;
pub mod layers;
pub mod symbol;
pub mod versions;

pub use compose::{
    handle_compose, handle_compose_session, handle_export_pdf, handle_export_png,
    handle_export_svg, ComposeRequest, PdfExportQuery, PngExportQuery,
};
pub use compose::{
    __path_handle_compose, __path_handle_compose_session, __path_handle_export_pdf,
    __path_handle_export_png, __path_handle_export_svg,
};
pub use layers::{
    handle_get_canvas, handle_get_logo, handle_get_slogan, handle_patch_canvas,
    handle_patch_logo, handle_patch_slogan,
};
pub use layers::{
    __path_handle_get_canvas, __path_handle_get_logo, __path_handle_get_slogan,
    __path_handle_patch_canvas, __path_handle_patch_logo, __path_handle_patch_slogan,
};
pub use symbol::{
    handle_generate, handle_iterate, GenerateRequest, IterateRequest, SymbolApiError,
    SymbolResponse,
};
pub use symbol::{__path_handle_generate, __path_handle_iterate};
pub use versions::{
    handle_delete_version, handle_list_versions, handle_reset_session, handle_select_version,
};
pub use versions::{
    __path_handle_delete_version, __path_handle_list_versions, __path_handle_reset_session,
    __path_handle_select_version,
};
