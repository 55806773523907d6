//! WASM bindings for aria-session
//!
//! Exposes the player session to JavaScript. The page supplies a media
//! transport object (usually wrapping an `<audio>` element) and a
//! callback that receives view updates.

mod renderer;
mod session;
mod transport;

pub use renderer::JsRenderer;
pub use session::WasmPlayerSession;
pub use transport::{JsMediaTransport, JsTransport};
