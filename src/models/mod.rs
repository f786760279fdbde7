pub mod background;
pub mod gemini;
pub mod request;
pub mod result;

pub use background::*;
pub use gemini::*;
pub use request::*;
pub use result::*;
