pub mod compress;
pub mod create;
pub mod decompress;
pub mod extract;
pub mod list;

pub use compress::run as compress;
pub use create::run as create;
pub use decompress::run as decompress;
pub use extract::run as extract;
pub use list::run as list;
