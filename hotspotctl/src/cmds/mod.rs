pub use geocode::*;
pub use init::*;
pub use list::*;
pub use resolve::*;

mod geocode;
mod init;
mod list;
mod resolve;
