pub mod epoch;
pub mod error;
pub mod protocol;
pub mod query;
pub mod request;
pub mod scheduler;

pub use epoch::*;
pub use error::*;
pub use protocol::*;
pub use query::*;
pub use request::*;
pub use scheduler::*;
