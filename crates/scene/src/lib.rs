pub mod corpus;
pub mod framing;
pub mod language;
pub mod motion;
pub mod reconcile;
pub mod selection;
pub mod visual;
pub mod word;

pub use corpus::*;
pub use framing::*;
pub use motion::*;
pub use reconcile::*;
pub use selection::*;
pub use visual::*;
pub use word::*;
