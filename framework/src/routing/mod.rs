mod router;

pub use router::{BoxedHandler, Router};
