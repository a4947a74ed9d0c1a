pub mod macros;
pub mod reading;
pub mod station;
pub mod summary;
pub mod window;

pub use reading::*;
pub use station::*;
pub use summary::*;
pub use window::*;
