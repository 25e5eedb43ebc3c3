pub mod catalog;
pub mod coordinates;
pub mod macros;
pub mod observation;
pub mod time;


pub use catalog::*;
pub use coordinates::*;
pub use observation::*;
pub use time::*;
