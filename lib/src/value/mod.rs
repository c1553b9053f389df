mod value;
mod source;
mod sink;
mod mapper;

pub use value::*;
pub use source::*;
pub use sink::*;
pub use mapper::*;
