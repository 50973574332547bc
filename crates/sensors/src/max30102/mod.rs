pub mod driver;
pub mod registers;

pub use driver::Max30102Driver;
