mod cursor;
mod errors;
mod movie;
mod movie_list;
mod node;
mod source;

pub use cursor::CursorState;
pub use errors::{MovieListError, Result};
pub use movie::Movie;
pub use movie_list::{Iter, MovieList};
pub use source::{CsvOptions, CsvSource, MovieSource};
