use crate::movie::Movie;

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    pub(crate) movie: Option<Movie>,
}

impl Node {
    /// A boundary node. Never carries a movie.
    pub(crate) fn sentinel(prev: Option<usize>, next: Option<usize>) -> Self {
        Self {
            prev,
            next,
            movie: None,
        }
    }

    pub(crate) fn is_sentinel(&self) -> bool {
        self.movie.is_none()
    }
}
