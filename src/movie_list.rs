use crate::{
    cursor::CursorState,
    errors::{MovieListError, Result},
    movie::Movie,
    node::Node,
    source::{CsvSource, MovieSource},
};
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace, warn};

/// A sentinel-bounded doubly-linked list of movies with a single edit cursor.
///
/// Nodes live in an arena keyed by id; `HEADER` and `TRAILER` are permanent
/// boundary nodes that never hold a movie. Ids are never reused, so a stale
/// id can never reach a node that has been released.
#[derive(Debug, Clone)]
pub struct MovieList {
    nodes: HashMap<usize, Node>,
    next_id: usize,
    len: usize,
    cursor: Option<usize>,
}

const HEADER: usize = 0;
const TRAILER: usize = 1;

/// Iterator over movies, front to back (or back to front with `.rev()`).
pub struct Iter<'a> {
    list: &'a MovieList,
    front: usize,
    back: usize,
    remaining: usize,
}

impl Default for MovieList {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieList {
    /// Create an empty list: HEADER <-> TRAILER.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(HEADER, Node::sentinel(None, Some(TRAILER)));
        nodes.insert(TRAILER, Node::sentinel(Some(HEADER), None));

        Self {
            nodes,
            next_id: 2,
            len: 0,
            cursor: None,
        }
    }

    /// Build a list from a CSV file with `Title` and `Year` columns.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut list = Self::new();
        list.load_path(path)?;
        Ok(list)
    }

    /// Number of movies
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.next_of(HEADER) == TRAILER
    }

    pub fn front(&self) -> Result<&Movie> {
        if self.is_empty() {
            return Err(MovieListError::EmptyCollection);
        }
        Ok(self.movie_at(self.next_of(HEADER)))
    }

    pub fn back(&self) -> Result<&Movie> {
        if self.is_empty() {
            return Err(MovieListError::EmptyCollection);
        }
        Ok(self.movie_at(self.prev_of(TRAILER)))
    }

    pub fn add_front(&mut self, movie: Movie) {
        self.insert_before(self.next_of(HEADER), movie);
    }

    pub fn add_back(&mut self, movie: Movie) {
        self.insert_before(TRAILER, movie);
    }

    /// Remove and return the first movie.
    pub fn remove_front(&mut self) -> Result<Movie> {
        if self.is_empty() {
            return Err(MovieListError::EmptyCollection);
        }
        Ok(self.detach(self.next_of(HEADER)))
    }

    /// Remove and return the last movie.
    pub fn remove_back(&mut self) -> Result<Movie> {
        if self.is_empty() {
            return Err(MovieListError::EmptyCollection);
        }
        Ok(self.detach(self.prev_of(TRAILER)))
    }

    /// Iterate movies in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            front: self.next_of(HEADER),
            back: self.prev_of(TRAILER),
            remaining: self.len,
        }
    }

    /// Append a copy of every movie in `other` that satisfies `predicate`,
    /// keeping `other`'s relative order. Returns how many were appended.
    pub fn append<P>(&mut self, other: &MovieList, mut predicate: P) -> usize
    where
        P: FnMut(&Movie) -> bool,
    {
        let before = self.len;
        for movie in other.iter() {
            if predicate(movie) {
                self.add_back(movie.clone());
            }
        }
        let appended = self.len - before;
        debug!(appended, len = self.len, "appended movies from another list");
        appended
    }

    /// Like [`append`](Self::append) with `self` as the source.
    ///
    /// Only the movies present before the call are visited; copies appended
    /// along the way are never revisited.
    pub fn append_self<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&Movie) -> bool,
    {
        let original_len = self.len;
        let mut id = self.next_of(HEADER);
        let mut appended = 0;
        for _ in 0..original_len {
            let next = self.next_of(id);
            if predicate(self.movie_at(id)) {
                let copy = self.movie_at(id).clone();
                self.insert_before(TRAILER, copy);
                appended += 1;
            }
            id = next;
        }
        debug!(appended, len = self.len, "appended movies from the same list");
        appended
    }

    /// Pull movies from `source` until it is exhausted, adding each to the
    /// back. Returns the number loaded.
    ///
    /// A malformed row stops the load; movies added before it stay.
    pub fn load(&mut self, mut source: impl MovieSource) -> Result<usize> {
        let mut loaded = 0;
        loop {
            match source.next_movie() {
                Ok(Some(movie)) => {
                    self.add_back(movie);
                    loaded += 1;
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(loaded, error = %err, "aborting load");
                    return Err(err);
                }
            }
        }
        debug!(loaded, len = self.len, "loaded movies");
        Ok(loaded)
    }

    /// Load from a CSV file with default [`CsvOptions`](crate::CsvOptions).
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading movies");
        self.load(CsvSource::from_path(path)?)
    }

    /// Start an edit session with the cursor before the first movie.
    /// Any session already in progress is replaced.
    pub fn begin(&mut self) {
        trace!(replaced = self.cursor.is_some(), "begin edit session");
        self.cursor = Some(HEADER);
    }

    /// End the edit session. Idempotent.
    pub fn end(&mut self) {
        if self.cursor.take().is_some() {
            trace!("end edit session");
        }
    }

    pub fn cursor_state(&self) -> CursorState {
        match self.cursor {
            None => CursorState::Inactive,
            Some(HEADER) => CursorState::AtHeader,
            Some(TRAILER) => CursorState::AtTrailer,
            Some(_) => CursorState::AtElement,
        }
    }

    /// Move the cursor one step toward the back.
    pub fn advance(&mut self) -> Result<()> {
        let at = self.require_cursor()?;
        if at == TRAILER {
            return Err(MovieListError::InvalidCursor);
        }
        self.cursor = Some(self.next_of(at));
        Ok(())
    }

    /// Move the cursor one step toward the front.
    pub fn retreat(&mut self) -> Result<()> {
        let at = self.require_cursor()?;
        if at == HEADER {
            return Err(MovieListError::InvalidCursor);
        }
        self.cursor = Some(self.prev_of(at));
        Ok(())
    }

    /// Insert right after the cursor and move the cursor onto the new movie.
    ///
    /// Fails with `InvalidCursor` when the cursor is past the last movie, so
    /// the cursor can never append at the very end.
    pub fn insert_at_cursor(&mut self, movie: Movie) -> Result<()> {
        let at = self.require_cursor()?;
        if at == TRAILER {
            return Err(MovieListError::InvalidCursor);
        }
        let id = self.insert_before(self.next_of(at), movie);
        self.cursor = Some(id);
        Ok(())
    }

    /// Remove the movie under the cursor; the cursor moves to its successor.
    pub fn delete_at_cursor(&mut self) -> Result<Movie> {
        let at = self.require_element()?;
        Ok(self.detach(at))
    }

    pub fn current(&self) -> Result<&Movie> {
        let at = self.require_element()?;
        Ok(self.movie_at(at))
    }

    fn require_cursor(&self) -> Result<usize> {
        self.cursor.ok_or(MovieListError::NoActiveSession)
    }

    fn require_element(&self) -> Result<usize> {
        let at = self.require_cursor()?;
        if at == HEADER || at == TRAILER {
            return Err(MovieListError::InvalidCursor);
        }
        Ok(at)
    }

    /// Splice a new node in front of `target`, which may be TRAILER.
    /// The only way a node enters the list.
    fn insert_before(&mut self, target: usize, movie: Movie) -> usize {
        debug_assert_ne!(target, HEADER, "cannot insert before HEADER");
        let id = self.next_id;
        self.next_id += 1;

        let prev = self.prev_of(target);
        self.node_mut(prev).next = Some(id);
        self.node_mut(target).prev = Some(id);

        self.nodes.insert(
            id,
            Node {
                prev: Some(prev),
                next: Some(target),
                movie: Some(movie),
            },
        );
        self.len += 1;
        id
    }

    /// Unlink a non-sentinel node and return its movie.
    /// The only way a node leaves the list. A cursor on the node moves to
    /// its successor.
    fn detach(&mut self, id: usize) -> Movie {
        debug_assert!(!self.nodes[&id].is_sentinel(), "cannot detach a sentinel");
        let node = self.nodes.remove(&id).expect("detached node is linked");
        let (prev, next) = (
            node.prev.expect("element has prev"),
            node.next.expect("element has next"),
        );
        self.node_mut(prev).next = Some(next);
        self.node_mut(next).prev = Some(prev);
        if self.cursor == Some(id) {
            self.cursor = Some(next);
        }

        self.len -= 1;
        node.movie.expect("element holds a movie")
    }

    fn next_of(&self, id: usize) -> usize {
        self.nodes[&id].next.expect("TRAILER has no successor")
    }

    fn prev_of(&self, id: usize) -> usize {
        self.nodes[&id].prev.expect("HEADER has no predecessor")
    }

    fn movie_at(&self, id: usize) -> &Movie {
        self.nodes[&id]
            .movie
            .as_ref()
            .expect("sentinels hold no movie")
    }

    fn node_mut(&mut self, id: usize) -> &mut Node {
        self.nodes.get_mut(&id).expect("linked node exists")
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Movie;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let movie = self.list.movie_at(self.front);
        self.front = self.list.next_of(self.front);
        self.remaining -= 1;
        Some(movie)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let movie = self.list.movie_at(self.back);
        self.back = self.list.prev_of(self.back);
        self.remaining -= 1;
        Some(movie)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a MovieList {
    type Item = &'a Movie;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Movie> for MovieList {
    fn extend<I: IntoIterator<Item = Movie>>(&mut self, iter: I) {
        for movie in iter {
            self.add_back(movie);
        }
    }
}

impl FromIterator<Movie> for MovieList {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
