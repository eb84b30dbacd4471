/// Where the edit-session cursor of a [`MovieList`](crate::MovieList) sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// No session; cursor operations fail with `NoActiveSession`.
    Inactive,
    /// Before the first element. This is where `begin` leaves the cursor.
    AtHeader,
    /// On an element; `current` and `delete_at_cursor` are allowed.
    AtElement,
    /// Past the last element.
    AtTrailer,
}

impl CursorState {
    pub fn is_active(self) -> bool {
        self != CursorState::Inactive
    }
}
