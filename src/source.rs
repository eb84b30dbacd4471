use std::fs::File;
use std::io;
use std::path::Path;

use crate::errors::{MovieListError, Result};
use crate::movie::Movie;

const TITLE_COLUMN: &str = "Title";
const YEAR_COLUMN: &str = "Year";

/// A producer of movie records, read one row at a time.
///
/// `Ok(None)` signals the end of the data.
pub trait MovieSource {
    fn next_movie(&mut self) -> Result<Option<Movie>>;
}

impl<S: MovieSource + ?Sized> MovieSource for &mut S {
    fn next_movie(&mut self) -> Result<Option<Movie>> {
        (**self).next_movie()
    }
}

/// Reader settings for [`CsvSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Strip surrounding whitespace from headers and fields.
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvOptions {
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// Movies from CSV text with a header row naming `Title` and `Year`.
///
/// Columns may come in any order and extra columns are ignored.
pub struct CsvSource<R> {
    rows: csv::DeserializeRecordsIntoIter<R, Movie>,
}

impl<R: io::Read> CsvSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, CsvOptions::default())
    }

    /// Reads and validates the header row before returning.
    pub fn with_options(reader: R, options: CsvOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .trim(if options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        let headers = reader.headers()?;
        for column in [TITLE_COLUMN, YEAR_COLUMN] {
            if !headers.iter().any(|h| h == column) {
                return Err(MovieListError::malformed(
                    Some(1),
                    format!("missing required column `{column}`"),
                ));
            }
        }

        Ok(Self {
            rows: reader.into_deserialize(),
        })
    }
}

impl CsvSource<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| MovieListError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::new(file)
    }
}

impl<R: io::Read> MovieSource for CsvSource<R> {
    fn next_movie(&mut self) -> Result<Option<Movie>> {
        match self.rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Read as _;

    /// Yields `data`, then fails every later read.
    pub(crate) struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl FailingReader {
        pub(crate) fn new(data: &str) -> Self {
            Self {
                data: io::Cursor::new(data.as_bytes().to_vec()),
            }
        }
    }

    impl io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("disk gone")),
                n => Ok(n),
            }
        }
    }

    fn drain(mut source: impl MovieSource) -> Result<Vec<Movie>> {
        let mut out = Vec::new();
        while let Some(movie) = source.next_movie()? {
            out.push(movie);
        }
        Ok(out)
    }

    #[test]
    fn reads_rows_in_order() {
        let input = "Title,Year\nAlpha,2000\nBeta,2010\n";
        let movies = drain(CsvSource::new(input.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            movies,
            vec![Movie::new("Alpha", 2000), Movie::new("Beta", 2010)]
        );
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let input = "Director,Year,Title\nLang,1927,Metropolis\n";
        let movies = drain(CsvSource::new(input.as_bytes()).unwrap()).unwrap();
        assert_eq!(movies, vec![Movie::new("Metropolis", 1927)]);
    }

    #[test]
    fn fields_are_trimmed_by_default() {
        let input = "Title , Year\n  Alpha ,\t2000\n";
        let movies = drain(CsvSource::new(input.as_bytes()).unwrap()).unwrap();
        assert_eq!(movies, vec![Movie::new("Alpha", 2000)]);
    }

    #[test]
    fn custom_delimiter() {
        let input = "Title;Year\n\"Alpha, the movie\";2000\n";
        let options = CsvOptions::default().delimiter(b';');
        let movies = drain(CsvSource::with_options(input.as_bytes(), options).unwrap()).unwrap();
        assert_eq!(movies, vec![Movie::new("Alpha, the movie", 2000)]);
    }

    #[test]
    fn missing_column_is_rejected_at_the_header() {
        let err = CsvSource::new("Title,Director\nAlpha,Someone\n".as_bytes())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            MovieListError::MalformedInput { line: Some(1), .. }
        ));
        assert!(err.to_string().contains("Year"));
    }

    #[test]
    fn non_integer_year_is_malformed() {
        let input = "Title,Year\nAlpha,2000\nBeta,soon\n";
        let mut source = CsvSource::new(input.as_bytes()).unwrap();
        assert_eq!(source.next_movie().unwrap(), Some(Movie::new("Alpha", 2000)));
        let err = source.next_movie().unwrap_err();
        assert!(matches!(
            err,
            MovieListError::MalformedInput { line: Some(3), .. }
        ));
    }

    #[test]
    fn header_only_input_is_empty() {
        let movies = drain(CsvSource::new("Title,Year\n".as_bytes()).unwrap()).unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn read_failure_after_rows_is_reported_as_io() {
        let mut source = CsvSource::new(FailingReader::new("Title,Year\nAlpha,2000\n")).unwrap();
        assert_eq!(source.next_movie().unwrap(), Some(Movie::new("Alpha", 2000)));
        let err = source.next_movie().unwrap_err();
        assert!(matches!(err, MovieListError::Read(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvSource::from_path(dir.path().join("nope.csv"))
            .err()
            .unwrap();
        assert!(matches!(err, MovieListError::Io { .. }));
    }
}
