// src/file.rs

use reqwest::blocking::Client;
use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    diagnostics::{Diagnostics, TracingDiagnostics},
    error::{CsvError, Result},
    fetch,
    rows::{MappedRows, Rows},
};

/// An open CSV source.
///
/// Owns the underlying stream and releases it on [`close`](Self::close) or on
/// drop, whichever comes first. All sequences borrow the handle mutably, so
/// there is never more than one reader of the stream at a time.
///
/// ```no_run
/// use csvfile::CsvFile;
///
/// let mut file = CsvFile::open("prices.csv")?;
/// for row in file.mapped_first_line_rows() {
///     println!("{} costs {}", row.get_string("item")?, row.get_double("price")?);
/// }
/// file.close();
/// # Ok::<(), csvfile::CsvError>(())
/// ```
pub struct CsvFile {
    reader: Option<Box<dyn BufRead>>,
    diagnostics: Box<dyn Diagnostics>,
    /// last line ended in a bare `\r`
    skip_lf: bool,
}

impl CsvFile {
    /// Open a local file.
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CsvError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("opened local CSV");
        Ok(Self::from_reader(file))
    }

    /// Wrap any readable stream.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Self::from_buf_reader(BufReader::new(reader))
    }

    /// Wrap a stream that is already buffered.
    pub fn from_buf_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self {
            reader: Some(Box::new(reader)),
            diagnostics: Box::new(TracingDiagnostics),
            skip_lf: false,
        }
    }

    /// Fetch a remote CSV with a default HTTP client.
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_url_with_client(&Client::new(), &Url::parse(url)?)
    }

    /// Fetch a remote CSV with a caller-provided HTTP client.
    pub fn from_url_with_client(client: &Client, url: &Url) -> Result<Self> {
        let reader = fetch::open_remote(client, url)?;
        Ok(Self::from_buf_reader(reader))
    }

    /// Replace the sink that receives read errors swallowed during iteration.
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Read and discard the first line, e.g. a header row.
    ///
    /// Returns `true` if that line was present and valid.
    pub fn skip_first_line(&mut self) -> bool {
        self.rows().has_more()
    }

    /// Rows as plain field lists, starting at the current position.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows::new(self)
    }

    /// Rows keyed by the names on the next line of the stream.
    pub fn mapped_first_line_rows(&mut self) -> MappedRows<'_> {
        MappedRows::from_first_line(self.rows())
    }

    /// Rows keyed by the given names, in order.
    pub fn mapped_rows<I>(&mut self, field_names: I) -> MappedRows<'_>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let header = field_names.into_iter().map(Into::into).collect();
        MappedRows::new(self.rows(), header)
    }

    /// Release the underlying stream. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("closed CSV source");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Next raw line without its line terminator, or `None` at end of input,
    /// after a read error, or once closed.
    pub(crate) fn read_next_line(&mut self) -> Option<String> {
        match self.read_raw_line() {
            Ok(line) => line,
            Err(err) => {
                self.diagnostics.read_failed(&err);
                None
            }
        }
    }

    /// A line ends at `\n`, `\r` or `\r\n`. After a `\r` the next read drops a
    /// leading `\n`, which may sit in the following buffer fill.
    fn read_raw_line(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut bytes = Vec::new();
        let mut read_any = false;

        loop {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if buf.is_empty() {
                break;
            }
            if self.skip_lf {
                self.skip_lf = false;
                if buf[0] == b'\n' {
                    reader.consume(1);
                    continue;
                }
            }
            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    self.skip_lf = buf[i] == b'\r';
                    bytes.extend_from_slice(&buf[..i]);
                    reader.consume(i + 1);
                    return decode(bytes).map(Some);
                }
                None => {
                    let n = buf.len();
                    bytes.extend_from_slice(buf);
                    reader.consume(n);
                    read_any = true;
                }
            }
        }

        if read_any {
            decode(bytes).map(Some)
        } else {
            Ok(None)
        }
    }
}

fn decode(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

impl fmt::Debug for CsvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvFile")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::test_server::{local_client, serve_once};
    use std::{
        cell::RefCell,
        io::{self, Cursor, Write},
        rc::Rc,
    };
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// Yields `data`, then fails every read after it.
    struct BrokenReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream broke")),
                n => Ok(n),
            }
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Diagnostics for Recorder {
        fn read_failed(&self, err: &io::Error) {
            self.0.borrow_mut().push(err.to_string());
        }
    }

    #[test]
    fn test_open_local_file() {
        init_logging();
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "FIELD1,FIELD2,FIELD3\nfoo, 12 ,bar\nbaz,-3,\"q,x\"\n").unwrap();

        let mut file = CsvFile::open(tmp.path()).unwrap();
        let rows: Vec<_> = file.mapped_first_line_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_int("FIELD2").unwrap(), 12);
        assert_eq!(rows[1].get_string("FIELD3").unwrap(), "q,x");
        file.close();
    }

    #[test]
    fn test_missing_file_is_open_error() {
        match CsvFile::open("/definitely/not/here.csv") {
            Err(CsvError::Open { path, .. }) => {
                assert_eq!(path, Path::new("/definitely/not/here.csv"))
            }
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_first_line() {
        let mut file = CsvFile::from_reader(Cursor::new("h1,h2\n1,2\n"));
        assert!(file.skip_first_line());
        let rows: Vec<_> = file.rows().collect();
        assert_eq!(rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_skip_first_line_reports_invalid_header() {
        let mut file = CsvFile::from_reader(Cursor::new("h1,\"h2\n1,2\n"));
        assert!(!file.skip_first_line());
        // the bad line was consumed; the next sequence starts after it
        assert_eq!(file.rows().count(), 1);
    }

    #[test]
    fn test_skip_then_supplied_header() {
        let mut file = CsvFile::from_reader(Cursor::new("x,y\n5,true\n"));
        assert!(file.skip_first_line());
        let row = file.mapped_rows(["count", "flag"]).next().unwrap();
        assert_eq!(row.get_int("count").unwrap(), 5);
        assert!(row.get_boolean("flag").unwrap());
    }

    #[test]
    fn test_read_error_ends_iteration_and_is_reported() {
        init_logging();
        let recorder = Recorder::default();
        let reader = BrokenReader {
            data: Cursor::new(b"1,2\n3,4\n".to_vec()),
        };
        let mut file = CsvFile::from_reader(reader).with_diagnostics(recorder.clone());

        let mut rows = file.rows();
        assert_eq!(rows.by_ref().count(), 2);
        assert!(rows.is_exhausted());
        assert!(!rows.has_more());
        drop(rows);

        let seen = recorder.0.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("stream broke"));
        drop(seen);

        // release does not resurface the swallowed error
        file.close();
        assert!(file.is_closed());
    }

    #[test]
    fn test_closure_as_diagnostics() {
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let reader = BrokenReader {
            data: Cursor::new(Vec::new()),
        };
        let mut file = CsvFile::from_reader(reader)
            .with_diagnostics(move |_: &io::Error| *counter.borrow_mut() += 1);
        assert!(!file.skip_first_line());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_close_twice_is_noop() {
        let mut file = CsvFile::from_reader(Cursor::new("a\nb\n"));
        file.close();
        file.close();
        assert!(file.is_closed());
        assert!(!file.skip_first_line());
        assert_eq!(file.rows().count(), 0);
        assert_eq!(file.mapped_first_line_rows().count(), 0);
    }

    #[test]
    fn test_abandoned_sequence_keeps_position() {
        let mut file = CsvFile::from_reader(Cursor::new("1\n2\n3\n"));
        assert_eq!(file.rows().next().unwrap(), vec!["1"]);
        assert_eq!(file.rows().next().unwrap(), vec!["2"]);
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let recorder = Recorder::default();
        let mut file = CsvFile::from_reader(Cursor::new(vec![b'a', b'\n', 0xff, 0xfe, b'\n']))
            .with_diagnostics(recorder.clone());
        assert_eq!(file.rows().count(), 1);
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn test_from_url_reads_rows() {
        init_logging();
        let (url, server) = serve_once(200, "h1,h2\n1,2\n3,4\n");
        let url = Url::parse(&url).unwrap();
        let mut file = CsvFile::from_url_with_client(&local_client(), &url).unwrap();
        let rows: Vec<_> = file.mapped_first_line_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get_int("h2").unwrap(), 4);
        server.join().unwrap();
    }

    #[test]
    fn test_from_url_non_200() {
        let (url, server) = serve_once(500, "boom");
        let url = Url::parse(&url).unwrap();
        assert!(matches!(
            CsvFile::from_url_with_client(&local_client(), &url),
            Err(CsvError::BadStatus(500))
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_from_url_rejects_garbage() {
        assert!(matches!(
            CsvFile::from_url("not a url"),
            Err(CsvError::Url(_))
        ));
    }
}
