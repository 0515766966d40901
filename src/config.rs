/// Explorer configuration.
///
/// Bounds the work a single snapshot or navigation can do on pathological
/// object graphs. Use the builder methods to customize, or [`Default`] for
/// sensible defaults.
///
/// # Examples
///
/// ```rust
/// use structview::Config;
///
/// let config = Config::default()
///     .with_max_depth(16)          // Refuse paths longer than 16 segments
///     .with_max_value_len(120);    // Show longer strings before cutting them
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of segments in a field path, and maximum number of
    /// references followed in a row while dereferencing.
    /// Default: 64
    pub max_depth: usize,

    /// Printable values longer than this many characters are cut and end
    /// with `...`.
    /// Default: 64
    pub max_value_len: usize,

    /// Maximum number of entries listed for a single cell.
    /// Large collections are cut and their listing is flagged as truncated.
    /// Default: 1000
    pub max_members: usize,

    /// Port used by the HTTP front end (`server` feature).
    /// Default: 5656
    pub http_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: 64,
            max_value_len: 64,
            max_members: 1000,
            http_port: 5656,
        }
    }
}

impl Config {
    /// Set the maximum path length and reference chain length.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the number of characters after which printable values are cut.
    pub fn with_max_value_len(mut self, len: usize) -> Self {
        self.max_value_len = len;
        self
    }

    /// Set the maximum number of entries listed per cell.
    pub fn with_max_members(mut self, limit: usize) -> Self {
        self.max_members = limit;
        self
    }

    /// Set the port the HTTP front end binds to.
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }
}
