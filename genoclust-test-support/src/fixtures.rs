//! Builders for small pairwise-distance tables.

use std::fs;
use std::io;
use std::path::Path;

/// Header emitted by `mash dist -t`-style tools.
pub const MASH_HEADER: &str = "#query\treference\tdistance\tp-value\tshared-hashes";

/// A distance table assembled line by line.
///
/// # Examples
/// ```
/// use genoclust_test_support::fixtures::DistanceTable;
///
/// let table = DistanceTable::new().edge("A", "B", 0.01).raw("# note");
/// assert_eq!(table.render(), "A\tB\t0.01\t0\t1000/1000\n# note\n");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceTable {
    lines: Vec<String>,
}

impl DistanceTable {
    /// Creates an empty table without a header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table starting with [`MASH_HEADER`].
    #[must_use]
    pub fn mash_header() -> Self {
        Self::new().raw(MASH_HEADER)
    }

    /// Appends a five-column distance row.
    #[must_use]
    pub fn edge(mut self, source: &str, target: &str, distance: f64) -> Self {
        self.lines
            .push(format!("{source}\t{target}\t{distance}\t0\t1000/1000"));
        self
    }

    /// Appends `line` verbatim.
    #[must_use]
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_owned());
        self
    }

    /// Number of lines, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Renders the table with a trailing newline after every line.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.iter().fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
    }

    /// Writes the rendered table to `path`.
    ///
    /// # Errors
    /// Returns any I/O error raised while writing.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }
}
