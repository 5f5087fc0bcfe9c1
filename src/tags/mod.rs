//! Macro substitution: rewrite delimited source-system macros into Puppet
//! variable references.
//!
//! A *marked region* is the text strictly between a start delimiter and the
//! next end delimiter. Regions containing a known tag are replaced (together
//! with their delimiters) by the rewritten region; all other text, including
//! unrecognised regions and their delimiters, is left verbatim.
pub mod mapping;

pub use mapping::{DEFAULT_MAPPING, MappingTable, MatchOrder, SENTINEL};

/// Scans text for delimited macro regions and rewrites them using a
/// [`MappingTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapper {
    table: MappingTable,
}

impl TagMapper {
    /// Create a mapper backed by `table`.
    #[must_use]
    pub const fn new(table: MappingTable) -> Self {
        Self { table }
    }

    /// The mapping table in use.
    #[must_use]
    pub const fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Replace the mapping table wholesale.
    pub fn set_table(&mut self, table: MappingTable) {
        self.table = table;
    }

    /// Rewrite every recognised region of `text` delimited by `start`/`end`.
    ///
    /// Returns whether at least one region was rewritten, and the resulting
    /// text. The end delimiter is searched for from the first byte after the
    /// start delimiter, so identical delimiters pair left to right. An empty
    /// delimiter disables scanning. A start delimiter with no end delimiter
    /// after it stops the scan and is left untouched.
    ///
    /// After a rewrite the scan resumes as if it restarted from the
    /// beginning, so a delimiter that straddles the spliced text is found.
    /// A region whose end delimiter lies inside text produced by an earlier
    /// rewrite is left as is; each rewrite therefore consumes input that was
    /// never rewritten, and the scan always terminates.
    #[must_use]
    pub fn substitute(&self, text: &str, start: &str, end: &str) -> (bool, String) {
        if start.is_empty() || end.is_empty() || self.table.is_empty() {
            return (false, text.to_string());
        }

        let mut out = text.to_string();
        let mut replaced = false;
        // No start delimiter begins before `cursor` except inside regions
        // already skipped.
        let mut cursor = 0;
        // `out[inserted_end..]` is always an untouched suffix of `text`.
        let mut inserted_end = 0;

        while let Some(open) = find_from(&out, start, cursor) {
            let region_start = open + start.len();
            let Some(close) = find_from(&out, end, region_start) else {
                break;
            };
            let span_end = close + end.len();
            let rewritten = if close < inserted_end {
                None
            } else {
                out.get(region_start..close)
                    .and_then(|region| self.table.rewrite(region))
            };

            match rewritten {
                Some(region) => {
                    out.replace_range(open..span_end, &region);
                    inserted_end = open + region.len();
                    cursor = restart_point(&out, (open + 1).saturating_sub(start.len()), cursor);
                    replaced = true;
                }
                // Unrecognised regions are stepped over rather than ending
                // the scan, so every later region is still visited.
                None => cursor = span_end,
            }
        }

        (replaced, out)
    }
}

/// First char boundary at or after `candidate`, never before `floor`.
fn restart_point(text: &str, candidate: usize, floor: usize) -> usize {
    let mut at = candidate.max(floor);
    while !text.is_char_boundary(at) {
        at += 1;
    }
    at
}

/// Byte offset of the first `needle` in `haystack` at or after `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|i| from + i)
}
