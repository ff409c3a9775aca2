use crate::error::DumpError;
use crate::scanner::{ScanError, Structural};
use once_cell::sync::Lazy;
use regex::Regex;

/// Finds where a statement starts, whatever follows `INSERT INTO`.
static INSERT_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bINSERT\s+INTO\b").unwrap());

/// Matches a full statement header up to and including `VALUES`.
/// The table is either backquoted (any text but a backquote) or a bare word, with
/// an optional `db.` qualifier. The body is walked by [`Structural`].
static INSERT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)INSERT\s+INTO\s+(?:(?:`[^`]+`|[A-Za-z0-9_$]+)\s*\.\s*)?(?:`([^`]+)`|([A-Za-z0-9_$]+))\s*(?:\([^()]*\))?\s*VALUES\s*",
    )
    .unwrap()
});

/// One `INSERT INTO ... VALUES ...;` statement located in a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'a> {
    /// Ordinal of the statement within the dump, starting at 0
    pub index: usize,
    pub table: &'a str,
    /// Text between `VALUES` and the terminating `;`
    pub values: &'a str,
}

impl<'a> Statement<'a> {
    /// Lazily splits the VALUES span into row tuple bodies, outer parentheses removed.
    pub fn rows(&self) -> RowTuples<'a> {
        RowTuples::new(self.values)
    }

    /// Collects every row body, or reports the statement as malformed.
    pub fn row_bodies(&self) -> Result<Vec<&'a str>, DumpError> {
        self.rows()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DumpError::MalformedStatement {
                index: self.index,
                reason: e.to_string(),
            })
    }
}

/// Iterates the INSERT statements of a dump in source order.
///
/// A statement ends at the first `;` outside quotes at parenthesis depth 0, so a
/// semicolon inside a string literal never splits it. A malformed statement is
/// yielded as an error and scanning resumes right after its header.
pub struct StatementReader<'a> {
    text: &'a str,
    pos: usize,
    index: usize,
}

impl<'a> StatementReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            index: 0,
        }
    }

    fn find_terminator(body: &str) -> Result<usize, ScanError> {
        let mut walker = Structural::new(body);
        let mut depth: u32 = 0;

        while let Some((offset, byte)) = walker.next() {
            match byte {
                b'(' => depth += 1,
                b')' => {
                    if depth == 0 {
                        return Err(ScanError::UnbalancedParen { offset });
                    }
                    depth -= 1;
                }
                b';' if depth == 0 => return Ok(offset),
                _ => {}
            }
        }

        if walker.in_quote() {
            Err(ScanError::UnterminatedQuote)
        } else if depth != 0 {
            Err(ScanError::UnbalancedParen { offset: body.len() })
        } else {
            Err(ScanError::MissingTerminator)
        }
    }
}

impl<'a> Iterator for StatementReader<'a> {
    type Item = Result<Statement<'a>, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let start = INSERT_START.find_at(text, self.pos)?;
        let index = self.index;
        self.index += 1;

        // An INSERT whose header cannot be read is reported, never passed over.
        let caps = match INSERT_HEADER.captures_at(text, start.start()) {
            Some(caps) if caps.get(0).map(|m| m.start()) == Some(start.start()) => caps,
            _ => {
                self.pos = start.end();
                return Some(Err(DumpError::MalformedStatement {
                    index,
                    reason: "unrecognized INSERT header".to_string(),
                }));
            }
        };
        let header = caps.get(0)?;
        let table = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        let body_start = header.end();

        let body = &text[body_start..];
        match Self::find_terminator(body) {
            Ok(end) => {
                self.pos = body_start + end + 1;
                Some(Ok(Statement {
                    index,
                    table,
                    values: &body[..end],
                }))
            }
            Err(e) => {
                self.pos = body_start;
                Some(Err(DumpError::MalformedStatement {
                    index,
                    reason: e.to_string(),
                }))
            }
        }
    }
}

/// Lazily yields the bodies of the `(...)` tuples in a VALUES span.
pub struct RowTuples<'a> {
    values: &'a str,
    walker: Structural<'a>,
    gap_start: usize,
    done: bool,
}

impl<'a> RowTuples<'a> {
    fn new(values: &'a str) -> Self {
        Self {
            values,
            walker: Structural::new(values),
            gap_start: 0,
            done: false,
        }
    }

    /// Between tuples only whitespace and a single separating comma are allowed.
    fn check_gap(&self, end: usize, first: bool) -> Result<(), ScanError> {
        let gap = &self.values[self.gap_start..end];
        let mut commas = 0;
        for (i, c) in gap.char_indices() {
            match c {
                ',' => commas += 1,
                c if c.is_whitespace() => {}
                _ => {
                    return Err(ScanError::UnexpectedText {
                        offset: self.gap_start + i,
                    })
                }
            }
        }
        let expected = if first { 0 } else { 1 };
        if commas != expected {
            return Err(ScanError::UnexpectedText {
                offset: self.gap_start,
            });
        }
        Ok(())
    }

    fn fail(&mut self, e: ScanError) -> Option<Result<&'a str, ScanError>> {
        self.done = true;
        Some(Err(e))
    }
}

impl<'a> Iterator for RowTuples<'a> {
    type Item = Result<&'a str, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let first = self.gap_start == 0;

        // Commas between tuples are part of the gap, not structure.
        let open = loop {
            match self.walker.next() {
                Some((offset, b'(')) => break offset,
                Some((_, b',')) => continue,
                Some((offset, _)) => return self.fail(ScanError::UnbalancedParen { offset }),
                None => {
                    self.done = true;
                    if self.walker.in_quote() {
                        return Some(Err(ScanError::UnterminatedQuote));
                    }
                    let tail = &self.values[self.gap_start..];
                    if let Some(i) = tail.find(|c: char| !c.is_whitespace()) {
                        return Some(Err(ScanError::UnexpectedText {
                            offset: self.gap_start + i,
                        }));
                    }
                    return None;
                }
            }
        };

        if let Err(e) = self.check_gap(open, first) {
            return self.fail(e);
        }

        let mut depth: u32 = 1;
        let close = loop {
            match self.walker.next() {
                Some((_, b'(')) => depth += 1,
                Some((offset, b')')) => {
                    depth -= 1;
                    if depth == 0 {
                        break offset;
                    }
                }
                Some(_) => {}
                None => {
                    let e = if self.walker.in_quote() {
                        ScanError::UnterminatedQuote
                    } else {
                        ScanError::UnbalancedParen { offset: open }
                    };
                    return self.fail(e);
                }
            }
        };

        self.gap_start = close + 1;
        let values = self.values;
        Some(Ok(&values[open + 1..close]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(text: &str) -> Vec<Result<Statement<'_>, DumpError>> {
        StatementReader::new(text).collect()
    }

    #[test]
    fn finds_single_statement() {
        let dump = "INSERT INTO `wp_posts` VALUES (1,'a'),(2,'b');";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 1);
        let stmt = stmts[0].as_ref().unwrap();
        assert_eq!(stmt.index, 0);
        assert_eq!(stmt.table, "wp_posts");
        assert_eq!(stmt.values, "(1,'a'),(2,'b')");
    }

    #[test]
    fn skips_column_list_and_surrounding_noise() {
        let dump = "-- dump header\nLOCK TABLES `wp_postmeta` WRITE;\n\
                    INSERT INTO `wp_postmeta` (`meta_id`, `post_id`, `meta_key`, `meta_value`) VALUES (1,2,'k','v');\n\
                    UNLOCK TABLES;\n";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 1);
        let stmt = stmts[0].as_ref().unwrap();
        assert_eq!(stmt.table, "wp_postmeta");
        assert_eq!(stmt.values, "(1,2,'k','v')");
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let dump = "insert into wp_posts values (1);";
        let stmt = statements(dump).remove(0).unwrap();
        assert_eq!(stmt.table, "wp_posts");
        assert_eq!(stmt.values, "(1)");
    }

    #[test]
    fn backquoted_table_may_contain_hyphens() {
        let dump = "INSERT INTO `my-site_postmeta` VALUES (1,2,'k','v');";
        let stmt = statements(dump).remove(0).unwrap();
        assert_eq!(stmt.table, "my-site_postmeta");
        assert_eq!(stmt.values, "(1,2,'k','v')");
    }

    #[test]
    fn database_qualifier_is_dropped_from_table() {
        let dump = "INSERT INTO `wpdb`.`wp_postmeta` VALUES (1,2,'k','v');\n\
                    INSERT INTO wpdb . wp_posts VALUES (3);\n\
                    INSERT INTO `my-db`.wp_postmeta (`meta_id`) VALUES (4);";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].as_ref().unwrap().table, "wp_postmeta");
        assert_eq!(stmts[0].as_ref().unwrap().values, "(1,2,'k','v')");
        assert_eq!(stmts[1].as_ref().unwrap().table, "wp_posts");
        assert_eq!(stmts[2].as_ref().unwrap().table, "wp_postmeta");
        assert_eq!(stmts[2].as_ref().unwrap().values, "(4)");
    }

    #[test]
    fn unrecognized_header_is_malformed_not_dropped() {
        let dump = "INSERT INTO VALUES (1);\nINSERT INTO t VALUES (2);";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 2);
        assert_eq!(
            stmts[0],
            Err(DumpError::MalformedStatement {
                index: 0,
                reason: "unrecognized INSERT header".to_string()
            })
        );
        let stmt = stmts[1].as_ref().unwrap();
        assert_eq!(stmt.index, 1);
        assert_eq!(stmt.values, "(2)");
    }

    #[test]
    fn final_statement_without_semicolon_names_missing_terminator() {
        let dump = "INSERT INTO t VALUES (1),(2)\n";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 1);
        assert_eq!(
            stmts[0],
            Err(DumpError::MalformedStatement {
                index: 0,
                reason: ScanError::MissingTerminator.to_string()
            })
        );
    }

    #[test]
    fn unclosed_tuple_at_end_is_still_a_paren_error() {
        let stmts = statements("INSERT INTO t VALUES (1,(2");
        let Err(DumpError::MalformedStatement { reason, .. }) = &stmts[0] else {
            panic!("expected a malformed statement");
        };
        assert!(reason.starts_with("unbalanced parenthesis"));
    }

    #[test]
    fn semicolon_inside_literal_does_not_terminate() {
        let dump = "INSERT INTO t VALUES (1,'a;b'),(2,'c');INSERT INTO t VALUES (3,'d');";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].as_ref().unwrap().values, "(1,'a;b'),(2,'c')");
        assert_eq!(stmts[1].as_ref().unwrap().index, 1);
        assert_eq!(stmts[1].as_ref().unwrap().values, "(3,'d')");
    }

    #[test]
    fn no_statements_in_empty_dump() {
        assert!(statements("").is_empty());
        assert!(statements("CREATE TABLE t (id int);\n").is_empty());
    }

    #[test]
    fn unterminated_statement_is_malformed_and_scanning_resumes() {
        let dump = "INSERT INTO t VALUES (1,'open);\nINSERT INTO t VALUES (2,'x');";
        let stmts = statements(dump);
        assert!(matches!(
            stmts[0],
            Err(DumpError::MalformedStatement { index: 0, .. })
        ));
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].as_ref().unwrap().values, "(2,'x')");
    }

    #[test]
    fn stray_close_paren_is_malformed() {
        let dump = "INSERT INTO t VALUES (1)),(2);\nINSERT INTO t VALUES (3);";
        let stmts = statements(dump);
        assert_eq!(stmts.len(), 2);
        assert!(matches!(
            stmts[0],
            Err(DumpError::MalformedStatement { index: 0, .. })
        ));
        assert_eq!(stmts[1].as_ref().unwrap().values, "(3)");
    }

    #[test]
    fn splits_rows_with_embedded_parens() {
        let stmt = Statement {
            index: 0,
            table: "t",
            values: "(1,'a,b(c)'), (2,NOW()) ,\n(3,'x)')",
        };
        let rows = stmt.row_bodies().unwrap();
        assert_eq!(rows, vec!["1,'a,b(c)'", "2,NOW()", "3,'x)'"]);
    }

    #[test]
    fn rows_are_lazy() {
        let stmt = Statement {
            index: 0,
            table: "t",
            values: "(1),(2),garbage",
        };
        let mut rows = stmt.rows();
        assert_eq!(rows.next(), Some(Ok("1")));
        assert_eq!(rows.next(), Some(Ok("2")));
        assert!(matches!(rows.next(), Some(Err(_))));
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn missing_comma_between_rows_is_malformed() {
        let stmt = Statement {
            index: 4,
            table: "t",
            values: "(1) (2)",
        };
        let err = stmt.row_bodies().unwrap_err();
        assert!(matches!(err, DumpError::MalformedStatement { index: 4, .. }));
    }

    #[test]
    fn double_comma_between_rows_is_malformed() {
        let stmt = Statement {
            index: 0,
            table: "t",
            values: "(1),,(2)",
        };
        assert!(stmt.row_bodies().is_err());
    }

    #[test]
    fn text_between_rows_is_malformed() {
        let stmt = Statement {
            index: 0,
            table: "t",
            values: "(1), x (2)",
        };
        assert!(stmt.row_bodies().is_err());
    }

    #[test]
    fn empty_values_span_has_no_rows() {
        let stmt = Statement {
            index: 0,
            table: "t",
            values: "  ",
        };
        assert!(stmt.row_bodies().unwrap().is_empty());
    }
}
