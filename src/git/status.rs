//! Parser for `git status --porcelain=v1 -z`.

use crate::error::{GitError, Result};
use crate::git::{RenamedPath, WorkingTreeStatus};

/// Parse NUL-separated porcelain v1 output.
///
/// Each record is `XY <path>`; rename and copy records are followed by one
/// more NUL-terminated field holding the original path.
pub fn parse_porcelain(output: &str) -> Result<WorkingTreeStatus> {
    let mut status = WorkingTreeStatus::default();
    let mut fields = output.split('\0').filter(|f| !f.is_empty());

    while let Some(record) = fields.next() {
        if record.len() < 4 || record.as_bytes()[2] != b' ' {
            return Err(GitError::UnexpectedOutput {
                command: "status".to_string(),
                output: record.to_string(),
            }
            .into());
        }
        let (x, y) = (record.as_bytes()[0] as char, record.as_bytes()[1] as char);
        let path = record[3..].to_string();

        match (x, y) {
            ('?', '?') => status.not_added.push(path),
            ('!', '!') => {}
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => status.conflicted.push(path),
            ('R', _) | (_, 'R') | ('C', _) | (_, 'C') => {
                let from = fields.next().ok_or_else(|| GitError::UnexpectedOutput {
                    command: "status".to_string(),
                    output: format!("missing source path for {record}"),
                })?;
                if x == 'R' || y == 'R' {
                    status.renamed.push(RenamedPath {
                        from: from.to_string(),
                        to: path,
                    });
                } else {
                    status.created.push(path);
                }
            }
            ('A', _) | (_, 'A') => status.created.push(path),
            ('D', _) | (_, 'D') => status.deleted.push(path),
            ('M', _) | (_, 'M') | ('T', _) | (_, 'T') => status.modified.push(path),
            _ => log::debug!("ignoring status record {record:?}"),
        }
    }

    Ok(status)
}
