use std::io::BufRead;

use anyhow::{Context, Result, bail};

use crate::ntk::gate::GateId;

/// Reads an equivalence partition as written by the external equivalence
/// engine: one class per line, members separated by whitespace, `!` in
/// front of a member that matches the class inverted. `#` starts a
/// comment, blank lines are skipped.
///
/// The result feeds `Netlist::ingest`, which does the semantic checks
/// (known ids, no overlap); this reader only handles the transport.
pub fn parse_partition_str(s: &str) -> Result<Vec<Vec<(GateId, bool)>>> {
    parse_partition_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn parse_partition_reader<R: BufRead>(r: R) -> Result<Vec<Vec<(GateId, bool)>>> {
    let mut partition = Vec::new();
    for (idx, line) in r.lines().enumerate() {
        let line = line.context("failed to read partition input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut group = Vec::new();
        for token in line.split_whitespace() {
            let (inverted, digits) = match token.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, token),
            };
            let id = digits.parse::<u32>().with_context(|| {
                format!("invalid gate id {:?} on line {}", token, idx + 1)
            })?;
            group.push((GateId(id), inverted));
        }
        if group.len() < 2 {
            bail!("class on line {} needs at least two members", idx + 1);
        }
        partition.push(group);
    }
    Ok(partition)
}
