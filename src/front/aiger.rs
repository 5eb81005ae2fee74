use std::collections::HashMap;
use std::io::BufRead;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::ntk::Netlist;
use crate::ntk::gate::{Edge, GateId, GateKind};

/// Reads an ASCII AIGER (`.aag`) circuit and populates a fresh netlist,
/// leaving it at the `Read` stage.
///
/// Ids follow the source numbering: the constant is gate 0, inputs and
/// AND gates keep their variable index, and each output gets a fresh id
/// past `M` in declaration order. A fanin referencing a variable that is
/// never declared stays in the table as an undefined placeholder and
/// shows up in the floating report.
pub fn read_aag_str(s: &str) -> Result<Netlist> {
    read_aag_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn read_aag_reader<R: BufRead>(r: R) -> Result<Netlist> {
    let lines = r
        .lines()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read aag input")?;

    if lines.is_empty() {
        bail!("empty input");
    }

    let header_parts = lines[0].trim().split_whitespace().collect::<Vec<_>>();
    if header_parts.len() != 6 || header_parts[0] != "aag" {
        bail!("invalid header, expected: aag M I L O A");
    }
    let max_var = parse_u32_token(header_parts[1], "M")?;
    let num_inputs = parse_u32_token(header_parts[2], "I")? as usize;
    let num_latches = parse_u32_token(header_parts[3], "L")?;
    let num_outputs = parse_u32_token(header_parts[4], "O")? as usize;
    let num_ands = parse_u32_token(header_parts[5], "A")? as usize;

    if num_latches != 0 {
        bail!("only combinational aag is supported (L must be 0)");
    }
    let needed = 1 + num_inputs + num_outputs + num_ands;
    if lines.len() < needed {
        bail!(
            "truncated aag: expected at least {} lines, found {}",
            needed,
            lines.len()
        );
    }

    let mut cursor = 1usize;
    let mut input_vars = Vec::with_capacity(num_inputs);
    for _ in 0..num_inputs {
        let line_no = cursor + 1;
        let lit = parse_single_lit(lines[cursor].trim(), line_no, "input")?;
        cursor += 1;
        if lit == 0 || lit % 2 == 1 {
            bail!("invalid input literal on line {}: must be even and nonzero", line_no);
        }
        if lit / 2 > max_var {
            bail!("input literal on line {} exceeds 2*M", line_no);
        }
        input_vars.push(lit / 2);
    }

    let mut output_lits = Vec::with_capacity(num_outputs);
    for _ in 0..num_outputs {
        let line_no = cursor + 1;
        let lit = parse_single_lit(lines[cursor].trim(), line_no, "output")?;
        cursor += 1;
        if lit / 2 > max_var {
            bail!("output literal on line {} exceeds 2*M", line_no);
        }
        output_lits.push(lit);
    }

    let mut and_defs = Vec::with_capacity(num_ands);
    for _ in 0..num_ands {
        let line_no = cursor + 1;
        let parts = lines[cursor].split_whitespace().collect::<Vec<_>>();
        cursor += 1;
        if parts.len() != 3 {
            bail!("invalid and line {}: expected three literals", line_no);
        }
        let lhs = parse_u32_token(parts[0], "and lhs")?;
        let rhs0 = parse_u32_token(parts[1], "and rhs0")?;
        let rhs1 = parse_u32_token(parts[2], "and rhs1")?;
        if lhs == 0 || lhs % 2 == 1 {
            bail!("invalid and lhs on line {}: must be even and nonzero", line_no);
        }
        if lhs / 2 > max_var || rhs0 / 2 > max_var || rhs1 / 2 > max_var {
            bail!("and gate on line {} references a literal beyond 2*M", line_no);
        }
        and_defs.push((lhs / 2, rhs0, rhs1));
    }

    let (input_names, output_names) =
        parse_symbols(&lines[cursor..], cursor + 1, num_inputs, num_outputs)?;

    let mut ntk = Netlist::new();
    ntk.define_gate(GateId(0), GateKind::Const0, None)
        .context("constant gate")?;

    for (pos, &var) in input_vars.iter().enumerate() {
        ntk.define_gate(GateId(var), GateKind::PrimaryInput, input_names.get(&pos).cloned())
            .with_context(|| format!("input {}", pos))?;
    }

    for &(var, rhs0, rhs1) in &and_defs {
        let id = ntk
            .define_gate(GateId(var), GateKind::And, None)
            .with_context(|| format!("and gate {}", var))?;
        ntk.set_fanin(id, 0, lit_to_edge(rhs0))?;
        ntk.set_fanin(id, 1, lit_to_edge(rhs1))?;
    }

    for (pos, &lit) in output_lits.iter().enumerate() {
        let id = ntk
            .define_gate(
                GateId(max_var + 1 + pos as u32),
                GateKind::PrimaryOutput,
                output_names.get(&pos).cloned(),
            )
            .with_context(|| format!("output {}", pos))?;
        ntk.set_fanin(id, 0, lit_to_edge(lit))?;
    }

    ntk.finish_read()?;
    debug!(
        inputs = num_inputs,
        outputs = num_outputs,
        ands = num_ands,
        "aag circuit read"
    );
    Ok(ntk)
}

type SymbolMaps = (HashMap<usize, String>, HashMap<usize, String>);

fn parse_symbols(
    lines: &[String],
    first_line_no: usize,
    num_inputs: usize,
    num_outputs: usize,
) -> Result<SymbolMaps> {
    let mut input_names = HashMap::new();
    let mut output_names = HashMap::new();
    for (offset, line) in lines.iter().enumerate() {
        let line_no = first_line_no + offset;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // comment section runs to end of file
        if line == "c" {
            break;
        }
        let Some((tag, name)) = line.split_once(char::is_whitespace) else {
            bail!("invalid symbol line {}: expected position and name", line_no);
        };
        if let Some(pos_str) = tag.strip_prefix('i') {
            let pos = parse_symbol_pos(pos_str, line_no)?;
            if pos >= num_inputs {
                bail!("symbol line {} names input {} of {}", line_no, pos, num_inputs);
            }
            input_names.insert(pos, name.trim().to_owned());
        } else if let Some(pos_str) = tag.strip_prefix('o') {
            let pos = parse_symbol_pos(pos_str, line_no)?;
            if pos >= num_outputs {
                bail!("symbol line {} names output {} of {}", line_no, pos, num_outputs);
            }
            output_names.insert(pos, name.trim().to_owned());
        } else {
            bail!("invalid symbol line {}: unknown tag {:?}", line_no, tag);
        }
    }
    Ok((input_names, output_names))
}

fn parse_symbol_pos(pos_str: &str, line_no: usize) -> Result<usize> {
    pos_str
        .parse::<usize>()
        .with_context(|| format!("invalid symbol position on line {}", line_no))
}

fn parse_single_lit(line: &str, line_no: usize, kind: &str) -> Result<u32> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 1 {
        bail!(
            "invalid {} line {}: expected one literal, got {} fields",
            kind,
            line_no,
            parts.len()
        );
    }
    parse_u32_token(parts[0], kind)
}

fn parse_u32_token(token: &str, what: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .with_context(|| format!("invalid {} value: {}", what, token))
}

fn lit_to_edge(lit: u32) -> Edge {
    Edge::new(GateId(lit / 2), lit % 2 == 1)
}

#[cfg(test)]
mod tests {
    use super::read_aag_str;
    use crate::ntk::gate::{GateId, GateKind};

    #[test]
    fn reads_tiny_aag_with_symbols() {
        let src = "\
aag 2 1 0 1 1
2
4
4 2 2
i0 enable
o0 out
";
        let ntk = match read_aag_str(src) {
            Ok(v) => v,
            Err(e) => panic!("read failed: {e}"),
        };

        let pi = ntk.gate(GateId(1)).expect("pi");
        assert_eq!(pi.kind, GateKind::PrimaryInput);
        assert_eq!(pi.name.as_deref(), Some("enable"));

        let po = ntk.gate(GateId(3)).expect("po");
        assert_eq!(po.kind, GateKind::PrimaryOutput);
        assert_eq!(po.name.as_deref(), Some("out"));

        let and = ntk.gate(GateId(2)).expect("and");
        assert_eq!(and.kind, GateKind::And);
        assert_eq!(and.fanin().count(), 2);
    }
}
