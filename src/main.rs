use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use aigscope::front::aiger::read_aag_reader;
use aigscope::front::fecfile::parse_partition_reader;
use aigscope::query::cone::ConeReport;
use aigscope::{GateId, Netlist, NtkError, Summary};

#[derive(Parser, Debug)]
#[command(name = "aigscope")]
#[command(about = "Netlist management and structural queries over and-inverter graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Command session reading from stdin or a script file.
    ///
    /// Commands: read <file> [-replace] | print [summary|netlist|pi|po|
    /// floating|fec] | gate <id> [-fanin <depth> | -fanout <depth>] |
    /// opt | strash | sim <partition-file> | quit
    Shell { script: Option<String> },
    /// One-shot structural report over an .aag file
    Report {
        path: String,
        #[arg(long)]
        netlist: bool,
        #[arg(long)]
        floating: bool,
        #[arg(long)]
        dangling: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Shell { script } => run_shell(script.as_deref()),
        Commands::Report {
            path,
            netlist,
            floating,
            dangling,
        } => run_report(&path, netlist, floating, dangling),
    }
}

fn run_shell(script: Option<&str>) -> Result<()> {
    let mut session = Session { ntk: None };
    let mut run_lines = |reader: Box<dyn BufRead>| -> Result<()> {
        for line in reader.lines() {
            let line = line.context("failed to read command input")?;
            match session.dispatch(line.trim()) {
                Ok(Outcome::Quit) => return Ok(()),
                Ok(Outcome::Continue) => {}
                // a cyclic netlist means an upstream builder bug; stop
                Err(e) if is_cyclic(&e) => return Err(e),
                Err(e) => eprintln!("error: {e:#}"),
            }
        }
        Ok(())
    };
    match script {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open script {}", path))?;
            run_lines(Box::new(BufReader::new(file)))
        }
        None => run_lines(Box::new(io::stdin().lock())),
    }
}

fn is_cyclic(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<NtkError>(),
        Some(NtkError::CyclicGraph { .. })
    )
}

enum Outcome {
    Continue,
    Quit,
}

struct Session {
    ntk: Option<Netlist>,
}

impl Session {
    fn dispatch(&mut self, line: &str) -> Result<Outcome> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Continue);
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "read" => self.cmd_read(&tokens[1..])?,
            "print" => self.cmd_print(&tokens[1..])?,
            "gate" => self.cmd_gate(&tokens[1..])?,
            "opt" => {
                self.current()?.mark_optimized()?;
                println!("optimize pass recorded");
            }
            "strash" => {
                self.current()?.mark_strashed()?;
                println!("strash pass recorded");
            }
            "sim" => self.cmd_sim(&tokens[1..])?,
            "quit" | "q" => return Ok(Outcome::Quit),
            other => bail!("unknown command {:?}", other),
        }
        Ok(Outcome::Continue)
    }

    fn current(&mut self) -> Result<&mut Netlist> {
        self.ntk
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("circuit is not yet constructed"))
    }

    fn cmd_read(&mut self, args: &[&str]) -> Result<()> {
        let mut replace = false;
        let mut path = None;
        for &arg in args {
            if arg == "-replace" {
                replace = true;
            } else if path.is_none() {
                path = Some(arg);
            } else {
                bail!("unexpected argument {:?}", arg);
            }
        }
        let Some(path) = path else {
            bail!("usage: read <file.aag> [-replace]");
        };
        if self.ntk.is_some() && !replace {
            bail!("circuit already exists (use -replace)");
        }
        let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
        let ntk = read_aag_reader(BufReader::new(file))?;
        if self.ntk.replace(ntk).is_some() {
            info!("original circuit replaced");
        }
        println!("read {}", path);
        Ok(())
    }

    fn cmd_print(&mut self, args: &[&str]) -> Result<()> {
        let what = args.first().copied().unwrap_or("summary");
        let ntk = self.current()?;
        match what {
            "summary" => print_summary(&ntk.summary()?),
            "netlist" => print_netlist(ntk)?,
            "pi" => {
                for id in ntk.pis()? {
                    let report = ntk.gate_report(id)?;
                    println!("pi {}{}", id, name_suffix(report.name.as_deref()));
                }
            }
            "po" => {
                for id in ntk.pos()? {
                    let report = ntk.gate_report(id)?;
                    println!("po {}{}", id, name_suffix(report.name.as_deref()));
                }
            }
            "floating" => {
                println!("floating=[{}]", join(ntk.floating_gates()?.iter()));
                println!("dangling=[{}]", join(ntk.dangling_gates()?.iter()));
            }
            "fec" => {
                println!("classes={}", ntk.num_classes()?);
                for (repr, member, inverted) in ntk.equiv_pairs()? {
                    let mark = if inverted { "!" } else { "" };
                    println!("pair {} {}{}", repr, mark, member);
                }
            }
            other => bail!("unknown print target {:?}", other),
        }
        Ok(())
    }

    fn cmd_gate(&mut self, args: &[&str]) -> Result<()> {
        let Some(id_str) = args.first() else {
            bail!("usage: gate <id> [-fanin <depth> | -fanout <depth>]");
        };
        let id = GateId(
            id_str
                .parse::<u32>()
                .with_context(|| format!("invalid gate id {:?}", id_str))?,
        );
        let ntk = self.current()?;
        match args.get(1).copied() {
            None => {
                let report = ntk.gate_report(id)?;
                println!(
                    "gate {}: {} level={} fanin=[{}] fanout=[{}]{}",
                    report.id,
                    report.kind,
                    report.level,
                    join(report.fanin.iter()),
                    join(report.fanout.iter()),
                    name_suffix(report.name.as_deref()),
                );
            }
            Some(flag @ ("-fanin" | "-fanout")) => {
                let Some(depth_str) = args.get(2) else {
                    bail!("{} needs a depth", flag);
                };
                let depth = depth_str
                    .parse::<i32>()
                    .with_context(|| format!("invalid depth {:?}", depth_str))?;
                let report = if flag == "-fanin" {
                    ntk.fanin_cone(id, depth)?
                } else {
                    ntk.fanout_cone(id, depth)?
                };
                print_cone(flag, depth, &report);
            }
            Some(other) => bail!("unexpected argument {:?}", other),
        }
        Ok(())
    }

    fn cmd_sim(&mut self, args: &[&str]) -> Result<()> {
        let Some(path) = args.first() else {
            bail!("usage: sim <partition-file>");
        };
        let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
        let partition = parse_partition_reader(BufReader::new(file))?;
        let ntk = self.current()?;
        ntk.ingest(&partition)?;
        println!("ingested {} class(es)", ntk.num_classes()?);
        Ok(())
    }
}

fn run_report(path: &str, netlist: bool, floating: bool, dangling: bool) -> Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    let ntk = read_aag_reader(BufReader::new(file))?;
    print_summary(&ntk.summary()?);
    if netlist {
        print_netlist(&ntk)?;
    }
    if floating {
        println!("floating=[{}]", join(ntk.floating_gates()?.iter()));
    }
    if dangling {
        println!("dangling=[{}]", join(ntk.dangling_gates()?.iter()));
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!(
        "stage={} gates={} pis={} pos={} ands={} consts={} undefs={}",
        summary.stage,
        summary.total,
        summary.pis,
        summary.pos,
        summary.ands,
        summary.consts,
        summary.undefs,
    );
    println!(
        "floating={} dangling={} classes={} max_level={}",
        summary.floating, summary.dangling, summary.classes, summary.max_level,
    );
}

fn print_netlist(ntk: &Netlist) -> Result<()> {
    for (pos, id) in ntk.netlist_order()?.iter().enumerate() {
        let report = ntk.gate_report(*id)?;
        println!(
            "{}: {} {} level={} fanin=[{}]{}",
            pos,
            report.kind,
            report.id,
            report.level,
            join(report.fanin.iter()),
            name_suffix(report.name.as_deref()),
        );
    }
    Ok(())
}

fn print_cone(flag: &str, depth: i32, report: &ConeReport) {
    println!("{} cone of {} depth={}", &flag[1..], report.root, depth);
    for entry in &report.entries {
        let indent = "  ".repeat(entry.depth as usize);
        let mark = if entry.inverted { "!" } else { "" };
        let revisit = if entry.revisit { " (*)" } else { "" };
        println!("{}{}{}{}", indent, mark, entry.gate, revisit);
    }
}

fn name_suffix(name: Option<&str>) -> String {
    name.map(|n| format!(" name={}", n)).unwrap_or_default()
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|x| x.to_string()).collect::<Vec<_>>().join(", ")
}
