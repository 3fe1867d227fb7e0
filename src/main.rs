// ============================================================
// File: main.rs
//
// Description:
//   Demo driver for the two index trees. Feeds the fixed key
//   sequence [10, 20, 5, 6, 12, 30, 7, 17] into each tree and
//   prints the search results, or runs a small REPL:
//
//     INSERT <key> -> Insert into both trees
//     SEARCH <key> -> Search both trees
//     DELETE <key> -> Delete from the rebalancing tree
//     KEYS         -> Print both trees in order
//     EXIT         -> Terminate the program
//
// Notes:
//   - Tree settings come from flags and/or a JSON config file.
// ============================================================
use anyhow::{Context, Result, bail};
use btree_index::{BPlusTree, FilteredBTree, TreeConfig};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Keys fed to both trees by the demo.
const DEMO_KEYS: [i64; 8] = [10, 20, 5, 6, 12, 30, 7, 17];
/// Keys deleted from the rebalancing tree by the demo.
const DEMO_DELETES: [i64; 3] = [6, 20, 5];
/// Keys that are never inserted.
const NEVER_INSERTED: [i64; 3] = [4, 22, 100];


#[derive(Parser, Debug)]
#[command(
    name = "btree-index",
    version,
    about = "Demo driver for the filtered B-tree and the rebalancing tree"
)]
struct Cli {
    /// Minimum degree t (defaults: 3 for btree, 2 for bplus)
    #[arg(long)]
    degree: Option<usize>,

    /// Bits per node filter (m)
    #[arg(long)]
    bits: Option<usize>,

    /// Probes per filter lookup (k)
    #[arg(long)]
    probes: Option<u32>,

    /// JSON file holding a TreeConfig
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the filtered B-tree scenario
    Btree,
    /// Run the rebalancing tree scenario
    Bplus,
    /// Run both scenarios
    All,
    /// Read commands from standard input
    Repl,
}


fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::All) {
        Command::Btree => run_btree(build_config(&cli, 3)?),
        Command::Bplus => run_bplus(build_config(&cli, 2)?),
        Command::All => {
            run_btree(build_config(&cli, 3)?);
            println!();
            run_bplus(build_config(&cli, 2)?);
        }
        Command::Repl => repl_loop(build_config(&cli, 2)?)?,
    }
    Ok(())
}


/// Merge the config file (if any) with command line overrides.
fn build_config(cli: &Cli, default_degree: usize) -> Result<TreeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str::<TreeConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => TreeConfig::with_degree(default_degree),
    };

    if let Some(t) = cli.degree {
        config.min_degree = t;
    }
    if let Some(bits) = cli.bits {
        config.filter.bits = bits;
    }
    if let Some(probes) = cli.probes {
        config.filter.probes = probes;
    }

    config.validate().context("invalid tree settings")?;
    Ok(config)
}


/// Filtered B-tree: insert the demo keys, then search for a present and an absent key.
fn run_btree(config: TreeConfig) {
    println!("Filtered B-tree (t = {})", config.min_degree);
    let mut tree = FilteredBTree::new(config);

    for key in DEMO_KEYS {
        println!("Inserting {}...", key);
        tree.insert(key);
    }

    println!("Search 6: {}", tree.search(&6));
    println!("Search 15: {}", tree.search(&15));
}


/// Rebalancing tree: insert the demo keys, delete a few, report what is left.
fn run_bplus(config: TreeConfig) {
    println!("B+ tree (t = {})", config.min_degree);
    let mut tree = BPlusTree::new(config);

    for key in DEMO_KEYS {
        tree.insert(key);
    }
    for key in DEMO_DELETES {
        tree.delete(&key);
    }

    let remaining = DEMO_KEYS.iter().filter(|k| !DEMO_DELETES.contains(*k));
    let gone = DEMO_DELETES.iter().chain(NEVER_INSERTED.iter());
    for key in remaining.chain(gone) {
        let found = if tree.search(key) { "found" } else { "not found" };
        println!("Value {} {} in the B+ tree.", key, found);
    }
}


/// Read–Evaluate–Print Loop over both trees.
fn repl_loop(config: TreeConfig) -> Result<()> {
    let mut filtered = FilteredBTree::new(config);
    let mut plain = BPlusTree::new(config);
    let proper_syntax = "Syntax Usage: INSERT <key>, SEARCH <key>, DELETE <key>, KEYS, EXIT";

    for input_line in io::stdin().lock().lines() {
        let full_command = input_line.context("reading standard input")?;
        let (cmd, args) = parse_command(&full_command);

        match cmd.as_str() {
            "INSERT" | "SEARCH" | "DELETE" => {
                let key = match parse_key(&args) {
                    Ok(key) => key,
                    Err(e) => {
                        println!("ERROR: {}", e);
                        continue;
                    }
                };
                match cmd.as_str() {
                    "INSERT" => {
                        filtered.insert(key);
                        plain.insert(key);
                        println!("OK");
                    }
                    "SEARCH" => {
                        println!("btree: {}", filtered.search(&key));
                        println!("bplus: {}", plain.search(&key));
                    }
                    _ => println!("{}", if plain.delete(&key) { 1 } else { 0 }),
                }
            }
            "KEYS" => {
                println!("btree: {:?}", filtered.keys());
                println!("bplus: {:?}", plain.keys());
            }
            "EXIT" | "QUIT" => break,
            "" => println!("Enter a command."),
            _ => {
                println!("ERROR: command '{}' not handled", cmd);
                println!("{}", proper_syntax);
            }
        }
    }
    Ok(())
}


/// Splits a line into an uppercased command and its arguments.
fn parse_command(line: &str) -> (String, Vec<String>) {
    let mut segments = line.split_whitespace();
    let cmd = segments.next().unwrap_or("").to_uppercase();
    let args = segments.map(|s| s.to_string()).collect();
    (cmd, args)
}


/// Exactly one integer argument.
fn parse_key(args: &[String]) -> Result<i64> {
    match args {
        [one] => one.parse().with_context(|| format!("'{}' is not an integer key", one)),
        _ => bail!("expected exactly one key"),
    }
}
