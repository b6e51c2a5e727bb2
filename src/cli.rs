//! Command-line driver.
//!
//! Loads a grammar file, computes FIRST/FOLLOW, builds both parsing tables,
//! classifies conflicts, and simulates each supplied token stream on both
//! recognizers. Everything printed to the console is also appended to the
//! report file; recognizer traces go to the report only.

use crate::conflict;
use crate::error::Result;
use crate::first_follow::FirstFollow;
use crate::grammar::Grammar;
use crate::ll1::LL1Parser;
use crate::report::{self, GlobalReport, ReportWriter};
use crate::resolver;
use crate::slr1::SLR1Parser;
use crate::trace::{StdoutSink, TraceSink, write_block};
use clap::Parser;
use colored::Colorize;
use log::warn;
use std::path::PathBuf;

/// Grammar analysis and parser generation for context-free grammars.
#[derive(Parser, Debug)]
#[command(name = "cfg_analyzer", version)]
pub struct Args {
    /// Grammar file: one production per line, `->` or `→` arrows,
    /// `|` alternatives, `ε` for the empty alternative, `#` comments
    pub grammar: PathBuf,

    /// Token stream to simulate, whitespace-separated (repeatable)
    #[arg(short = 'p', long = "parse", value_name = "TOKENS")]
    pub inputs: Vec<String>,

    /// Report file; receives everything printed plus the parse traces
    #[arg(long, default_value = "report.txt", value_name = "FILE")]
    pub report: PathBuf,

    /// Print the FIRST/FOLLOW sets
    #[arg(long)]
    pub sets: bool,

    /// Print the parsing tables and the LR state machine
    #[arg(long)]
    pub tables: bool,
}

/// Main entry point for the analyzer binary.
pub fn run() -> Result<()> {
    env_logger::init();
    run_with(Args::parse())
}

fn run_with(args: Args) -> Result<()> {
    let grammar = Grammar::from_file(&args.grammar)?;

    match ReportWriter::create(&args.report) {
        Ok(writer) => {
            if report::install_global(writer).is_err() {
                warn!("report sink already installed; reusing the existing one");
            }
        }
        Err(e) => warn!(
            "cannot create report file '{}': {e}; traces will be dropped",
            args.report.display()
        ),
    }
    let mut report_sink = GlobalReport;

    let sets = FirstFollow::compute(&grammar);
    let ll1 = LL1Parser::new(&grammar, &sets);
    let slr1 = SLR1Parser::new(&grammar, &sets);

    publish(&mut report_sink, &grammar.render_summary());
    if args.sets {
        publish(&mut report_sink, &sets.render(&grammar));
    }
    if args.tables {
        publish(&mut report_sink, &ll1.table().render(&grammar));
        publish(&mut report_sink, &slr1.render_states());
        publish(&mut report_sink, &slr1.render_action_table());
        publish(&mut report_sink, &slr1.render_goto_table());
    }

    let mut conflicts = conflict::detect_ll1(&grammar, ll1.table());
    conflicts.extend(conflict::detect_lr(&grammar, &slr1));

    if conflicts.is_empty() {
        println!("{}", "No conflicts detected.".green());
        report_sink.write("No conflicts detected.");
    } else {
        println!(
            "{}",
            format!("{} conflict(s) detected.", conflicts.len()).red()
        );
        publish(&mut report_sink, &conflict::render_conflicts(&conflicts));
        publish(&mut report_sink, &resolver::render_resolutions(&conflicts));
    }

    for input in &args.inputs {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        simulate(
            &format!("LL(1) simulation of '{input}'"),
            &mut report_sink,
            |sink| ll1.parse(&tokens, sink),
        );
        simulate(
            &format!("SLR(1) simulation of '{input}'"),
            &mut report_sink,
            |sink| slr1.parse(&tokens, sink),
        );
    }

    println!("Report written to {}", args.report.display());
    Ok(())
}

/// Runs one recognizer over one input. A parse failure is reported, never
/// fatal.
fn simulate<F>(header: &str, report_sink: &mut dyn TraceSink, parse: F)
where
    F: FnOnce(&mut dyn TraceSink) -> std::result::Result<(), crate::error::ParseError>,
{
    report_sink.write(&format!("--- {header} ---"));
    match parse(&mut *report_sink) {
        Ok(()) => {
            println!("{header}: {}", "accepted".green());
            report_sink.write("Parsing complete.");
        }
        Err(e) => {
            println!("{header}: {} ({e})", "rejected".red());
            report_sink.write(&format!("Parsing failed: {e}"));
        }
    }
}

/// Prints a block to the console and mirrors it into the report.
fn publish(report_sink: &mut dyn TraceSink, block: &str) {
    write_block(&mut StdoutSink, block);
    write_block(report_sink, block);
}
