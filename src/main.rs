// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmpix

//! phasmpix CLI: hide messages in images.
//!
//! Status lines go to stderr; command results (including a revealed payload
//! without `-o`) go to stdout. Any error exits non-zero.

use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "phasmpix", version, about = "Hide messages in images")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Conceal a message or file in an image
    Conceal(commands::conceal::ConcealArgs),
    /// Reveal a message hidden in an image
    Reveal(commands::reveal::RevealArgs),
    /// Verify the integrity of a stego image without extracting it
    Verify(commands::verify::VerifyArgs),
    /// Calculate the storage capacity of an image
    Capacity(commands::capacity::CapacityArgs),
    /// Inspect a stego image and display its metadata header
    Info(commands::info::InfoArgs),
    /// Analyze the difference between an original and a stego image
    Analyze(commands::analyze::AnalyzeArgs),
    /// Generate a pair of public and private RSA keys
    Keys(commands::keys::KeysArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Conceal(args) => commands::conceal::run(args, cli.verbose),
        Command::Reveal(args) => commands::reveal::run(args, cli.verbose),
        Command::Verify(args) => commands::verify::run(args, cli.verbose),
        Command::Capacity(args) => commands::capacity::run(args),
        Command::Info(args) => commands::info::run(args),
        Command::Analyze(args) => commands::analyze::run(args),
        Command::Keys(args) => commands::keys::run(args),
    }
}
