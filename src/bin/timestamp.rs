//! `timestamp`: print a filesystem-safe timestamp segment.
use clap::Parser;
use workstation_cli::cli::TimestampArgs;
use workstation_cli::timestamp::new_timestamp_segment;

#[allow(clippy::print_stdout)]
fn main() {
    let _ = TimestampArgs::parse();
    println!("{}", new_timestamp_segment());
}
