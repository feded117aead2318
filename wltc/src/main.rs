mod command_args;
mod compile_command;
mod exit_command_failed;
mod handle_diagnostics_cli;
mod payloads_command;

use std::env;
use std::process::exit;

use compile_command::compile_command;
use payloads_command::payloads_command;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let args: Vec<String> = env::args().collect();

  match args.get(1).map(|s| s.as_str()) {
    Some("help") | Some("-h") | Some("--help") | None => show_help(),
    Some("-V") | Some("--version") => println!("wltc {}", env!("CARGO_PKG_VERSION")),
    Some("compile") => compile_command(&args),
    Some("payloads") => payloads_command(&args),
    _ => {
      println!("ERROR: Unrecognized command\n");
      show_help();
      exit(1);
    }
  }
}

fn show_help() {
  println!("Worklet compiler {}", env!("CARGO_PKG_VERSION"));
  println!();
  println!("USAGE:");
  println!("  wltc [OPTIONS] [SUBCOMMAND]");
  println!();
  println!("OPTIONS:");
  println!("  -h, --help");
  println!("    Print help information");
  println!();
  println!("  -V, --version");
  println!("    Print version information");
  println!();
  println!("SUBCOMMANDS:");
  println!("  compile");
  println!("    Replace the worklets in a source file with their payloads");
  println!();
  println!("  payloads");
  println!("    Print the payloads of a source file as JSON");
  println!();
  println!("Set RUST_LOG (e.g. RUST_LOG=debug) for pass logging.");
}
