use std::process::exit;

pub fn exit_command_failed(args: &[String], context: Option<&str>, help: &str) -> ! {
  eprintln!("Command failed: {:?}", args);

  if let Some(context) = context {
    eprintln!("  {}", context);
  }

  eprintln!("  For help: {}", help);

  exit(1);
}
