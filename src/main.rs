//! Runs a single directive over a JSON array of rows.
//!
//! ```text
//! wrangle <directive> [args...] [--input rows.json]
//! ```
//!
//! Rows are read from `--input`, or stdin if absent, and the
//! transformed rows are written to stdout. Logging goes to stderr and
//! is controlled by `RUST_LOG`.

use wrangle::directive::{default_registry, DirectiveRegistry, Environment, ExecutorContext};
use wrangle::row::Row;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use std::io::Read;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  if let Err(err) = run(std::env::args().skip(1).collect()) {
    eprintln!("Error: {:#}", err);
    std::process::exit(1);
  }
}

fn run(mut args: Vec<String>) -> anyhow::Result<()> {
  let registry = default_registry();
  let input = take_option(&mut args, "--input")?;
  if args.is_empty() {
    anyhow::bail!("no directive given\n{}", usage_summary(&registry));
  }
  let name = args.remove(0);
  let directive = registry.instantiate(&name, args)
    .with_context(|| format!("usage: {}", usage_line(&registry, &name)))?;

  let text = match &input {
    Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?,
    None => {
      let mut buf = String::new();
      std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
      buf
    }
  };
  let mut rows: Vec<Row> = serde_json::from_str(&text).context("rows must be a JSON array of objects")?;

  let context = ExecutorContext::new(Environment::Transform);
  directive.execute(&mut rows, &context)?;
  println!("{}", serde_json::to_string_pretty(&rows)?);
  Ok(())
}

/// Removes `flag` and the value following it from `args`.
fn take_option(args: &mut Vec<String>, flag: &str) -> anyhow::Result<Option<String>> {
  let Some(index) = args.iter().position(|arg| arg == flag) else {
    return Ok(None);
  };
  if index + 1 >= args.len() {
    anyhow::bail!("{} requires a value", flag);
  }
  let value = args.remove(index + 1);
  args.remove(index);
  Ok(Some(value))
}

fn usage_line(registry: &DirectiveRegistry, name: &str) -> String {
  match registry.get(name) {
    Ok(entry) => entry.usage().to_string(),
    Err(_) => usage_summary(registry),
  }
}

fn usage_summary(registry: &DirectiveRegistry) -> String {
  let lines: Vec<String> = registry.usages().map(|usage| format!("  {}", usage)).collect();
  format!("available directives:\n{}", lines.join("\n"))
}
