//! # Schema Subcommand
//!
//! Prints the structural JSON Schema generated from the shared field
//! descriptors, so it can be inspected or edited and passed back through
//! `cocov validate --schema`.

use anyhow::Result;
use clap::Args;

use cocov_schema::structure_schema;

/// Arguments for the `cocov schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print the schema on a single line.
    #[arg(long)]
    pub compact: bool,
}

pub fn render_schema(compact: bool) -> Result<String> {
    let schema = structure_schema();
    let text = if compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };
    Ok(text)
}

/// Execute the schema subcommand. Always exits 0.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    println!("{}", render_schema(args.compact)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cocov_schema::SCHEMA_ID;
    use serde_json::Value;

    #[test]
    fn compact_output_is_one_line() {
        let text = render_schema(true).unwrap();
        assert!(!text.contains('\n'));
    }

    #[test]
    fn rendered_schema_parses_back() {
        let text = render_schema(false).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["$id"], SCHEMA_ID);
        assert_eq!(value, structure_schema());
    }
}
