//! Knobs command implementation.
//!
//! Lists every recognised knob with the value composition would see.

use anyhow::Result;

use artcfg_lib::knob::names::{self, KnobKind};

use crate::BuildArgs;
use crate::output::{print_json, print_stat};

pub fn cmd_knobs(args: &BuildArgs) -> Result<()> {
  let (_, knobs) = super::load(args)?;

  let rows: Vec<_> = names::ALL
    .iter()
    .map(|info| {
      let value = match info.kind {
        KnobKind::Bool => Some(knobs.tristate(info.name).as_str().to_string()),
        KnobKind::String => knobs.string_opt(info.name),
      };
      (info, value)
    })
    .collect();

  if args.json {
    let json_output: Vec<_> = rows
      .iter()
      .map(|(info, value)| {
        serde_json::json!({
          "name": info.name,
          "kind": info.kind.as_str(),
          "value": value,
          "default": info.default,
          "effect": info.effect,
        })
      })
      .collect();
    print_json(&json_output)?;
  } else {
    for (info, value) in &rows {
      let shown = match (value, info.default) {
        (Some(value), _) => value.clone(),
        (None, Some(default)) => format!("{} (default)", default),
        (None, None) => "(unset)".to_string(),
      };
      print_stat(info.name, &shown);
    }
  }

  Ok(())
}
