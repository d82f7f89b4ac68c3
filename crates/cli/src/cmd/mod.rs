mod arches;
mod compose;
mod knobs;

use anyhow::{Context, Result};
use tracing::debug;

use artcfg_lib::config::BuildFile;
use artcfg_lib::knob::{Knobs, MapEnv, names};

use crate::BuildArgs;
use crate::output::print_warning;

pub use arches::cmd_arches;
pub use compose::cmd_compose;
pub use knobs::cmd_knobs;

/// Loads the build file and layers `-e` overrides over its knobs.
fn load(args: &BuildArgs) -> Result<(BuildFile, Knobs)> {
  let file = BuildFile::load(&args.file).with_context(|| format!("Failed to load build file: {}", args.file.display()))?;
  for (key, _) in &args.env {
    if names::lookup(key).is_none() {
      print_warning(&format!("{} is not a recognised knob", key));
    }
  }
  let overrides = MapEnv::from_pairs(args.env.iter().cloned());
  debug!(file = %args.file.display(), overrides = args.env.len(), "layering knob overrides");
  let knobs = file.knobs(overrides);
  Ok((file, knobs))
}
