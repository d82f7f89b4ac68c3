use anyhow::Result;

use artcfg_lib::codegen::CodegenArches;

use crate::BuildArgs;
use crate::output::{format_list, print_json, print_stat};

pub fn cmd_arches(args: &BuildArgs) -> Result<()> {
  let (file, knobs) = super::load(args)?;
  let arches = CodegenArches::resolve(&knobs, &file.platform);

  if args.json {
    print_json(&arches)?;
  } else {
    println!("Codegen architectures:");
    print_stat("device", &format_list(&arches.device));
    print_stat("host", &format_list(&arches.host));
  }

  Ok(())
}
