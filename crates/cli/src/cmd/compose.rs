//! Implementation of the `artcfg compose` command.
//!
//! Runs the load and install phases over every module of a build file and
//! reports the final properties, the failures and the recorded tests.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use artcfg_lib::codegen::CodegenArches;
use artcfg_lib::context::BuildContext;
use artcfg_lib::driver::{self, DriverConfig, DriverResult, ModuleGraph};
use artcfg_lib::module::{ComposedModule, Installer, LayoutInstaller, PlacementProperties};
use artcfg_lib::registry::TestRegistry;

use crate::BuildArgs;
use crate::output::{
  format_duration, format_list, print_error, print_info, print_json, print_stat, print_success, print_warning, symbols,
};

#[derive(Serialize)]
struct ComposeReport<'a> {
  arches: &'a CodegenArches,
  #[serde(flatten)]
  result: &'a DriverResult,
  art_tests: &'a BTreeMap<String, Vec<PathBuf>>,
}

pub fn cmd_compose(args: &BuildArgs, jobs: Option<usize>, verbose: bool) -> Result<()> {
  let start = Instant::now();
  let (file, knobs) = super::load(args)?;

  let graph = ModuleGraph::new(file.modules).context("Invalid module set")?;
  let ctx = Arc::new(BuildContext::new(knobs, file.platform));
  let installer: Arc<dyn Installer> = Arc::new(LayoutInstaller::new(&file.install_root));
  let mut config = DriverConfig::default();
  if let Some(jobs) = jobs {
    config.parallelism = jobs;
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(driver::run(graph, Arc::clone(&ctx), installer, &config));
  let tests = ctx.registry().snapshot();

  if args.json {
    print_json(&ComposeReport {
      arches: ctx.arches(),
      result: &result,
      art_tests: &tests,
    })?;
  } else {
    print_result(&result, verbose);

    if !tests.is_empty() {
      println!();
      println!("{}:", TestRegistry::NAME);
      for (key, paths) in &tests {
        for path in paths {
          println!("  {} {} {} {}", symbols::INFO, key, symbols::ARROW, path.display());
        }
      }
    }

    println!();
    print_stat("Composed", &result.composed.len().to_string());
    print_stat("Failed", &result.failed.len().to_string());
    print_stat("Skipped", &result.skipped.len().to_string());
    print_stat("Tests recorded", &result.installed.to_string());
    print_stat("Time", &format_duration(start.elapsed()));
  }

  if !result.is_success() {
    bail!(
      "{} module(s) failed, {} skipped",
      result.failed.len(),
      result.skipped.len()
    );
  }

  Ok(())
}

fn print_result(result: &DriverResult, verbose: bool) {
  for module in result.composed.values() {
    print_module(module, verbose);
  }

  for (name, failure) in &result.failed {
    print_error(&format!("{}: {}", name, failure));
  }

  for (name, dep) in &result.skipped {
    print_warning(&format!("{}: skipped, defaults module {} failed", name, dep));
  }

  if result.total() == 0 {
    print_info("No modules declared");
  }
}

fn print_module(module: &ComposedModule, verbose: bool) {
  print_success(&format!("{} ({})", module.name, module.kind));

  let props = &module.properties;
  print_stat("cflags", &format_list(props.cflags.as_slice()));
  if !verbose {
    return;
  }

  print_stat("asflags", &format_list(props.asflags.as_slice()));
  print_stat("srcs", &format_list(&props.srcs));
  print_stat("whole_static_libs", &format_list(&props.whole_static_libs));
  print_stat("shared_libs", &format_list(&props.shared_libs));
  if let Some(linker) = &props.dynamic_linker {
    print_stat("dynamic_linker", linker);
  }
  print_placement("android", &props.target.android);
  print_placement("host", &props.target.host);

  for &placement in &module.placements {
    print_stat(
      &format!("{} effective cflags", placement),
      &format_list(props.effective_cflags(placement).as_slice()),
    );
  }
}

fn print_placement(tag: &str, props: &PlacementProperties) {
  if props.is_empty() {
    return;
  }
  print_stat(&format!("{}.cflags", tag), &format_list(props.cflags.as_slice()));
  print_stat(&format!("{}.srcs", tag), &format_list(&props.srcs));
  if !props.whole_static_libs.is_empty() {
    print_stat(&format!("{}.whole_static_libs", tag), &format_list(&props.whole_static_libs));
  }
  if !props.shared_libs.is_empty() {
    print_stat(&format!("{}.shared_libs", tag), &format_list(&props.shared_libs));
  }
  if let Some(multilib) = &props.compile_multilib {
    print_stat(&format!("{}.compile_multilib", tag), multilib);
  }
}
