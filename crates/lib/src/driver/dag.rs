//! Defaults dependency graph between modules.
//!
//! An edge goes from a defaults module to every module listing it, so a
//! topological order composes defaults before their dependents.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::DriverError;
use crate::module::{ModuleDef, PendingModule};

pub struct ModuleGraph {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
  modules: BTreeMap<String, PendingModule>,
}

impl ModuleGraph {
  /// Registers every module and its composition steps.
  ///
  /// # Errors
  ///
  /// Fails on duplicate names, on `defaults` entries naming an unknown or
  /// non-defaults module, and on cycles.
  pub fn new(defs: Vec<ModuleDef>) -> Result<Self, DriverError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();
    let mut modules = BTreeMap::new();

    for def in defs {
      if nodes.contains_key(&def.name) {
        return Err(DriverError::DuplicateModule(def.name));
      }
      let idx = graph.add_node(def.name.clone());
      nodes.insert(def.name.clone(), idx);
      modules.insert(def.name.clone(), PendingModule::new(def));
    }

    for (name, module) in &modules {
      let dependent_idx = nodes[name];
      for defaults in &module.def().defaults {
        let Some(base) = modules.get(defaults) else {
          return Err(DriverError::UnknownDefaults {
            module: name.clone(),
            defaults: defaults.clone(),
          });
        };
        if !base.def().kind.is_defaults() {
          return Err(DriverError::NotDefaults {
            module: name.clone(),
            defaults: defaults.clone(),
            kind: base.def().kind.to_string(),
          });
        }
        graph.add_edge(nodes[defaults], dependent_idx, ());
      }
    }

    toposort(&graph, None).map_err(|_| DriverError::CycleDetected)?;

    Ok(Self { graph, nodes, modules })
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn get(&self, name: &str) -> Option<&PendingModule> {
    self.modules.get(name)
  }

  /// Defaults listed by `name`, in declaration order.
  pub fn defaults_of(&self, name: &str) -> &[String] {
    self
      .modules
      .get(name)
      .map(|module| module.def().defaults.as_slice())
      .unwrap_or(&[])
  }

  /// Modules grouped into levels: every module's defaults are in earlier
  /// waves. Names inside a wave are sorted.
  pub fn waves(&self) -> Vec<Vec<String>> {
    let mut in_degree: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|idx| (idx, self.graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();
    let mut remaining: HashSet<NodeIndex> = self.graph.node_indices().collect();
    let mut waves = Vec::new();

    while !remaining.is_empty() {
      let ready: Vec<NodeIndex> = remaining.iter().filter(|idx| in_degree[*idx] == 0).copied().collect();
      // Acyclicity is checked in `new`.
      if ready.is_empty() {
        break;
      }

      for idx in &ready {
        remaining.remove(idx);
        for neighbor in self.graph.neighbors_directed(*idx, Direction::Outgoing) {
          if let Some(deg) = in_degree.get_mut(&neighbor) {
            *deg = deg.saturating_sub(1);
          }
        }
      }

      let mut wave: Vec<String> = ready.into_iter().map(|idx| self.graph[idx].clone()).collect();
      wave.sort();
      waves.push(wave);
    }

    waves
  }

  pub(super) fn take(&mut self, name: &str) -> Option<PendingModule> {
    self.modules.remove(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }
}
