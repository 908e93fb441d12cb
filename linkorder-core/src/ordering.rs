use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::toposort;
use petgraph::dot::Dot;
use petgraph::graph::NodeIndex;
use petgraph::Graph;

use crate::domain::{DependencyEdge, LibInfo, LibrarySet, LinkPlan};
use crate::error::{DepFindError, DepFindResult};

/// Symbol name for reports; invalid UTF-8 is byte-escaped so names stay distinct.
fn symbol_label(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(name) => name.to_string(),
        Err(_) => bytes.escape_ascii().to_string(),
    }
}

/// Directed graph with an edge from each library to every library that
/// satisfies one of its undefined symbols. Edge weights count those symbols.
pub struct DependencyGraph {
    graph: Graph<LibInfo, usize>,
    edge_symbols: BTreeMap<(NodeIndex, NodeIndex), BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn build(libs: &LibrarySet) -> Self {
        let mut graph = Graph::<LibInfo, usize>::new();
        let mut lib_to_index: HashMap<&LibInfo, NodeIndex> = HashMap::new();
        for lib in &libs.libs {
            lib_to_index.insert(lib, graph.add_node(lib.clone()));
        }

        let mut edge_symbols: BTreeMap<(NodeIndex, NodeIndex), BTreeSet<String>> = BTreeMap::new();
        for (symbol, dependent) in &libs.symbols.undefined {
            let Some(dependency) = libs.symbols.defining_lib(symbol) else {
                continue;
            };
            let Some(&dependency_index) = lib_to_index.get(dependency) else {
                continue;
            };
            let Some(&dependent_index) = lib_to_index.get(dependent) else {
                continue;
            };
            if dependency_index == dependent_index {
                continue;
            }

            edge_symbols
                .entry((dependent_index, dependency_index))
                .or_default()
                .insert(symbol_label(symbol.as_bytes()));
        }

        for (&(dependent, dependency), symbols) in &edge_symbols {
            graph.add_edge(dependent, dependency, symbols.len());
        }

        Self { graph, edge_symbols }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.edge_symbols
            .iter()
            .map(|(&(dependent, dependency), symbols)| DependencyEdge {
                dependent: self.graph[dependent].name.clone(),
                dependency: self.graph[dependency].name.clone(),
                symbols: symbols.iter().cloned().collect(),
            })
            .collect()
    }

    pub fn topological_order(&self) -> DepFindResult<Vec<LibInfo>> {
        let ordered = toposort(&self.graph, None).map_err(|cycle| {
            DepFindError::CyclicDependency {
                library: self.graph[cycle.node_id()].name.clone(),
            }
        })?;

        Ok(ordered
            .into_iter()
            .map(|index| self.graph[index].clone())
            .collect())
    }

    /// Graphviz rendering, edges labelled with their symbol count.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }
}

pub fn order_dependencies(libs: &LibrarySet) -> DepFindResult<Vec<LibInfo>> {
    DependencyGraph::build(libs).topological_order()
}

pub fn build_link_plan(libs: &LibrarySet) -> DepFindResult<LinkPlan> {
    let graph = DependencyGraph::build(libs);
    let libraries = graph.topological_order()?;
    log::info!(
        "Ordered {} libraries with {} dependency edges",
        libraries.len(),
        graph.edge_count()
    );
    Ok(LinkPlan {
        libraries,
        edges: graph.edges(),
    })
}
