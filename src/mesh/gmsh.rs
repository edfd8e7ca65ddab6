use crate::{
  error::{Error, Result},
  geometry::Point,
  graph::Graph,
};

use itertools::Itertools;
use tracing::{info, warn};

/// Load Gmesh `.msh` file (version 4.1) as a graph.
///
/// Every simplex element contributes the edges between all pairs of its
/// vertices. Node tags are assumed to be contiguous and start at 1.
pub fn load_gmsh(bytes: &[u8]) -> Result<Graph> {
  let msh = mshio::parse_msh_bytes(bytes).map_err(|e| Error::Gmsh(format!("{e:?}")))?;

  let nodes = msh
    .data
    .nodes
    .ok_or_else(|| Error::Gmsh("missing nodes section".to_string()))?;
  let elements = msh
    .data
    .elements
    .ok_or_else(|| Error::Gmsh("missing elements section".to_string()))?;

  let mut graph = Graph::new();
  for node in nodes.node_blocks.iter().flat_map(|block| block.nodes.iter()) {
    graph.add_node(Point::new(node.x, node.y, node.z));
  }

  for block in elements.element_blocks {
    type ElType = mshio::ElementType;
    match block.element_type {
      ElType::Pnt => continue,
      ElType::Lin2 | ElType::Tri3 | ElType::Tet4 => {}
      _ => {
        warn!("unsupported gmsh ElementType: {:?}", block.element_type);
        continue;
      }
    }
    for e in block.elements {
      let vertices: Vec<usize> = e
        .nodes
        .iter()
        .map(|&tag| {
          (tag as usize)
            .checked_sub(1)
            .ok_or_else(|| Error::Gmsh(format!("invalid node tag {tag}")))
        })
        .collect::<Result<_>>()?;
      for (a, b) in vertices.into_iter().tuple_combinations() {
        graph.add_edge(a, b)?;
      }
    }
  }

  info!(
    "loaded gmsh graph with {} nodes and {} edges",
    graph.nnodes(),
    graph.nedges()
  );
  Ok(graph)
}
