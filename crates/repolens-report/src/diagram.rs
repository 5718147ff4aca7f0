use repolens_core::graph::ArchitectureGraph;
use repolens_core::types::Layer;

/// Generate a Mermaid flowchart with one subgraph per populated layer,
/// in fixed layer order, and labeled edges between nodes.
pub fn generate(graph: &ArchitectureGraph) -> String {
    let mut out = String::new();
    out.push_str("flowchart TB\n");

    for layer in Layer::ALL {
        let nodes = graph.layer_nodes(layer);
        if nodes.is_empty() {
            continue;
        }
        out.push_str(&format!("  subgraph {layer}[\"{}\"]\n", layer.title()));
        for node in nodes {
            out.push_str(&format!("    {}[\"{}\"]\n", node.id, node.label));
        }
        out.push_str("  end\n");
    }

    for edge in &graph.edges {
        out.push_str(&format!(
            "  {} -->|\"{}\"| {}\n",
            edge.from, edge.label, edge.to
        ));
    }

    out.push_str("\n  style user fill:#e3f2fd\n");
    if !graph.layer_nodes(Layer::Presentation).is_empty() {
        out.push_str("  style presentation fill:#e8f5e9\n");
    }
    if !graph.layer_nodes(Layer::Data).is_empty() {
        out.push_str("  style data fill:#fff3e0\n");
    }
    if !graph.layer_nodes(Layer::Tooling).is_empty() {
        out.push_str("  style tooling fill:#f3e5f5\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_core::{analyze, FileEntry};

    #[test]
    fn test_generate_minimal_graph() {
        let analysis = analyze(&[]);
        let diagram = generate(&analysis.graph);
        assert!(diagram.contains("flowchart TB"));
        assert!(diagram.contains("subgraph user[\"Users\"]"));
        assert!(diagram.contains("n0[\"End Users\"]"));
        assert!(!diagram.contains("-->"));
    }

    #[test]
    fn test_generate_full_stack_graph() {
        let entries = vec![
            FileEntry::file_with_content(
                "package.json",
                r#"{"dependencies":{"express":"^4.18.0"}}"#,
            ),
            FileEntry::file("src/App.tsx"),
            FileEntry::file("src/api/users.ts"),
            FileEntry::file("prisma/schema.prisma"),
        ];
        let analysis = analyze(&entries);
        let diagram = generate(&analysis.graph);

        assert!(diagram.contains("subgraph presentation[\"Presentation\"]"));
        assert!(diagram.contains("subgraph data[\"Data\"]"));
        assert!(diagram.contains("React Application"));
        assert!(diagram.contains("Prisma ORM"));
        assert!(diagram.contains("-->|\"Data Queries\"|"));
    }

    #[test]
    fn test_unpopulated_layers_are_omitted() {
        let analysis = analyze(&[FileEntry::file("src/App.tsx")]);
        let diagram = generate(&analysis.graph);
        assert!(!diagram.contains("subgraph infrastructure"));
        assert!(!diagram.contains("subgraph api"));
    }

    #[test]
    fn test_diagram_is_deterministic() {
        let entries = vec![
            FileEntry::file("src/App.tsx"),
            FileEntry::file("Dockerfile"),
        ];
        let a = generate(&analyze(&entries).graph);
        let b = generate(&analyze(&entries).graph);
        assert_eq!(a, b);
    }
}
