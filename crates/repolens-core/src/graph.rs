use serde::{Deserialize, Serialize};

use crate::profile::RepositoryProfile;
use crate::types::Layer;

/// One rendered box in the architecture diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureNode {
    /// Unique within one invocation, monotonically assigned.
    pub id: String,
    pub layer: Layer,
    pub label: String,
    /// The profile flags that caused this node to be instantiated.
    pub trigger_flags: Vec<String>,
}

/// A directed relation between two instantiated nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Node and edge set for one analysis invocation. Nodes appear in catalogue
/// declaration order, edges in adjacency-table declaration order; both are
/// reproducible for identical input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureGraph {
    pub nodes: Vec<ArchitectureNode>,
    pub edges: Vec<ArchitectureEdge>,
}

impl ArchitectureGraph {
    /// Nodes belonging to one layer, in instantiation order.
    pub fn layer_nodes(&self, layer: Layer) -> Vec<&ArchitectureNode> {
        self.nodes.iter().filter(|n| n.layer == layer).collect()
    }
}

/// Catalogue position. Mostly mirrors `Layer`, but splits the data layer
/// into its ORM and database slots so the adjacency table can route
/// business -> orm -> database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    User,
    Presentation,
    State,
    Api,
    Business,
    Orm,
    Database,
    Infrastructure,
    Tooling,
}

struct NodeSpec {
    label: String,
    trigger_flags: Vec<&'static str>,
}

struct NodeTemplate {
    slot: Slot,
    layer: Layer,
    build: fn(&RepositoryProfile) -> Option<NodeSpec>,
}

/// The fixed node-template catalogue, iterated in declaration order:
/// user first, then presentation, state, api, business, data, and the
/// outer tiers. A template whose trigger is false contributes nothing.
const CATALOG: &[NodeTemplate] = &[
    NodeTemplate {
        slot: Slot::User,
        layer: Layer::User,
        build: user_node,
    },
    NodeTemplate {
        slot: Slot::Presentation,
        layer: Layer::Presentation,
        build: presentation_node,
    },
    NodeTemplate {
        slot: Slot::State,
        layer: Layer::State,
        build: state_node,
    },
    NodeTemplate {
        slot: Slot::Api,
        layer: Layer::Api,
        build: api_node,
    },
    NodeTemplate {
        slot: Slot::Business,
        layer: Layer::Business,
        build: business_node,
    },
    NodeTemplate {
        slot: Slot::Orm,
        layer: Layer::Data,
        build: orm_node,
    },
    NodeTemplate {
        slot: Slot::Database,
        layer: Layer::Data,
        build: database_node,
    },
    NodeTemplate {
        slot: Slot::Infrastructure,
        layer: Layer::Infrastructure,
        build: infrastructure_node,
    },
    NodeTemplate {
        slot: Slot::Tooling,
        layer: Layer::Tooling,
        build: build_tool_node,
    },
    NodeTemplate {
        slot: Slot::Tooling,
        layer: Layer::Tooling,
        build: testing_node,
    },
    NodeTemplate {
        slot: Slot::Tooling,
        layer: Layer::Tooling,
        build: ci_node,
    },
    NodeTemplate {
        slot: Slot::Tooling,
        layer: Layer::Tooling,
        build: lint_node,
    },
];

/// Layer-adjacency policy. Each rule connects the first instantiated node
/// of its source slot to the first of its target slot; a rule whose
/// endpoint slot has no node emits nothing, so edges never dangle.
const ADJACENCY: &[(Slot, Slot, &str)] = &[
    (Slot::User, Slot::Presentation, "Uses"),
    (Slot::Presentation, Slot::State, "State Updates"),
    (Slot::Presentation, Slot::Api, "API Calls"),
    (Slot::Api, Slot::Business, "Routes Requests"),
    (Slot::Business, Slot::Orm, "Data Queries"),
    (Slot::Orm, Slot::Database, "Data Access"),
    (Slot::Infrastructure, Slot::Business, "Hosts"),
    (Slot::Infrastructure, Slot::Database, "Hosts"),
    (Slot::Tooling, Slot::Presentation, "Builds & Verifies"),
    (Slot::Tooling, Slot::Business, "Builds & Verifies"),
];

fn user_node(_profile: &RepositoryProfile) -> Option<NodeSpec> {
    // Graph root: present even for an all-false profile.
    Some(NodeSpec {
        label: "End Users".to_string(),
        trigger_flags: Vec::new(),
    })
}

fn presentation_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    let mut trigger_flags = Vec::new();
    if f.next_js {
        trigger_flags.push("next_js");
    }
    if f.react {
        trigger_flags.push("react");
    }
    if f.vue {
        trigger_flags.push("vue");
    }
    if f.angular {
        trigger_flags.push("angular");
    }
    if f.svelte {
        trigger_flags.push("svelte");
    }

    if !trigger_flags.is_empty() {
        return Some(NodeSpec {
            label: format!("{} Application", f.framework()),
            trigger_flags,
        });
    }
    if f.typescript || f.javascript {
        if f.typescript {
            trigger_flags.push("typescript");
        }
        if f.javascript {
            trigger_flags.push("javascript");
        }
        return Some(NodeSpec {
            label: "Web Application".to_string(),
            trigger_flags,
        });
    }
    None
}

fn state_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    if f.redux {
        Some(NodeSpec {
            label: "Redux Store".to_string(),
            trigger_flags: vec!["redux"],
        })
    } else if f.zustand {
        Some(NodeSpec {
            label: "Zustand Store".to_string(),
            trigger_flags: vec!["zustand"],
        })
    } else {
        None
    }
}

fn api_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    if f.graphql {
        Some(NodeSpec {
            label: "GraphQL API".to_string(),
            trigger_flags: vec!["graphql"],
        })
    } else if f.rest_api {
        Some(NodeSpec {
            label: "REST API".to_string(),
            trigger_flags: vec!["rest_api"],
        })
    } else {
        None
    }
}

fn business_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    let (label, flag) = if f.express {
        ("Express Server", "express")
    } else if f.django {
        ("Django Server", "django")
    } else if f.flask {
        ("Flask Server", "flask")
    } else if f.fastapi {
        ("FastAPI Server", "fastapi")
    } else {
        return None;
    };
    Some(NodeSpec {
        label: label.to_string(),
        trigger_flags: vec![flag],
    })
}

fn orm_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    let (label, flag) = if f.prisma {
        ("Prisma ORM", "prisma")
    } else if f.drizzle {
        ("Drizzle ORM", "drizzle")
    } else if f.mongoose {
        ("Mongoose ODM", "mongoose")
    } else {
        return None;
    };
    Some(NodeSpec {
        label: label.to_string(),
        trigger_flags: vec![flag],
    })
}

fn database_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    if !f.database {
        return None;
    }
    if f.supabase {
        Some(NodeSpec {
            label: "Supabase".to_string(),
            trigger_flags: vec!["database", "supabase"],
        })
    } else {
        Some(NodeSpec {
            label: "Database".to_string(),
            trigger_flags: vec!["database"],
        })
    }
}

fn infrastructure_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    if profile.flags.docker {
        Some(NodeSpec {
            label: "Docker Containers".to_string(),
            trigger_flags: vec!["docker"],
        })
    } else {
        None
    }
}

fn build_tool_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    if f.vite {
        Some(NodeSpec {
            label: "Vite Build".to_string(),
            trigger_flags: vec!["vite"],
        })
    } else if f.webpack {
        Some(NodeSpec {
            label: "Webpack Build".to_string(),
            trigger_flags: vec!["webpack"],
        })
    } else {
        None
    }
}

fn testing_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    let (label, flag) = if f.vitest {
        ("Vitest Tests", "vitest")
    } else if f.jest {
        ("Jest Tests", "jest")
    } else if f.cypress {
        ("Cypress E2E Tests", "cypress")
    } else if f.playwright {
        ("Playwright E2E Tests", "playwright")
    } else {
        return None;
    };
    Some(NodeSpec {
        label: label.to_string(),
        trigger_flags: vec![flag],
    })
}

fn ci_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    if profile.flags.ci {
        Some(NodeSpec {
            label: "CI Pipeline".to_string(),
            trigger_flags: vec!["ci"],
        })
    } else {
        None
    }
}

fn lint_node(profile: &RepositoryProfile) -> Option<NodeSpec> {
    let f = &profile.flags;
    if !f.eslint && !f.prettier {
        return None;
    }
    let mut trigger_flags = Vec::new();
    if f.eslint {
        trigger_flags.push("eslint");
    }
    if f.prettier {
        trigger_flags.push("prettier");
    }
    Some(NodeSpec {
        label: "Linting & Formatting".to_string(),
        trigger_flags,
    })
}

/// Map an aggregate profile onto the node catalogue and adjacency policy.
///
/// Deterministic: identical profiles produce identical ids, ordering, and
/// labels. The user-root node is always present; everything else is
/// conditional on its template trigger.
pub fn build_graph(profile: &RepositoryProfile) -> ArchitectureGraph {
    let mut nodes = Vec::new();
    // First instantiated node id per slot, for the adjacency pass.
    let mut first_by_slot: Vec<(Slot, String)> = Vec::new();

    for template in CATALOG {
        if let Some(spec) = (template.build)(profile) {
            let id = format!("n{}", nodes.len());
            if !first_by_slot.iter().any(|(slot, _)| *slot == template.slot) {
                first_by_slot.push((template.slot, id.clone()));
            }
            nodes.push(ArchitectureNode {
                id,
                layer: template.layer,
                label: spec.label,
                trigger_flags: spec.trigger_flags.iter().map(|f| f.to_string()).collect(),
            });
        }
    }

    let mut edges = Vec::new();
    for &(from, to, label) in ADJACENCY {
        // Direct-access fallback: with no ORM node, business talks to the
        // database directly instead of chaining through the missing slot.
        if from == Slot::Business && to == Slot::Orm {
            match (
                first_id(&first_by_slot, Slot::Business),
                first_id(&first_by_slot, Slot::Orm),
            ) {
                (Some(business), Some(orm)) => edges.push(ArchitectureEdge {
                    from: business.to_string(),
                    to: orm.to_string(),
                    label: label.to_string(),
                }),
                (Some(business), None) => {
                    if let Some(database) = first_id(&first_by_slot, Slot::Database) {
                        edges.push(ArchitectureEdge {
                            from: business.to_string(),
                            to: database.to_string(),
                            label: label.to_string(),
                        });
                    }
                }
                _ => {}
            }
            continue;
        }

        if let (Some(from_id), Some(to_id)) = (
            first_id(&first_by_slot, from),
            first_id(&first_by_slot, to),
        ) {
            edges.push(ArchitectureEdge {
                from: from_id.to_string(),
                to: to_id.to_string(),
                label: label.to_string(),
            });
        }
    }

    ArchitectureGraph { nodes, edges }
}

fn first_id(first_by_slot: &[(Slot, String)], slot: Slot) -> Option<&str> {
    first_by_slot
        .iter()
        .find(|(s, _)| *s == slot)
        .map(|(_, id)| id.as_str())
}
