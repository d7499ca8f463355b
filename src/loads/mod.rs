//! Load types, load cases and load combinations

mod distributed;
mod load_case;
mod load_combo;
mod node_load;
mod point_load;

use serde::{Deserialize, Serialize};

pub use distributed::DistributedLoad;
pub use load_case::LoadCase;
pub use load_combo::LoadCombination;
pub use node_load::NodeLoad;
pub use point_load::{LoadDirection, PointLoad};

/// Any load the model can carry, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Load {
    /// Force/moment at a node, global axes
    Nodal(NodeLoad),
    /// Line load along an element
    Distributed(DistributedLoad),
    /// Concentrated load on an element
    ElementPoint(PointLoad),
}

impl Load {
    /// Name of the owning load case
    pub fn case(&self) -> &str {
        match self {
            Load::Nodal(l) => &l.case,
            Load::Distributed(l) => &l.case,
            Load::ElementPoint(l) => &l.case,
        }
    }

    /// Name of the loaded element, if this is an element load
    pub fn element(&self) -> Option<&str> {
        match self {
            Load::Nodal(_) => None,
            Load::Distributed(l) => Some(&l.element),
            Load::ElementPoint(l) => Some(&l.element),
        }
    }
}

impl From<NodeLoad> for Load {
    fn from(load: NodeLoad) -> Self {
        Load::Nodal(load)
    }
}

impl From<DistributedLoad> for Load {
    fn from(load: DistributedLoad) -> Self {
        Load::Distributed(load)
    }
}

impl From<PointLoad> for Load {
    fn from(load: PointLoad) -> Self {
        Load::ElementPoint(load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let load: Load = PointLoad::downward("M1", 3.0, 10.0, "Live").into();
        let json = serde_json::to_value(&load).unwrap();
        assert_eq!(json["kind"], "element_point");
        assert_eq!(json["direction"], "global-y");

        let back: Load = serde_json::from_value(json).unwrap();
        assert_eq!(back, load);
        assert_eq!(back.case(), "Live");
        assert_eq!(back.element(), Some("M1"));
    }

    #[test]
    fn test_nodal_load_from_json() {
        let load: Load =
            serde_json::from_str(r#"{"kind":"nodal","node":"N2","fy":-10.0,"case":"Dead"}"#).unwrap();
        match load {
            Load::Nodal(l) => assert_eq!(l.as_array(), [0.0, -10.0, 0.0]),
            other => panic!("unexpected load {:?}", other),
        }
    }
}
