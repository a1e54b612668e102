//! Shading network description
//!
//! Describes, as plain data, the node graph a host application builds for an
//! [`Assignment`]: one `aiStandardSurface` shader (`<material>_shader`), one shared
//! `place2dTexture`, one `file` texture node per assigned channel, and the
//! helper utilities some channels need (`remapValue`, `aiNormalMap`,
//! `displacementShader`).
//!
//! Nothing here talks to a host. Host-specific code walks `nodes` to create
//! them and `connections` to wire them.

use crate::models::assignment::Assignment;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use texassign_common::Channel;

/// Tiling mode set on every file node (UDIM)
pub const UV_TILING_MODE: i64 = 3;

const PLACE_2D: &str = "place2dTexture";
const REMAP_VALUE: &str = "remapValue";
const NORMAL_MAP: &str = "aiNormalMap";
const DISPLACEMENT_SHADER: &str = "displacementShader";

/// Appended to the material name to name the shader node. Fixed node names
/// and channel labels never contain `_`, so the shader name cannot clash.
const SHADER_SUFFIX: &str = "_shader";

/// How the host should create a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Shader,
    Texture,
    Utility,
}

/// Attribute value set on a node at creation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// One node to create
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadingNode {
    pub name: String,
    pub node_type: String,
    pub role: NodeRole,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ShadingNode {
    fn new(name: &str, node_type: &str, role: NodeRole) -> Self {
        Self {
            name: name.to_string(),
            node_type: node_type.to_string(),
            role,
            attributes: BTreeMap::new(),
        }
    }

    fn with_attribute(mut self, key: &str, value: AttributeValue) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }
}

/// `node.attribute`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plug {
    pub node: String,
    pub attribute: String,
}

impl Plug {
    pub fn new(node: &str, attribute: &str) -> Self {
        Self {
            node: node.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl fmt::Display for Plug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.attribute)
    }
}

impl Serialize for Plug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Directed link between two plugs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from: Plug,
    pub to: Plug,
}

/// Node graph for one material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadingNetwork {
    pub material: String,
    /// Name of the surface shader node
    pub shader: String,
    /// Name of the displacement node, attached by the host to the shading
    /// group rather than to the shader
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement: Option<String>,
    pub nodes: Vec<ShadingNode>,
    pub connections: Vec<Connection>,
}

impl ShadingNetwork {
    /// Describe the network wiring every channel of `assignment`
    pub fn from_assignment(material: &str, assignment: &Assignment) -> Self {
        let shader = format!("{}{}", material, SHADER_SUFFIX);
        let mut network = Self {
            material: material.to_string(),
            nodes: vec![
                ShadingNode::new(PLACE_2D, "place2dTexture", NodeRole::Utility),
                ShadingNode::new(&shader, "aiStandardSurface", NodeRole::Shader),
            ],
            shader,
            displacement: None,
            connections: Vec::new(),
        };

        for (channel, path) in assignment {
            let file = channel.label();
            network.nodes.push(
                ShadingNode::new(file, "file", NodeRole::Texture)
                    .with_attribute(
                        "fileTextureName",
                        AttributeValue::Text(path.to_string_lossy().into_owned()),
                    )
                    .with_attribute("uvTilingMode", AttributeValue::Int(UV_TILING_MODE)),
            );
            network.connect((PLACE_2D, "outUV"), (file, "uvCoord"));
            network.wire_channel(*channel, file);
        }

        tracing::debug!(
            material = %material,
            nodes = network.nodes.len(),
            connections = network.connections.len(),
            "Built shading network"
        );

        network
    }

    /// Node by name
    pub fn node(&self, name: &str) -> Option<&ShadingNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Whether `from → to` is part of the network (plugs as `node.attribute`)
    pub fn is_connected(&self, from: &str, to: &str) -> bool {
        self.connections
            .iter()
            .any(|c| c.from.to_string() == from && c.to.to_string() == to)
    }

    fn wire_channel(&mut self, channel: Channel, file: &str) {
        let shader = self.shader.clone();
        match channel {
            Channel::BaseColor => {
                self.connect((file, "outColor"), (&shader, "baseColor"));
            }
            Channel::Roughness => {
                self.add_utility(REMAP_VALUE, "remapValue");
                self.connect((file, "outColorR"), (REMAP_VALUE, "inputValue"));
                self.connect((REMAP_VALUE, "outValue"), (&shader, "specularRoughness"));
            }
            Channel::Metalness => {
                self.connect((file, "outColorR"), (&shader, "metalness"));
            }
            Channel::Normal => {
                self.add_utility(NORMAL_MAP, "aiNormalMap");
                self.connect((file, "outColor"), (NORMAL_MAP, "input"));
                self.connect((NORMAL_MAP, "outValue"), (&shader, "normalCamera"));
            }
            Channel::Displacement => {
                self.add_utility(DISPLACEMENT_SHADER, "displacementShader");
                self.connect((file, "outColorR"), (DISPLACEMENT_SHADER, "displacement"));
                self.displacement = Some(DISPLACEMENT_SHADER.to_string());
            }
            Channel::Emissive => {
                self.set_shader_attribute("emission", AttributeValue::Float(1.0));
                self.connect((file, "outColor"), (&shader, "emissionColor"));
            }
            Channel::Subsurface => {
                self.set_shader_attribute("subsurface", AttributeValue::Float(1.0));
                self.connect((file, "outColor"), (&shader, "subsurfaceColor"));
            }
            Channel::Opacity => {
                self.connect((file, "outColor"), (&shader, "opacity"));
            }
            Channel::Translucency => {
                self.connect((file, "outColor"), (&shader, "transmissionColor"));
            }
        }
    }

    fn add_utility(&mut self, name: &str, node_type: &str) {
        if self.node(name).is_none() {
            self.nodes
                .push(ShadingNode::new(name, node_type, NodeRole::Utility));
        }
    }

    fn set_shader_attribute(&mut self, key: &str, value: AttributeValue) {
        let shader = self.shader.clone();
        if let Some(node) = self.nodes.iter_mut().find(|n| n.name == shader) {
            node.attributes.insert(key.to_string(), value);
        }
    }

    fn connect(&mut self, from: (&str, &str), to: (&str, &str)) {
        self.connections.push(Connection {
            from: Plug::new(from.0, from.1),
            to: Plug::new(to.0, to.1),
        });
    }
}
