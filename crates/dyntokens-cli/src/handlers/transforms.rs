//! Transforms command handler

use crate::cli::{OutputFormat, TransformsArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use dyntokens_core::transform::{Transform, TransformKind};
use dyntokens_core::{FormatKind, TransformRegistry};
use serde::Serialize;

/// One registered transform
#[derive(Debug, Serialize)]
struct TransformInfo {
    name: String,
    kind: TransformKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl From<&Transform> for TransformInfo {
    fn from(transform: &Transform) -> Self {
        Self {
            name: transform.name.clone(),
            kind: transform.kind(),
            description: transform.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupInfo {
    name: String,
    transforms: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FormatInfo {
    name: &'static str,
    description: &'static str,
}

/// Everything the registry knows, in registration order
#[derive(Debug, Serialize)]
struct Listing {
    transforms: Vec<TransformInfo>,
    groups: Vec<GroupInfo>,
    formats: Vec<FormatInfo>,
}

/// Handle the transforms command
pub fn handle_transforms(args: TransformsArgs, output: &mut OutputWriter) -> Result<()> {
    let registry = TransformRegistry::with_builtins();

    if let Some(group) = &args.group {
        let members: Vec<TransformInfo> = registry
            .resolve_group(group)?
            .into_iter()
            .map(TransformInfo::from)
            .collect();
        if output.format() != OutputFormat::Human {
            return output.data(&members);
        }
        output.section(&format!("Group {}", group))?;
        return output.table(&["Transform", "Kind", "Description"], transform_rows(&members));
    }

    let listing = listing(&registry);
    if output.format() != OutputFormat::Human {
        return output.data(&listing);
    }

    output.section("Transforms")?;
    output.table(&["Name", "Kind", "Description"], transform_rows(&listing.transforms))?;

    output.section("Transform groups")?;
    output.table(
        &["Group", "Transforms"],
        listing
            .groups
            .iter()
            .map(|g| vec![g.name.clone(), g.transforms.join(", ")])
            .collect(),
    )?;

    output.section("Formats")?;
    output.table(
        &["Format", "Description"],
        listing
            .formats
            .iter()
            .map(|f| vec![f.name.to_string(), f.description.to_string()])
            .collect(),
    )
}

fn listing(registry: &TransformRegistry) -> Listing {
    Listing {
        transforms: registry.transforms().map(TransformInfo::from).collect(),
        groups: registry
            .groups()
            .map(|g| GroupInfo {
                name: g.name.clone(),
                transforms: g.transforms.clone(),
            })
            .collect(),
        formats: FormatKind::ALL
            .iter()
            .map(|f| FormatInfo {
                name: f.name(),
                description: f.description(),
            })
            .collect(),
    }
}

fn transform_rows(transforms: &[TransformInfo]) -> Vec<Vec<String>> {
    transforms
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                t.kind.to_string(),
                t.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}
