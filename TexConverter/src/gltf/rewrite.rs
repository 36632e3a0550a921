//! Image URI remapping and spec-gloss material migration
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use super::document::GltfDocument;
use crate::texture::{classify, ConversionMode, OutputKind, TextureRole};
use crate::utils::path::{file_stem, normalize_path, uri_file_name};

/// Material extension migrated to core metallic-roughness
pub const SPEC_GLOSS_EXTENSION: &str = "KHR_materials_pbrSpecularGlossiness";

/// Texture slots checked on standard materials, on the material and on its
/// `pbrMetallicRoughness` block
const STANDARD_TEXTURE_SLOTS: [&str; 5] = [
    "baseColorTexture",
    "metallicRoughnessTexture",
    "normalTexture",
    "occlusionTexture",
    "emissiveTexture",
];

/// What a rewrite changed in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GltfChanges {
    /// Indices of images whose URI was rewritten
    pub images_updated: Vec<usize>,
    /// Indices of materials migrated off the spec-gloss extension
    pub materials_migrated: Vec<usize>,
    /// Indices of standard materials that reference a rewritten image
    pub materials_referencing: Vec<usize>,
    /// Whether the spec-gloss extension was removed from any material
    pub extension_removed: bool,
}

impl GltfChanges {
    /// Whether the document needs saving
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.images_updated.is_empty()
            || !self.materials_migrated.is_empty()
            || !self.materials_referencing.is_empty()
    }
}

/// New URI for an image converted into `output_folder_name`.
///
/// Returns `None` for data URIs and for images the Tarkin conversion does not
/// produce a replacement for.
#[must_use]
pub fn remapped_uri(uri: &str, output_folder_name: &str) -> Option<String> {
    if uri.is_empty() || uri.starts_with("data:") {
        return None;
    }

    let normalized = normalize_path(uri);
    let file_name = uri_file_name(&normalized);
    let kind = match classify(file_name, ConversionMode::Tarkin)? {
        TextureRole::Diffuse => OutputKind::Color,
        TextureRole::SpecGlos => OutputKind::Roughness,
        TextureRole::Normal => OutputKind::Converted,
        TextureRole::Gloss => return None,
    };

    Some(format!(
        "{output_folder_name}/{}",
        kind.output_filename(file_stem(file_name))
    ))
}

/// Texture to image resolution against the set of rewritten images
struct TextureLookup {
    sources: Vec<Option<usize>>,
    remapped: BTreeSet<usize>,
}

impl TextureLookup {
    fn new(root: &Map<String, Value>, remapped: BTreeSet<usize>) -> Self {
        let sources = root
            .get("textures")
            .and_then(Value::as_array)
            .map(|textures| {
                textures
                    .iter()
                    .map(|texture| as_index(texture.get("source")))
                    .collect()
            })
            .unwrap_or_default();
        Self { sources, remapped }
    }

    /// Whether a texture-info object points at a rewritten image
    fn is_remapped(&self, texture_info: Option<&Value>) -> bool {
        as_index(texture_info.and_then(|info| info.get("index")))
            .and_then(|index| self.sources.get(index).copied().flatten())
            .is_some_and(|source| self.remapped.contains(&source))
    }
}

fn as_index(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
}

/// Point images at the converted textures and migrate spec-gloss materials.
///
/// Works on the in-memory tree only; see [`super::rewrite_gltf_file`] for
/// the load-and-save wrapper.
pub fn rewrite_document(document: &mut GltfDocument, output_folder_name: &str) -> GltfChanges {
    let mut changes = GltfChanges::default();
    let Some(root) = document.root.as_object_mut() else {
        return changes;
    };

    if let Some(images) = root.get_mut("images").and_then(Value::as_array_mut) {
        for (index, image) in images.iter_mut().enumerate() {
            let Some(current) = image.get("uri").and_then(Value::as_str) else {
                continue;
            };
            let Some(new_uri) = remapped_uri(current, output_folder_name) else {
                continue;
            };
            if current == new_uri {
                continue;
            }

            tracing::info!("Image [{index}]: {current} -> {new_uri}");
            image["uri"] = Value::String(new_uri);
            changes.images_updated.push(index);
        }
    }

    let lookup = TextureLookup::new(root, changes.images_updated.iter().copied().collect());

    if let Some(materials) = root.get_mut("materials").and_then(Value::as_array_mut) {
        for (index, material) in materials.iter_mut().enumerate() {
            let Some(material) = material.as_object_mut() else {
                continue;
            };

            // An empty extension block counts as absent
            let spec_gloss = material
                .get("extensions")
                .and_then(|extensions| extensions.get(SPEC_GLOSS_EXTENSION))
                .filter(|value| value.as_object().is_some_and(|block| !block.is_empty()));

            if let Some(spec_gloss) = spec_gloss {
                let needs_migration = lookup.is_remapped(spec_gloss.get("diffuseTexture"))
                    || lookup.is_remapped(spec_gloss.get("specularGlossinessTexture"))
                    || lookup.is_remapped(material.get("normalTexture"));

                if needs_migration {
                    migrate_material(material);
                    changes.materials_migrated.push(index);
                    changes.extension_removed = true;
                    tracing::info!(
                        "Material '{}' [{index}]: converted to metallic-roughness",
                        material_name(material, index)
                    );
                }
            } else if references_remapped_slot(material, &lookup) {
                changes.materials_referencing.push(index);
            }
        }
    }

    if changes.extension_removed {
        remove_extension_name(root, "extensionsUsed");
        remove_extension_name(root, "extensionsRequired");
    }

    changes
}

/// Move the spec-gloss texture slots into `pbrMetallicRoughness` and drop the
/// extension block
fn migrate_material(material: &mut Map<String, Value>) {
    let Some(extensions) = material.get_mut("extensions").and_then(Value::as_object_mut) else {
        return;
    };
    let Some(spec_gloss) = extensions.shift_remove(SPEC_GLOSS_EXTENSION) else {
        return;
    };
    if extensions.is_empty() {
        material.shift_remove("extensions");
    }

    let pbr = material
        .entry("pbrMetallicRoughness")
        .or_insert_with(|| Value::Object(Map::new()));
    if !pbr.is_object() {
        *pbr = Value::Object(Map::new());
    }
    let Some(pbr) = pbr.as_object_mut() else {
        return;
    };

    if let Some(texture) = spec_gloss.get("diffuseTexture") {
        pbr.insert("baseColorTexture".to_string(), texture.clone());
    }
    if let Some(factor) = spec_gloss.get("diffuseFactor") {
        pbr.insert("baseColorFactor".to_string(), factor.clone());
    }
    if let Some(texture) = spec_gloss.get("specularGlossinessTexture") {
        pbr.insert("metallicRoughnessTexture".to_string(), texture.clone());
        pbr.entry("metallicFactor").or_insert(json!(0.0));
        pbr.entry("roughnessFactor").or_insert(json!(1.0));
    }
}

fn references_remapped_slot(material: &Map<String, Value>, lookup: &TextureLookup) -> bool {
    let pbr = material.get("pbrMetallicRoughness");

    STANDARD_TEXTURE_SLOTS.iter().any(|slot| {
        [material.get(*slot), pbr.and_then(|pbr| pbr.get(*slot))]
            .into_iter()
            .flatten()
            .any(|info| info.is_object() && lookup.is_remapped(Some(info)))
    })
}

/// Remove the spec-gloss name from a top-level extension list, keeping the
/// rest in order. An emptied list is removed.
fn remove_extension_name(root: &mut Map<String, Value>, key: &str) {
    let Some(list) = root.get_mut(key).and_then(Value::as_array_mut) else {
        return;
    };

    list.retain(|name| name.as_str() != Some(SPEC_GLOSS_EXTENSION));
    if list.is_empty() {
        root.shift_remove(key);
    }
}

fn material_name(material: &Map<String, Value>, index: usize) -> String {
    material
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| format!("Material_{index}"), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document(root: Value) -> GltfDocument {
        GltfDocument { path: "scene.gltf".into(), root }
    }

    fn spec_gloss_scene() -> Value {
        json!({
            "asset": { "version": "2.0" },
            "extensionsUsed": ["KHR_texture_transform", SPEC_GLOSS_EXTENSION, "KHR_lights_punctual"],
            "extensionsRequired": [SPEC_GLOSS_EXTENSION],
            "images": [
                { "uri": "textures\\helmet_d.png" },
                { "uri": "helmet_sg.tga" },
                { "uri": "helmet_n.png" },
                { "uri": "data:image/png;base64,AAAA" }
            ],
            "textures": [
                { "source": 0 },
                { "source": 1 },
                { "source": 2 }
            ],
            "materials": [
                {
                    "name": "Helmet",
                    "normalTexture": { "index": 2 },
                    "extensions": {
                        SPEC_GLOSS_EXTENSION: {
                            "diffuseTexture": { "index": 0 },
                            "diffuseFactor": [1.0, 0.5, 0.5, 1.0],
                            "specularGlossinessTexture": { "index": 1 }
                        }
                    }
                }
            ]
        })
    }

    #[test]
    fn test_remapped_uri() {
        let out = "converted_textures";
        assert_eq!(
            remapped_uri("helmet_d.png", out).as_deref(),
            Some("converted_textures/helmet_d_color.png")
        );
        assert_eq!(
            remapped_uri("maps\\visor_sg.tga", out).as_deref(),
            Some("converted_textures/visor_sg_roughness.png")
        );
        assert_eq!(
            remapped_uri("../helmet_nrm.jpg", out).as_deref(),
            Some("converted_textures/helmet_nrm_converted.png")
        );
        assert_eq!(remapped_uri("visor_g.png", out), None);
        assert_eq!(remapped_uri("reference.png", out), None);
        assert_eq!(remapped_uri("data:image/png;base64,AAAA", out), None);
        assert_eq!(remapped_uri("", out), None);
    }

    #[test]
    fn test_migrates_spec_gloss_material() {
        let mut doc = document(spec_gloss_scene());
        let changes = rewrite_document(&mut doc, "converted_textures");

        assert_eq!(changes.images_updated, vec![0, 1, 2]);
        assert_eq!(changes.materials_migrated, vec![0]);
        assert!(changes.extension_removed);

        assert_eq!(
            doc.root["images"],
            json!([
                { "uri": "converted_textures/helmet_d_color.png" },
                { "uri": "converted_textures/helmet_sg_roughness.png" },
                { "uri": "converted_textures/helmet_n_converted.png" },
                { "uri": "data:image/png;base64,AAAA" }
            ])
        );
        assert_eq!(
            doc.root["materials"][0],
            json!({
                "name": "Helmet",
                "normalTexture": { "index": 2 },
                "pbrMetallicRoughness": {
                    "baseColorTexture": { "index": 0 },
                    "baseColorFactor": [1.0, 0.5, 0.5, 1.0],
                    "metallicRoughnessTexture": { "index": 1 },
                    "metallicFactor": 0.0,
                    "roughnessFactor": 1.0
                }
            })
        );
        assert_eq!(
            doc.root["extensionsUsed"],
            json!(["KHR_texture_transform", "KHR_lights_punctual"])
        );
        assert!(doc.root.get("extensionsRequired").is_none());
    }

    #[test]
    fn test_existing_factors_and_other_extensions_are_kept() {
        let mut doc = document(json!({
            "images": [{ "uri": "crate_sg.png" }],
            "textures": [{ "source": 0 }],
            "materials": [{
                "pbrMetallicRoughness": { "metallicFactor": 0.25 },
                "extensions": {
                    "KHR_materials_emissive_strength": { "emissiveStrength": 2.0 },
                    SPEC_GLOSS_EXTENSION: { "specularGlossinessTexture": { "index": 0 } }
                }
            }]
        }));

        rewrite_document(&mut doc, "out");

        assert_eq!(
            doc.root["materials"][0],
            json!({
                "pbrMetallicRoughness": {
                    "metallicFactor": 0.25,
                    "metallicRoughnessTexture": { "index": 0 },
                    "roughnessFactor": 1.0
                },
                "extensions": {
                    "KHR_materials_emissive_strength": { "emissiveStrength": 2.0 }
                }
            })
        );
    }

    #[test]
    fn test_standard_material_marks_change_without_rewrite() {
        let material = json!({
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } }
        });
        let mut doc = document(json!({
            "images": [{ "uri": "crate_d.png" }],
            "textures": [{ "source": 0 }],
            "materials": [material.clone()]
        }));

        let changes = rewrite_document(&mut doc, "out");

        assert_eq!(changes.materials_referencing, vec![0]);
        assert!(!changes.extension_removed);
        assert_eq!(doc.root["materials"][0], material);
    }

    #[test]
    fn test_empty_spec_gloss_block_uses_standard_slots() {
        let mut doc = document(json!({
            "images": [{ "uri": "crate_d.png" }],
            "textures": [{ "source": 0 }],
            "materials": [{
                "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
                "extensions": { SPEC_GLOSS_EXTENSION: {} }
            }]
        }));

        let changes = rewrite_document(&mut doc, "out");

        assert_eq!(changes.materials_referencing, vec![0]);
        assert!(changes.materials_migrated.is_empty());
        assert!(!changes.extension_removed);
    }

    #[test]
    fn test_unreferenced_spec_gloss_material_is_left_alone() {
        let mut doc = document(json!({
            "extensionsUsed": [SPEC_GLOSS_EXTENSION],
            "images": [{ "uri": "visor_g.png" }],
            "textures": [{ "source": 0 }],
            "materials": [{
                "extensions": {
                    SPEC_GLOSS_EXTENSION: { "diffuseTexture": { "index": 0 } }
                }
            }]
        }));
        let before = doc.root.clone();

        let changes = rewrite_document(&mut doc, "out");

        assert!(!changes.is_changed());
        assert_eq!(doc.root, before);
    }

    #[test]
    fn test_previously_rewritten_uri_maps_again() {
        let mut doc = document(json!({
            "images": [{ "uri": "out/helmet_n_converted.png" }]
        }));

        // The converted name still ends in a normal token
        let changes = rewrite_document(&mut doc, "out_1");

        assert_eq!(changes.images_updated, vec![0]);
        assert_eq!(doc.root["images"][0]["uri"], "out_1/helmet_n_converted_converted.png");
    }

    #[test]
    fn test_out_of_range_texture_index_is_ignored() {
        let mut doc = document(json!({
            "images": [{ "uri": "crate_d.png" }],
            "textures": [{ "source": 0 }],
            "materials": [{ "normalTexture": { "index": 7 } }]
        }));

        let changes = rewrite_document(&mut doc, "out");

        assert_eq!(changes.images_updated, vec![0]);
        assert!(changes.materials_referencing.is_empty());
    }
}
