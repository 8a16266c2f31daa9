use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::VariantNames;

use crate::FetchError;

/// Category of a model artifact. Each category maps to one fixed
/// directory under the models root.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
    strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelType {
    Checkpoints,
    Controlnet,
    Loras,
    UpscaleModels,
    Unet,
    Vae,
}

impl ModelType {
    /// Directory name for this category, relative to the models root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Checkpoints => "checkpoints",
            Self::Controlnet => "controlnet",
            Self::Loras => "loras",
            Self::UpscaleModels => "upscale_models",
            Self::Unet => "unet",
            Self::Vae => "vae",
        }
    }

    /// Full directory for this category under `models_root`
    pub fn directory(&self, models_root: &Path) -> PathBuf {
        models_root.join(self.dir_name())
    }

    pub fn all() -> impl Iterator<Item = ModelType> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    /// Every accepted spelling, in declaration order.
    pub fn names() -> &'static [&'static str] {
        Self::VARIANTS
    }

    /// Parse a category label, reporting the valid set on failure.
    pub fn parse(label: &str) -> Result<Self, FetchError> {
        Self::from_str(label).map_err(|_| FetchError::InvalidModelType {
            given: label.to_string(),
            expected: Self::names(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_directory_mapping() {
        let root = Path::new("/workspace/ComfyUI/models");
        let test_cases = vec![
            (ModelType::Checkpoints, "/workspace/ComfyUI/models/checkpoints"),
            (ModelType::Controlnet, "/workspace/ComfyUI/models/controlnet"),
            (ModelType::Loras, "/workspace/ComfyUI/models/loras"),
            (ModelType::UpscaleModels, "/workspace/ComfyUI/models/upscale_models"),
            (ModelType::Unet, "/workspace/ComfyUI/models/unet"),
            (ModelType::Vae, "/workspace/ComfyUI/models/vae"),
        ];

        assert_eq!(test_cases.len(), ModelType::iter().count());
        for (model_type, expected) in test_cases {
            assert_eq!(
                model_type.directory(root),
                PathBuf::from(expected),
                "{} should map to {}",
                model_type,
                expected
            );
        }
    }

    #[test]
    fn test_labels_round_trip_through_parse() {
        for model_type in ModelType::iter() {
            let label = model_type.to_string();
            assert_eq!(label, model_type.dir_name());
            assert_eq!(ModelType::parse(&label).unwrap(), model_type);
        }
    }

    #[test]
    fn test_unknown_label_lists_valid_set() {
        let err = ModelType::parse("not_a_type").unwrap_err();
        match &err {
            FetchError::InvalidModelType { given, expected } => {
                assert_eq!(given, "not_a_type");
                assert_eq!(
                    *expected,
                    &["checkpoints", "controlnet", "loras", "upscale_models", "unet", "vae"]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let message = err.to_string();
        for name in ModelType::names() {
            assert!(message.contains(name), "'{}' missing from: {}", name, message);
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!(ModelType::parse("Loras").is_err());
        assert!(ModelType::parse("upscale-models").is_err());
        assert!(ModelType::parse("").is_err());
    }

    #[test]
    fn test_serde_uses_directory_names() {
        let json = serde_json::to_string(&ModelType::UpscaleModels).unwrap();
        assert_eq!(json, "\"upscale_models\"");
        let parsed: ModelType = serde_json::from_str("\"vae\"").unwrap();
        assert_eq!(parsed, ModelType::Vae);
    }
}
