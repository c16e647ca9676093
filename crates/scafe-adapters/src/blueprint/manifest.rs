//! JSON root files: `package.json` and `.prettierrc`.

use std::collections::BTreeMap;

use serde::Serialize;

use scafe_core::{
    domain::{GATEWAY_SERVICE, ProjectOptions},
    error::{ScafeError, ScafeResult},
};

const DEFAULT_DESCRIPTION: &str = "A microservice project";

/// The generated `package.json`.
///
/// Dependencies are left out; the package manager records them on install.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageJson {
    pub name: String,
    pub version: String,
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repository: String,
    pub private: bool,
    #[serde(rename = "type")]
    pub module_type: String,
    pub main: String,
    pub scripts: BTreeMap<String, String>,
}

impl PackageJson {
    pub fn from_options(options: &ProjectOptions) -> Self {
        let info = options.manifest();
        let entry = format!("{GATEWAY_SERVICE}/index.js");
        let scripts = BTreeMap::from([
            ("dev".to_string(), format!("nodemon {entry}")),
            ("start".to_string(), format!("node {entry}")),
            ("format".to_string(), "prettier --write .".to_string()),
        ]);

        Self {
            name: options.name().to_string(),
            version: "1.0.0".into(),
            description: if info.description.is_empty() {
                DEFAULT_DESCRIPTION.into()
            } else {
                info.description.clone()
            },
            keywords: info.keywords.clone(),
            author: info.author.clone(),
            repository: info.repository.clone(),
            private: true,
            module_type: "module".into(),
            main: entry,
            scripts,
        }
    }

    pub fn render(&self) -> ScafeResult<String> {
        to_json(self)
    }
}

/// Formatter settings written to `.prettierrc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrettierConfig {
    pub semi: bool,
    pub single_quote: bool,
    pub trailing_comma: String,
    pub print_width: u32,
    pub tab_width: u32,
}

impl Default for PrettierConfig {
    fn default() -> Self {
        Self {
            semi: true,
            single_quote: false,
            trailing_comma: "all".into(),
            print_width: 100,
            tab_width: 2,
        }
    }
}

impl PrettierConfig {
    pub fn render(&self) -> ScafeResult<String> {
        to_json(self)
    }
}

fn to_json<T: Serialize>(value: &T) -> ScafeResult<String> {
    serde_json::to_string_pretty(value)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| ScafeError::Internal {
            message: format!("could not serialize JSON: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use scafe_core::domain::{ManifestInfo, PackageName};

    use super::*;

    #[test]
    fn manifest_carries_answers_and_scripts() {
        let options = ProjectOptions::builder(PackageName::new("shop").unwrap())
            .manifest(ManifestInfo {
                description: "Online shop".into(),
                keywords: vec!["microservices".into()],
                author: "Ada".into(),
                repository: String::new(),
            })
            .build()
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&PackageJson::from_options(&options).render().unwrap()).unwrap();

        assert_eq!(json["name"], "shop");
        assert_eq!(json["description"], "Online shop");
        assert_eq!(json["type"], "module");
        assert_eq!(json["private"], true);
        assert_eq!(json["scripts"]["dev"], "nodemon gateway/index.js");
        assert!(json.get("repository").is_none());
    }

    #[test]
    fn prettier_defaults() {
        let json: serde_json::Value =
            serde_json::from_str(&PrettierConfig::default().render().unwrap()).unwrap();
        assert_eq!(json["semi"], true);
        assert_eq!(json["singleQuote"], false);
        assert_eq!(json["trailingComma"], "all");
        assert_eq!(json["printWidth"], 100);
        assert_eq!(json["tabWidth"], 2);
    }
}
