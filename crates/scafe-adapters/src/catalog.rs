//! Known packages and what they are for.

use serde::Serialize;

use scafe_core::domain::DependencyGroup;

use crate::blueprint::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub group: DependencyGroup,
    /// Why the package is pulled in by default.
    #[serde(serialize_with = "serialize_feature")]
    pub feature: Feature,
}

const fn entry(
    name: &'static str,
    description: &'static str,
    group: DependencyGroup,
    feature: Feature,
) -> CatalogEntry {
    CatalogEntry {
        name,
        description,
        group,
        feature,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    entry("express", "Express (web server)", DependencyGroup::Runtime, Feature::Always),
    entry("cors", "CORS (cross-origin resource sharing)", DependencyGroup::Runtime, Feature::Always),
    entry("dotenv", "Dotenv (env config)", DependencyGroup::Runtime, Feature::Always),
    entry("winston", "Winston (logging)", DependencyGroup::Runtime, Feature::Always),
    entry("jsonwebtoken", "JWT (auth tokens)", DependencyGroup::Runtime, Feature::Always),
    entry("qrcode", "QR Code generator", DependencyGroup::Runtime, Feature::Always),
    entry("bcrypt", "Bcrypt (password hashing)", DependencyGroup::Runtime, Feature::Always),
    entry("status-map", "HTTP status code map", DependencyGroup::Runtime, Feature::Always),
    entry("ioredis", "ioredis (Redis client)", DependencyGroup::Runtime, Feature::Redis),
    entry("bullmq", "BullMQ (queues)", DependencyGroup::Runtime, Feature::Mail),
    entry("nodemailer", "Nodemailer (email)", DependencyGroup::Runtime, Feature::Mail),
    entry("nodemon", "Nodemon (dev auto-restart)", DependencyGroup::Development, Feature::Always),
    entry("prettier", "Prettier (code formatter)", DependencyGroup::Development, Feature::Always),
];

pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.name == name)
}

/// Entries only pulled in by an opt-in feature; offered as extras.
pub fn optional() -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter().filter(|e| e.feature != Feature::Always)
}

pub fn feature_label(feature: Feature) -> &'static str {
    match feature {
        Feature::Always => "core",
        Feature::Redis => "redis",
        Feature::MultiDb => "multi-db",
        Feature::Mail => "mail",
    }
}

fn serialize_feature<S: serde::Serializer>(feature: &Feature, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(feature_label(*feature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{CORE_RUNTIME, DEVELOPMENT, MAIL_RUNTIME, REDIS_RUNTIME};

    #[test]
    fn every_default_package_is_catalogued() {
        for name in CORE_RUNTIME
            .iter()
            .chain(&REDIS_RUNTIME)
            .chain(&MAIL_RUNTIME)
            .chain(&DEVELOPMENT)
        {
            assert!(find(name).is_some(), "{name} missing from catalog");
        }
    }

    #[test]
    fn optional_entries_are_feature_gated() {
        let names: Vec<_> = optional().map(|e| e.name).collect();
        assert_eq!(names, ["ioredis", "bullmq", "nodemailer"]);
    }

    #[test]
    fn groups_match_blueprint() {
        assert_eq!(find("nodemon").unwrap().group, DependencyGroup::Development);
        assert_eq!(find("express").unwrap().group, DependencyGroup::Runtime);
    }
}
