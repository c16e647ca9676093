//! Embedded file templates.
//!
//! Bodies are opaque text compiled into the binary with `include_str!`. The
//! only processing is `{{key}}` substitution through [`RenderContext`]; keys
//! without a value are left untouched.

use scafe_core::domain::DatabaseKind;

/// When a service template is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Always,
    Redis,
    MultiDb,
    Mail,
}

/// A template and the service-relative path it is written to.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTemplate {
    pub path: &'static str,
    pub body: &'static str,
    pub feature: Feature,
}

const fn always(path: &'static str, body: &'static str) -> ServiceTemplate {
    ServiceTemplate {
        path,
        body,
        feature: Feature::Always,
    }
}

const fn when(feature: Feature, path: &'static str, body: &'static str) -> ServiceTemplate {
    ServiceTemplate {
        path,
        body,
        feature,
    }
}

pub const README: &str = include_str!("../../templates/service/README.md");

/// Every service file, in write order. `README.md` is assembled separately.
pub const SERVICE_FILES: &[ServiceTemplate] = &[
    always(
        "prisma.schema",
        include_str!("../../templates/service/prisma.schema"),
    ),
    always("index.js", include_str!("../../templates/service/index.js")),
    always(
        "config/app.js",
        include_str!("../../templates/service/config/app.js"),
    ),
    always(
        "config/env.js",
        include_str!("../../templates/service/config/env.js"),
    ),
    always(
        "utils/time.js",
        include_str!("../../templates/service/utils/time.js"),
    ),
    always(
        "utils/qr.js",
        include_str!("../../templates/service/utils/qr.js"),
    ),
    always(
        "utils/handler.js",
        include_str!("../../templates/service/utils/handler.js"),
    ),
    always(
        "utils/jwt.js",
        include_str!("../../templates/service/utils/jwt.js"),
    ),
    always(
        "utils/logger.js",
        include_str!("../../templates/service/utils/logger.js"),
    ),
    always(
        "utils/crypto.js",
        include_str!("../../templates/service/utils/crypto.js"),
    ),
    always(
        "utils/cookieOptions.js",
        include_str!("../../templates/service/utils/cookieOptions.js"),
    ),
    always(
        "utils/codes.js",
        include_str!("../../templates/service/utils/codes.js"),
    ),
    always(
        "utils/asyncHandler.js",
        include_str!("../../templates/service/utils/asyncHandler.js"),
    ),
    when(
        Feature::Redis,
        "config/redis.js",
        include_str!("../../templates/service/config/redis.js"),
    ),
    when(
        Feature::Redis,
        "utils/cache.js",
        include_str!("../../templates/service/utils/cache.js"),
    ),
    when(
        Feature::Redis,
        "utils/redisKeyGen.js",
        include_str!("../../templates/service/utils/redisKeyGen.js"),
    ),
    when(
        Feature::MultiDb,
        "config/dbs.js",
        include_str!("../../templates/service/config/dbs.js"),
    ),
    when(
        Feature::Mail,
        "utils/mail/mailTemplates.js",
        include_str!("../../templates/service/mail/mailTemplates.js"),
    ),
    when(
        Feature::Mail,
        "utils/mail/mailer.js",
        include_str!("../../templates/service/mail/mailer.js"),
    ),
    when(
        Feature::Mail,
        "utils/mail/queue.js",
        include_str!("../../templates/service/mail/queue.js"),
    ),
    when(
        Feature::Mail,
        "utils/mail/worker.js",
        include_str!("../../templates/service/mail/worker.js"),
    ),
    when(
        Feature::Mail,
        "utils/mail/mailRepository.js",
        include_str!("../../templates/service/mail/mailRepository.js"),
    ),
];

pub const GITIGNORE: &str = include_str!("../../templates/root/gitignore");
pub const PRETTIER_IGNORE: &str = include_str!("../../templates/root/prettierignore");

/// Values available to `{{key}}` placeholders.
#[derive(Debug, Clone)]
pub struct RenderContext {
    vars: Vec<(&'static str, String)>,
}

impl RenderContext {
    pub fn new(project: &str, service: &str, database: DatabaseKind) -> Self {
        Self {
            vars: vec![
                ("name", service.to_string()),
                ("project", project.to_string()),
                ("database", database.as_str().to_string()),
                ("provider", database.prisma_provider().to_string()),
            ],
        }
    }

    pub fn render(&self, body: &str) -> String {
        self.vars
            .iter()
            .fold(body.to_string(), |acc, (key, value)| {
                acc.replace(&format!("{{{{{key}}}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_keys_only() {
        let ctx = RenderContext::new("shop", "auth", DatabaseKind::Mysql);
        assert_eq!(
            ctx.render("{{name}}@{{project}} uses {{database}} {{unknown}}"),
            "auth@shop uses mysql {{unknown}}"
        );
    }

    #[test]
    fn service_paths_are_unique() {
        let mut paths: Vec<_> = SERVICE_FILES.iter().map(|t| t.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), SERVICE_FILES.len());
    }

    #[test]
    fn prisma_schema_names_the_provider() {
        let schema = SERVICE_FILES
            .iter()
            .find(|t| t.path == "prisma.schema")
            .unwrap();
        let ctx = RenderContext::new("shop", "auth", DatabaseKind::Postgres);
        let out = ctx.render(schema.body);
        assert!(out.contains("provider = \"postgresql\""));
        assert!(out.contains("auth (postgres)"));
    }
}
