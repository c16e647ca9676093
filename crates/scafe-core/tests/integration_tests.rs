//! Integration tests for scafe-core's public API.

use std::path::Path;

use scafe_core::{
    domain::{DomainError, GATEWAY_SERVICE, RelativePath},
    prelude::*,
};

fn service(name: &str) -> ServiceSpec {
    ServiceSpec::new(ServiceName::new(name).unwrap())
        .with_folder("config")
        .unwrap()
        .with_folder("utils")
        .unwrap()
        .with_file("config/app.js", "export default {};")
        .unwrap()
}

#[test]
fn options_flow_into_a_valid_plan() {
    let options = ProjectOptions::builder(PackageName::new("shop").unwrap())
        .service(ServiceName::new("auth").unwrap())
        .mail(true)
        .build()
        .unwrap();

    assert!(options.redis());
    let mut builder = ScaffoldPlan::builder("/tmp/shop");
    for name in options.services() {
        builder = builder.service(service(name.as_str()));
    }
    let plan = builder.build().unwrap();

    assert_eq!(plan.services().len(), 2);
    assert!(plan.service(GATEWAY_SERVICE).is_some());
    assert_eq!(plan.root(), Path::new("/tmp/shop"));
    assert_eq!(plan.entry_count(), 2 * (1 + 2 + 1));
}

#[test]
fn plan_without_services_is_rejected() {
    let err = ScaffoldPlan::builder("/tmp/empty").build().unwrap_err();
    assert_eq!(err, DomainError::EmptyPlan);
}

#[test]
fn escaping_paths_never_reach_a_plan() {
    assert!(FileSpec::at("../outside.js", "").is_err());
    assert!(FileSpec::at("/etc/passwd", "").is_err());
    assert!(RelativePath::try_new("utils/mail").is_ok());
}

#[test]
fn dependency_groups_stay_disjoint() {
    let express = PackageName::new("express").unwrap();
    let deps = DependencySet::new()
        .with(express.clone(), DependencyGroup::Development)
        .with(express.clone(), DependencyGroup::Runtime);

    assert_eq!(deps.group_of(&express), Some(DependencyGroup::Runtime));
    assert_eq!(deps.len(), 1);
}

#[test]
fn errors_carry_suggestions() {
    let err: ScafeError = DomainError::DuplicateService {
        name: "auth".into(),
    }
    .into();
    assert!(!err.suggestions().is_empty());
}
