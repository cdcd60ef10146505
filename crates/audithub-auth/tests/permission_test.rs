//! Permission resolution tests: role/custom union, store fallback, and
//! firm policy.

use std::sync::Arc;

use uuid::Uuid;

use audithub_auth::rbac::PermissionResolver;
use audithub_auth::store::memory::{MemoryFirmStore, MemoryPermissionStore};
use audithub_core::error::ErrorKind;
use audithub_entity::firm::FirmPolicy;
use audithub_entity::rbac::{RoleGrant, UserGrants};

fn role_grant(name: &str, permissions: &[&str]) -> RoleGrant {
    RoleGrant {
        role: name.to_string(),
        hierarchy_level: 1,
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

fn grants(user_id: Uuid, roles: Vec<RoleGrant>, custom: &[&str]) -> UserGrants {
    UserGrants {
        user_id,
        roles,
        custom: custom.iter().map(|p| p.to_string()).collect(),
    }
}

fn resolver(
    permissions: Arc<MemoryPermissionStore>,
    firms: Arc<MemoryFirmStore>,
) -> PermissionResolver {
    PermissionResolver::new(permissions, firms)
}

#[tokio::test]
async fn effective_permissions_are_the_union_of_roles_and_custom() {
    let permissions = Arc::new(MemoryPermissionStore::new());
    let firms = Arc::new(MemoryFirmStore::new());
    let user_id = Uuid::new_v4();

    permissions
        .insert(grants(
            user_id,
            vec![
                role_grant("senior", &["engagement.read", "engagement.write"]),
                role_grant("reviewer", &["engagement.read", "workpaper.review"]),
            ],
            &["sampling.run"],
        ))
        .await;

    let r = resolver(permissions, firms);
    let effective = r.user_permissions(user_id).await.unwrap();

    assert_eq!(
        effective.into_iter().collect::<Vec<_>>(),
        vec![
            "engagement.read",
            "engagement.write",
            "sampling.run",
            "workpaper.review",
        ]
    );

    assert!(r.has_permission(&user_id, "workpaper.review").await.unwrap());
    assert!(r.has_permission(&user_id, "sampling.run").await.unwrap());
    assert!(!r.has_permission(&user_id, "firm.manage").await.unwrap());
}

#[tokio::test]
async fn hydrated_grants_short_circuit_positive_checks() {
    let permissions = Arc::new(MemoryPermissionStore::new());
    let firms = Arc::new(MemoryFirmStore::new());
    let user_id = Uuid::new_v4();

    // The store knows nothing about this user.
    let hydrated = grants(user_id, vec![], &["report.export"]);

    let r = resolver(permissions, firms);
    assert!(r.has_permission(&hydrated, "report.export").await.unwrap());
}

#[tokio::test]
async fn negative_hydrated_check_falls_back_to_the_store() {
    let permissions = Arc::new(MemoryPermissionStore::new());
    let firms = Arc::new(MemoryFirmStore::new());
    let user_id = Uuid::new_v4();

    // Stale hydrated grants miss a permission the store has since
    // recorded.
    permissions
        .insert(grants(user_id, vec![], &["report.export"]))
        .await;
    let stale = grants(user_id, vec![], &[]);

    let r = resolver(permissions, firms);
    assert!(r.has_permission(&stale, "report.export").await.unwrap());
}

#[tokio::test]
async fn check_any_and_check_all_enforce_forbidden() {
    let permissions = Arc::new(MemoryPermissionStore::new());
    let firms = Arc::new(MemoryFirmStore::new());
    let user_id = Uuid::new_v4();

    permissions
        .insert(grants(user_id, vec![], &["engagement.read"]))
        .await;

    let r = resolver(permissions, firms);

    r.check_any(&user_id, &["engagement.read", "engagement.write"])
        .await
        .unwrap();
    let err = r
        .check_any(&user_id, &["engagement.write", "firm.manage"])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    r.check_all(&user_id, &["engagement.read"]).await.unwrap();
    let err = r
        .check_all(&user_id, &["engagement.read", "engagement.write"])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn firm_policy_allows_action_by_role_or_user() {
    let permissions = Arc::new(MemoryPermissionStore::new());
    let firms = Arc::new(MemoryFirmStore::new());
    let firm_id = Uuid::new_v4();

    let by_role = Uuid::new_v4();
    let by_user = Uuid::new_v4();
    let denied = Uuid::new_v4();

    permissions
        .insert(grants(by_role, vec![role_grant("partner", &[])], &[]))
        .await;

    let policy = FirmPolicy::from_settings(&serde_json::json!({
        "approve_report": {
            "allowed_roles": ["partner"],
            "custom_users": [by_user],
        }
    }));
    firms.insert(firm_id, policy).await;

    let r = resolver(permissions, firms);

    assert!(r.allows_action(&by_role, firm_id, "approve_report").await.unwrap());
    assert!(r.allows_action(&by_user, firm_id, "approve_report").await.unwrap());
    assert!(!r.allows_action(&denied, firm_id, "approve_report").await.unwrap());
    assert!(!r.allows_action(&by_role, firm_id, "unknown_action").await.unwrap());
}

#[tokio::test]
async fn named_permission_wins_over_firm_policy() {
    let permissions = Arc::new(MemoryPermissionStore::new());
    let firms = Arc::new(MemoryFirmStore::new());
    let firm_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    // No policy entry for the action at all; the named permission alone
    // grants it.
    permissions
        .insert(grants(user_id, vec![], &["approve_report"]))
        .await;

    let r = resolver(permissions, firms);
    assert!(r.allows_action(&user_id, firm_id, "approve_report").await.unwrap());
}
