#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use support::{ISSUER_A, ISSUER_B, creator, member, resolve, services, tenant_admin};
use surveys::domain::error::DomainError;
use surveys::domain::model::{NewSurvey, SurveyPatch};

#[tokio::test]
async fn duplicate_request_is_rejected_case_insensitively() {
    let svc = services().await;
    tenant_admin(&svc, ISSUER_A).await;
    let owner = resolve(&svc, &creator(ISSUER_A, "c1", "c1@example.com")).await;
    let survey = svc
        .surveys
        .create_survey(&owner, NewSurvey { title: "Lunch".to_owned() })
        .await
        .unwrap();

    let request = svc
        .contributors
        .add_request(&owner, survey.id, " Bob@Example.com ")
        .await
        .unwrap();
    assert_eq!(request.email_address, "bob@example.com");

    let err = svc
        .contributors
        .add_request(&owner, survey.id, "BOB@example.COM")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ContributorRequestExists { .. }));

    let listing = svc
        .contributors
        .list_contributors(&owner, survey.id)
        .await
        .unwrap();
    assert_eq!(listing.requests.len(), 1);
}

#[tokio::test]
async fn existing_members_cannot_be_invited() {
    let svc = services().await;
    tenant_admin(&svc, ISSUER_A).await;
    let owner = resolve(&svc, &creator(ISSUER_A, "c1", "Owner@Example.com")).await;
    let survey = svc
        .surveys
        .create_survey(&owner, NewSurvey { title: "Lunch".to_owned() })
        .await
        .unwrap();

    let err = svc
        .contributors
        .add_request(&owner, survey.id, "owner@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyContributor { .. }));

    svc.contributors
        .add_request(&owner, survey.id, "bob@example.com")
        .await
        .unwrap();
    let bob = resolve(&svc, &member(ISSUER_A, "bob", "Bob@Example.com")).await;
    assert_eq!(svc.contributors.process_pending(&bob).await.unwrap(), 1);

    let err = svc
        .contributors
        .add_request(&owner, survey.id, "BOB@EXAMPLE.COM")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyContributor { .. }));

    let listing = svc
        .contributors
        .list_contributors(&owner, survey.id)
        .await
        .unwrap();
    assert_eq!(listing.contributors.len(), 1);
    assert!(listing.requests.is_empty());
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let svc = services().await;
    tenant_admin(&svc, ISSUER_A).await;
    let owner = resolve(&svc, &creator(ISSUER_A, "c1", "c1@example.com")).await;
    let survey = svc
        .surveys
        .create_survey(&owner, NewSurvey { title: "Lunch".to_owned() })
        .await
        .unwrap();

    let err = svc
        .contributors
        .add_request(&owner, survey.id, "not-an-email")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn accepted_contributor_can_edit_but_not_publish() {
    let svc = services().await;
    tenant_admin(&svc, ISSUER_A).await;
    let owner = resolve(&svc, &creator(ISSUER_A, "c1", "c1@example.com")).await;
    let survey = svc
        .surveys
        .create_survey(&owner, NewSurvey { title: "Lunch".to_owned() })
        .await
        .unwrap();
    svc.contributors
        .add_request(&owner, survey.id, "bob@example.com")
        .await
        .unwrap();

    let bob = resolve(&svc, &member(ISSUER_A, "bob", "bob@example.com")).await;
    assert!(matches!(
        svc.surveys.get_survey(&bob, survey.id).await,
        Err(DomainError::Forbidden { .. })
    ));

    assert_eq!(svc.contributors.process_pending(&bob).await.unwrap(), 1);
    assert_eq!(svc.contributors.process_pending(&bob).await.unwrap(), 0);

    let listing = svc.surveys.list_for_user(&bob, bob.user_id).await.unwrap();
    assert_eq!(listing.contribute.len(), 1);

    svc.surveys
        .update_survey(
            &bob,
            survey.id,
            SurveyPatch {
                title: "Lunch v2".to_owned(),
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        svc.surveys.publish(&bob, survey.id).await,
        Err(DomainError::Forbidden { .. })
    ));
    assert!(matches!(
        svc.contributors.add_request(&bob, survey.id, "eve@example.com").await,
        Err(DomainError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn requests_from_other_tenants_stay_pending() {
    let svc = services().await;
    tenant_admin(&svc, ISSUER_A).await;
    tenant_admin(&svc, ISSUER_B).await;
    let owner = resolve(&svc, &creator(ISSUER_A, "c1", "c1@example.com")).await;
    let survey = svc
        .surveys
        .create_survey(&owner, NewSurvey { title: "Lunch".to_owned() })
        .await
        .unwrap();
    svc.contributors
        .add_request(&owner, survey.id, "bob@example.com")
        .await
        .unwrap();

    let foreign_bob = resolve(&svc, &member(ISSUER_B, "bob", "bob@example.com")).await;
    assert_eq!(svc.contributors.process_pending(&foreign_bob).await.unwrap(), 0);

    let listing = svc
        .contributors
        .list_contributors(&owner, survey.id)
        .await
        .unwrap();
    assert_eq!(listing.requests.len(), 1);
    assert!(listing.contributors.is_empty());
}

#[tokio::test]
async fn owner_consuming_own_request_is_not_added_twice() {
    let svc = services().await;
    tenant_admin(&svc, ISSUER_A).await;
    let owner = resolve(&svc, &creator(ISSUER_A, "c1", "c1@example.com")).await;
    let survey = svc
        .surveys
        .create_survey(&owner, NewSurvey { title: "Lunch".to_owned() })
        .await
        .unwrap();
    // invited before the owner's email changed
    svc.contributors
        .add_request(&owner, survey.id, "c1@new.example.com")
        .await
        .unwrap();

    let renamed = resolve(&svc, &creator(ISSUER_A, "c1", "c1@new.example.com")).await;
    assert_eq!(svc.contributors.process_pending(&renamed).await.unwrap(), 0);

    let listing = svc
        .contributors
        .list_contributors(&owner, survey.id)
        .await
        .unwrap();
    assert!(listing.contributors.is_empty());
    assert!(listing.requests.is_empty());
}
