use shared::{Candidate, CandidateId, Stage};

use super::common::repository_with;
use crate::error::PipelineError;
use crate::services::InMemoryCandidateRepository;
use crate::traits::CandidateRepository;
use crate::types::CandidateQuery;

#[tokio::test]
async fn test_seeded_repository_covers_every_stage() {
    let repository = InMemoryCandidateRepository::seeded();
    let candidates = repository.list(&CandidateQuery::all()).await.unwrap();

    for stage in Stage::ALL {
        assert!(
            candidates.iter().any(|c| c.stage_status == stage),
            "no seeded candidate in {stage}"
        );
    }
    assert_eq!(candidates.len(), repository.len().await);
}

#[tokio::test]
async fn test_list_filters_by_query() {
    let repository = InMemoryCandidateRepository::seeded();

    let backend = repository.list(&CandidateQuery::for_job("job-backend")).await.unwrap();
    assert!(!backend.is_empty());
    assert!(backend.iter().all(|c| c.profile.role == "Backend Engineer"));

    let search = repository
        .list(&CandidateQuery::all().with_search("hopper"))
        .await
        .unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].name, "Grace Hopper");
}

#[tokio::test]
async fn test_get_missing_candidate_is_none() {
    let repository = InMemoryCandidateRepository::new();
    assert!(repository.is_empty().await);
    assert_eq!(repository.get(&CandidateId::new()).await.unwrap(), None);
}

#[tokio::test]
async fn test_insert_and_update() {
    let repository = InMemoryCandidateRepository::new();
    let ada = Candidate::new("Ada", Stage::New);

    repository.insert(ada.clone()).await.unwrap();
    assert!(matches!(
        repository.insert(ada.clone()).await,
        Err(PipelineError::DuplicateCandidate { .. })
    ));

    let renamed = Candidate {
        name: "Ada Lovelace".to_string(),
        ..ada.clone()
    };
    repository.update(renamed).await.unwrap();
    assert_eq!(repository.get(&ada.id).await.unwrap().unwrap().name, "Ada Lovelace");

    let stranger = Candidate::new("Nobody", Stage::New);
    assert!(matches!(
        repository.update(stranger).await,
        Err(PipelineError::CandidateNotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_stage_appends_to_target() {
    let (repository, candidates) = repository_with(Stage::New, &["A", "B"]);
    repository
        .insert(Candidate::new("X", Stage::Offer).with_order_hint(0))
        .await
        .unwrap();

    let moved = repository.update_stage(&candidates[0].id, Stage::Offer).await.unwrap();
    assert_eq!(moved.stage_status, Stage::Offer);
    assert_eq!(moved.order_hint, 1);

    assert!(matches!(
        repository.update_stage(&CandidateId::new(), Stage::Offer).await,
        Err(PipelineError::CandidateNotFound { .. })
    ));
}

#[tokio::test]
async fn test_reorder_rewrites_hints() {
    let (repository, candidates) = repository_with(Stage::New, &["A", "B", "C"]);
    let order = vec![candidates[2].id.clone(), candidates[0].id.clone(), candidates[1].id.clone()];

    repository.reorder(Stage::New, &order).await.unwrap();

    let listed = repository.list(&CandidateQuery::all()).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_reorder_rejects_foreign_stage() {
    let (repository, candidates) = repository_with(Stage::New, &["A", "B"]);
    let result = repository
        .reorder(Stage::Offer, &[candidates[0].id.clone()])
        .await;

    assert!(matches!(result, Err(PipelineError::StageMismatch { .. })));
    // Nothing was touched
    let a = repository.get(&candidates[0].id).await.unwrap().unwrap();
    assert_eq!(a.order_hint, 0);
}
