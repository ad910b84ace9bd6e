//! Behaviour every `ApplicationStore` must show through `Repository`.
//! Each backend's test module runs these cases against a fresh store.

use std::cmp::Reverse;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    Application, ApplicationPatch, Feedback, NewApplication, NewSession, QuestionWithAnswer,
    Status, Tag,
};
use crate::repository::{ListFilter, Repository, RepositoryError, Stats};

fn new_app(company: &str, role: &str, status: &str, tag: &str) -> NewApplication {
    NewApplication {
        company: Some(company.to_string()),
        role: Some(role.to_string()),
        status: Some(status.to_string()),
        tag: Some(tag.to_string()),
        ..Default::default()
    }
}

fn answered(question: &str, clarity: u8, relevance: u8) -> QuestionWithAnswer {
    QuestionWithAnswer {
        question: question.to_string(),
        answer: "I profiled the service and removed the hot lock.".to_string(),
        feedback: Feedback {
            clarity,
            relevance,
            suggestions: vec!["Quantify the result".to_string()],
            overall: "Clear and specific.".to_string(),
        },
        timestamp: Utc::now(),
    }
}

fn session_for(application_id: &str, questions: Vec<QuestionWithAnswer>) -> NewSession {
    NewSession {
        application_id: application_id.to_string(),
        questions,
    }
}

fn filter() -> ListFilter {
    ListFilter::default()
}

async fn tick() {
    tokio::time::sleep(Duration::from_millis(3)).await;
}

pub async fn create_acme(repo: &Repository) -> Application {
    repo.create_application(&new_app("Acme", "Engineer", "applied", "target"))
        .await
        .unwrap()
}

pub async fn create_then_get(repo: &Repository) {
    let input = NewApplication {
        job_url: Some("https://acme.example/jobs/42".to_string()),
        notes: Some("Referred by Sam".to_string()),
        ..new_app("Acme", "Engineer", "interview", "dream")
    };
    let created = repo.create_application(&input).await.unwrap();

    assert!(!created.id.is_nil());
    assert_eq!(created.company, "Acme");
    assert_eq!(created.role, "Engineer");
    assert_eq!(created.status, Status::Interview);
    assert_eq!(created.tag, Tag::Dream);
    assert_eq!(created.job_url, "https://acme.example/jobs/42");
    assert_eq!(created.notes, "Referred by Sam");
    assert!(created.interview_notes.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let fetched = repo.get_application(created.id).await.unwrap();
    assert_eq!(fetched, Some(created));

    assert!(repo.get_application(Uuid::new_v4()).await.unwrap().is_none());
}

pub async fn create_rejects_invalid_input(repo: &Repository) {
    let missing_company = NewApplication {
        company: None,
        ..new_app("", "Engineer", "applied", "target")
    };
    let bad_status = new_app("Acme", "Engineer", "hired", "target");
    let bad_tag = new_app("Acme", "Engineer", "applied", "stretch");

    for input in [missing_company, bad_status, bad_tag] {
        let err = repo.create_application(&input).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)), "{err}");
    }

    let page = repo.list_applications(&filter()).await.unwrap();
    assert_eq!(page.total, 0);
}

pub async fn list_respects_limit_and_total(repo: &Repository) {
    for i in 0..12 {
        repo.create_application(&new_app(&format!("Company {i}"), "Engineer", "applied", "target"))
            .await
            .unwrap();
    }

    let default_page = repo.list_applications(&filter()).await.unwrap();
    assert_eq!(default_page.items.len(), 10);
    assert_eq!(default_page.total, 12);

    let cases = [(5, 0, 5), (5, 10, 2), (5, 20, 0), (50, 0, 12)];
    for (limit, offset, expected) in cases {
        let page = repo
            .list_applications(&ListFilter {
                limit: Some(limit),
                offset: Some(offset),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), expected, "limit={limit} offset={offset}");
        assert!(page.items.len() as i64 <= limit);
        assert_eq!(page.total, 12);
    }
}

pub async fn list_orders_newest_first_and_pages_cleanly(repo: &Repository) {
    for i in 0..9 {
        repo.create_application(&new_app(&format!("Co {i}"), "Engineer", "applied", "target"))
            .await
            .unwrap();
    }

    let all = repo
        .list_applications(&ListFilter {
            limit: Some(100),
            ..filter()
        })
        .await
        .unwrap()
        .items;
    let mut expected = all.clone();
    expected.sort_by_key(|a| Reverse((a.created_at, a.id)));
    assert_eq!(all, expected);

    let mut paged = Vec::new();
    for offset in [0, 4, 8] {
        let page = repo
            .list_applications(&ListFilter {
                limit: Some(4),
                offset: Some(offset),
                ..filter()
            })
            .await
            .unwrap();
        paged.extend(page.items.into_iter().map(|a| a.id));
    }
    let all_ids: Vec<Uuid> = all.iter().map(|a| a.id).collect();
    assert_eq!(paged, all_ids);
}

pub async fn list_filters_by_status_tag_and_search(repo: &Repository) {
    repo.create_application(&new_app("Acme", "Engineer", "applied", "dream"))
        .await
        .unwrap();
    repo.create_application(&new_app("Globex", "Designer", "interview", "target"))
        .await
        .unwrap();
    repo.create_application(&new_app("Initech", "Engineer", "offer", "backup"))
        .await
        .unwrap();
    let manager = repo
        .create_application(&new_app("Acme Corp", "Manager", "interview", "dream"))
        .await
        .unwrap();

    let count = |f: ListFilter| async move { repo.list_applications(&f).await.unwrap() };

    let interviews = count(ListFilter {
        status: Some("interview".to_string()),
        ..filter()
    })
    .await;
    assert_eq!(interviews.total, 2);
    assert!(interviews.items.iter().all(|a| a.status == Status::Interview));

    let dream = count(ListFilter {
        tag: Some("dream".to_string()),
        ..filter()
    })
    .await;
    assert_eq!(dream.total, 2);

    let both = count(ListFilter {
        status: Some("interview".to_string()),
        tag: Some("dream".to_string()),
        ..filter()
    })
    .await;
    assert_eq!(both.total, 1);
    assert_eq!(both.items[0].id, manager.id);

    let engineers = count(ListFilter {
        search: Some("engineer".to_string()),
        ..filter()
    })
    .await;
    assert_eq!(engineers.total, 2);

    let everything = count(ListFilter {
        status: Some("All".to_string()),
        tag: Some("All".to_string()),
        ..filter()
    })
    .await;
    assert_eq!(everything.total, 4);
}

pub async fn list_search_is_case_insensitive_substring(repo: &Repository) {
    let acme = repo
        .create_application(&new_app("Acme Corp", "Senior Engineer", "applied", "target"))
        .await
        .unwrap();

    for needle in ["acme", "CORP", "me co", "senior eng"] {
        let page = repo
            .list_applications(&ListFilter {
                search: Some(needle.to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1, "search '{needle}'");
        assert_eq!(page.items[0].id, acme.id);
    }

    let miss = repo
        .list_applications(&ListFilter {
            search: Some("globex".to_string()),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(miss.total, 0);

    // Folding must not depend on the database locale.
    let societe = repo
        .create_application(&new_app("Société Générale", "Analyste", "applied", "dream"))
        .await
        .unwrap();
    for needle in ["SOCIÉTÉ", "générale", "ÉTÉ G"] {
        let page = repo
            .list_applications(&ListFilter {
                search: Some(needle.to_string()),
                ..filter()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1, "search '{needle}'");
        assert_eq!(page.items[0].id, societe.id);
    }
}

pub async fn text_with_nul_is_rejected_before_storage(repo: &Repository) {
    let acme = create_acme(repo).await;
    let expect_validation = |result: Result<_, RepositoryError>, what: &str| match result {
        Err(RepositoryError::Validation(msg)) => assert!(msg.contains("NUL"), "{what}: {msg}"),
        other => panic!("{what}: expected a validation error, got {other:?}"),
    };

    expect_validation(
        repo.create_application(&new_app("Acme\0Labs", "Engineer", "applied", "target"))
            .await
            .map(|_| ()),
        "create",
    );
    expect_validation(
        repo.update_application(
            acme.id,
            &ApplicationPatch {
                notes: Some("call\0back".to_string()),
                ..Default::default()
            },
        )
        .await
        .map(|_| ()),
        "patch",
    );
    expect_validation(
        repo.list_applications(&ListFilter {
            search: Some("\0".to_string()),
            ..filter()
        })
        .await
        .map(|_| ()),
        "search",
    );
    expect_validation(
        repo.create_session(&session_for("gen\0eral", vec![]))
            .await
            .map(|_| ()),
        "session id",
    );
    let mut question = answered("Why Acme?", 4, 4);
    question.answer = "Anvils\0".to_string();
    expect_validation(
        repo.create_session(&session_for(&acme.id.to_string(), vec![question]))
            .await
            .map(|_| ()),
        "session answer",
    );

    let stored = repo.get_application(acme.id).await.unwrap().unwrap();
    assert_eq!(stored, acme);
    assert_eq!(repo.list_applications(&filter()).await.unwrap().total, 1);
    assert!(repo
        .list_sessions_by_application(&acme.id.to_string())
        .await
        .unwrap()
        .is_empty());
}

pub async fn list_with_no_matches_is_empty(repo: &Repository) {
    let empty = repo.list_applications(&filter()).await.unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.total, 0);

    create_acme(repo).await;
    let offers = repo
        .list_applications(&ListFilter {
            status: Some("offer".to_string()),
            ..filter()
        })
        .await
        .unwrap();
    assert!(offers.items.is_empty());
    assert_eq!(offers.total, 0);
}

pub async fn empty_patch_only_touches_updated_at(repo: &Repository) {
    let created = create_acme(repo).await;
    tick().await;

    let updated = repo
        .update_application(created.id, &ApplicationPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert!(updated.updated_at > created.updated_at);
    let mut expected = created.clone();
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
}

pub async fn update_lifecycle_scenario(repo: &Repository) {
    let created = create_acme(repo).await;
    assert_eq!(created.status, Status::Applied);
    assert!(created.interview_notes.is_empty());

    let updated = repo
        .update_application(
            created.id,
            &ApplicationPatch {
                status: Some("interview".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, Status::Interview);
    assert_eq!(updated.company, "Acme");
    assert_eq!(updated.role, "Engineer");
    assert_eq!(updated.created_at, created.created_at);

    let stored = repo.get_application(created.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);

    assert!(repo.delete_application(created.id).await.unwrap());
    assert!(repo.get_application(created.id).await.unwrap().is_none());
    assert!(!repo.delete_application(created.id).await.unwrap());
}

pub async fn update_unknown_id_is_none(repo: &Repository) {
    let patch = ApplicationPatch {
        notes: Some("follow up".to_string()),
        ..Default::default()
    };
    assert!(repo
        .update_application(Uuid::new_v4(), &patch)
        .await
        .unwrap()
        .is_none());

    let created = create_acme(repo).await;
    let bad = ApplicationPatch {
        tag: Some("someday".to_string()),
        ..Default::default()
    };
    let err = repo.update_application(created.id, &bad).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
    let stored = repo.get_application(created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

pub async fn delete_cascades_to_sessions(repo: &Repository) {
    let app = create_acme(repo).await;
    let key = app.id.to_string();

    repo.create_session(&session_for(&key, vec![answered("Why us?", 3, 4)]))
        .await
        .unwrap();
    repo.create_session(&session_for(&key, vec![]))
        .await
        .unwrap();
    repo.create_session(&session_for("unrelated", vec![]))
        .await
        .unwrap();
    assert_eq!(repo.list_sessions_by_application(&key).await.unwrap().len(), 2);

    assert!(repo.delete_application(app.id).await.unwrap());

    assert!(repo.list_sessions_by_application(&key).await.unwrap().is_empty());
    assert_eq!(
        repo.list_sessions_by_application("unrelated")
            .await
            .unwrap()
            .len(),
        1
    );
}

pub async fn sessions_do_not_require_an_application(repo: &Repository) {
    let session = repo
        .create_session(&session_for("no-such-app", vec![answered("Why Rust?", 4, 4)]))
        .await
        .unwrap();
    assert!(!session.id.is_nil());
    assert_eq!(session.application_id, "no-such-app");

    let listed = repo
        .list_sessions_by_application("no-such-app")
        .await
        .unwrap();
    assert_eq!(listed, vec![session]);

    let err = repo
        .create_session(&session_for("", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));

    let out_of_range = repo
        .create_session(&session_for("no-such-app", vec![answered("Why?", 0, 9)]))
        .await
        .unwrap_err();
    assert!(matches!(out_of_range, RepositoryError::Validation(_)));
}

pub async fn session_appends_summary_to_application(repo: &Repository) {
    let app = create_acme(repo).await;
    tick().await;

    let session = repo
        .create_session(&session_for(
            &app.id.to_string().to_uppercase(),
            vec![answered("Why us?", 3, 5), answered("A hard bug?", 4, 4)],
        ))
        .await
        .unwrap();
    assert_eq!(session.application_id, app.id.to_string());

    let stored = repo.get_application(app.id).await.unwrap().unwrap();
    assert_eq!(stored.interview_notes.len(), 1);
    let note = &stored.interview_notes[0];
    assert_eq!(note.session_id, session.id);
    assert_eq!(note.question_count, 2);
    assert_eq!(note.average_clarity, 3.5);
    assert_eq!(note.average_relevance, 4.5);
    assert_eq!(stored.updated_at, session.created_at);
    assert_eq!(stored.created_at, app.created_at);
}

pub async fn sessions_listed_newest_first(repo: &Repository) {
    let mut ids = Vec::new();
    for _ in 0..3 {
        let s = repo
            .create_session(&session_for("app-1", vec![]))
            .await
            .unwrap();
        ids.push(s.id);
        tick().await;
    }
    ids.reverse();

    let listed: Vec<Uuid> = repo
        .list_sessions_by_application("app-1")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed, ids);
    assert!(repo
        .list_sessions_by_application("app-2")
        .await
        .unwrap()
        .is_empty());
}

pub async fn stats_match_status_counts(repo: &Repository) {
    assert_eq!(
        repo.get_stats().await.unwrap(),
        Stats {
            total: 0,
            interviews: 0,
            offers: 0,
            response_rate: 0
        }
    );

    let statuses = [
        ("applied", 3),
        ("interview", 2),
        ("offer", 1),
        ("rejected", 4),
    ];
    for (status, n) in statuses {
        for i in 0..n {
            repo.create_application(&new_app(&format!("{status} {i}"), "Engineer", status, "target"))
                .await
                .unwrap();
        }
    }

    assert_eq!(
        repo.get_stats().await.unwrap(),
        Stats {
            total: 10,
            interviews: 2,
            offers: 1,
            response_rate: 100
        }
    );
}
