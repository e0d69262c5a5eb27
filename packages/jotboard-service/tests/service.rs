use std::collections::HashSet;

use uuid::Uuid;

use jotboard_config::{Config, Notes, Postgres, Security, Service, Storage};
use jotboard_service::{
	Caller, Error, JotService, LoginRequest, NoteInput, ProjectCreateRequest, ProjectStatus,
	ProjectUpdateRequest, SignupRequest, TaskCreateRequest,
};
use jotboard_storage::db::Db;
use jotboard_testkit::TestDatabase;

fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 2 } },
		security: Security {
			bind_localhost_only: true,
			admin_auth_token: None,
			min_password_chars: 8,
			session_secure_cookie: false,
			session_inactivity_days: 7,
		},
		notes: Notes { max_title_chars: 200, max_text_chars: 1_000 },
	}
}

async fn test_service() -> Option<(TestDatabase, JotService)> {
	let Some(base_dsn) = jotboard_testkit::env_dsn() else {
		eprintln!("Skipping service tests; set JOTBOARD_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = test_config(test_db.dsn().to_string());
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, JotService::new(cfg, db)))
}

async fn signup(service: &JotService, username: &str) -> Caller {
	service
		.signup(SignupRequest {
			username: username.to_string(),
			password: "hunter2hunter2".to_string(),
		})
		.await
		.expect("Failed to sign up.")
}

fn input(title: &str, text: &str) -> NoteInput {
	NoteInput { title: title.to_string(), text: text.to_string() }
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn list_returns_exactly_the_callers_notes() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "alice").await;
	let bob = signup(&service, "bob").await;
	let mut alice_ids = HashSet::new();

	for idx in 0..3 {
		let created = service
			.create_note(Some(&alice), input(&format!("alice {idx}"), "body"))
			.await
			.expect("Failed to create note.");

		alice_ids.insert(created.note_id);
	}

	service.create_note(Some(&bob), input("bob", "body")).await.expect("Failed to create note.");

	let listed = service.list_notes(Some(&alice)).await.expect("Failed to list notes.");
	let listed_ids = listed.items.iter().map(|item| item.note_id).collect::<HashSet<_>>();

	assert_eq!(listed_ids, alice_ids);
	assert!(listed.items.iter().all(|item| item.owner_id == alice.user_id));

	let bob_listed = service.list_notes(Some(&bob)).await.expect("Failed to list notes.");

	assert_eq!(bob_listed.items.len(), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn created_note_is_listed_with_owner() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "alice").await;
	let created =
		service.create_note(Some(&alice), input(" t ", "b")).await.expect("Failed to create note.");
	let listed = service.list_notes(Some(&alice)).await.expect("Failed to list notes.");

	assert_eq!(listed.items.len(), 1);

	let note = &listed.items[0];

	assert_eq!(note.note_id, created.note_id);
	assert_eq!(note.title, "t");
	assert_eq!(note.text, "b");
	assert_eq!(note.owner_id, alice.user_id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn anonymous_callers_are_unauthenticated() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	assert!(matches!(service.list_notes(None).await, Err(Error::Unauthenticated { .. })));
	assert!(matches!(
		service.create_note(None, input("t", "b")).await,
		Err(Error::Unauthenticated { .. })
	));
	assert!(matches!(
		service.get_note(None, Uuid::new_v4()).await,
		Err(Error::Unauthenticated { .. })
	));
	assert!(matches!(service.list_tasks(None).await, Err(Error::Unauthenticated { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn empty_fields_fail_validation() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "alice").await;
	let err = service
		.create_note(Some(&alice), input("  ", ""))
		.await
		.expect_err("Expected validation error.");

	match err {
		Error::Validation { fields, .. } =>
			assert_eq!(fields, vec!["title".to_string(), "text".to_string()]),
		other => panic!("Unexpected error: {other:?}"),
	}

	let err = service
		.create_note(Some(&alice), input("t", &"x".repeat(1_001)))
		.await
		.expect_err("Expected length validation error.");

	assert!(matches!(err, Error::Validation { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn detail_update_and_delete_are_owner_only() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "alice").await;
	let bob = signup(&service, "bob").await;
	let created =
		service.create_note(Some(&alice), input("t", "b")).await.expect("Failed to create note.");
	let note_id = created.note_id;

	assert!(matches!(service.get_note(Some(&bob), note_id).await, Err(Error::NotFound { .. })));
	assert!(matches!(
		service.update_note(Some(&bob), note_id, input("stolen", "b")).await,
		Err(Error::NotFound { .. })
	));
	assert!(matches!(service.delete_note(Some(&bob), note_id).await, Err(Error::NotFound { .. })));

	let untouched = service.get_note(Some(&alice), note_id).await.expect("Failed to get note.");

	assert_eq!(untouched.title, "t");

	let updated = service
		.update_note(Some(&alice), note_id, input("t2", "b2"))
		.await
		.expect("Failed to update note.");

	assert_eq!(updated.title, "t2");
	assert_eq!(updated.text, "b2");
	assert_eq!(updated.created_at, untouched.created_at);
	assert!(updated.updated_at >= untouched.updated_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn deleted_note_is_not_found() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "alice").await;
	let created =
		service.create_note(Some(&alice), input("t", "b")).await.expect("Failed to create note.");

	service.delete_note(Some(&alice), created.note_id).await.expect("Failed to delete note.");

	assert!(matches!(
		service.get_note(Some(&alice), created.note_id).await,
		Err(Error::NotFound { .. })
	));
	assert!(matches!(
		service.delete_note(Some(&alice), created.note_id).await,
		Err(Error::NotFound { .. })
	));
	assert!(service.list_notes(Some(&alice)).await.expect("Failed to list notes.").items.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn projects_are_listed_for_everyone() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	assert!(service.list_projects().await.expect("Failed to list projects.").items.is_empty());

	let created = service
		.create_project(ProjectCreateRequest {
			title: "Web Designing".to_string(),
			text: "Landing page.".to_string(),
			status: None,
			created: None,
			progress: None,
		})
		.await
		.expect("Failed to create project.");

	assert_eq!(created.status, ProjectStatus::Draft);
	assert!(created.progress.is_zero());

	service
		.update_project(
			created.project_id,
			ProjectUpdateRequest {
				status: Some(ProjectStatus::Prototypes),
				progress: Some("60".parse().expect("decimal")),
				..Default::default()
			},
		)
		.await
		.expect("Failed to update project.");

	let listed = service.list_projects().await.expect("Failed to list projects.");

	assert_eq!(listed.items.len(), 1);
	assert_eq!(listed.items[0].status, ProjectStatus::Prototypes);
	assert_eq!(listed.items[0].title, "Web Designing");

	let missing = service.update_project(Uuid::new_v4(), ProjectUpdateRequest::default()).await;

	assert!(matches!(missing, Err(Error::NotFound { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn tasks_are_fetched_per_call() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "alice").await;

	assert!(service.list_tasks(Some(&alice)).await.expect("Failed to list tasks.").items.is_empty());

	service
		.create_task(TaskCreateRequest { title: "Write docs".to_string(), text: String::new() })
		.await
		.expect("Failed to create task.");

	let listed = service.list_tasks(Some(&alice)).await.expect("Failed to list tasks.");

	assert_eq!(listed.items.len(), 1);
	assert_eq!(listed.items[0].title, "Write docs");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set JOTBOARD_PG_DSN to run."]
async fn signup_and_login_resolve_the_same_caller() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};
	let alice = signup(&service, "Alice").await;
	let logged_in = service
		.login(LoginRequest {
			username: " alice ".to_string(),
			password: "hunter2hunter2".to_string(),
		})
		.await
		.expect("Failed to log in.");

	assert_eq!(logged_in, alice);

	let wrong = service
		.login(LoginRequest { username: "alice".to_string(), password: "nope-nope".to_string() })
		.await;

	assert!(matches!(wrong, Err(Error::Unauthenticated { .. })));

	let unknown = service
		.login(LoginRequest { username: "mallory".to_string(), password: "whatever".to_string() })
		.await;

	assert!(matches!(unknown, Err(Error::Unauthenticated { .. })));

	let duplicate = service
		.signup(SignupRequest { username: "ALICE".to_string(), password: "hunter2hunter2".to_string() })
		.await;

	assert!(matches!(duplicate, Err(Error::Conflict { .. })));

	let short = service
		.signup(SignupRequest { username: "carol".to_string(), password: "short".to_string() })
		.await;

	assert!(matches!(short, Err(Error::Validation { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
