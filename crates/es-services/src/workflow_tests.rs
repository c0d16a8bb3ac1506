//! End-to-end workflow over the in-memory stores: register a manager,
//! create a project, fill a task up to the collaborator cap, then produce
//! an SPT bulletin and fetch its lazily rendered document.

use std::sync::Arc;

use serde_json::json;

use es_bulletins::{
    BulletinRegistry, BulletinService, MemoryBulletinStore, MemoryDocumentStorage,
    MemoryProjectDirectory,
};
use es_core::error::{EsError, InvariantRule};
use es_models::bulletin::CreateBulletinRequest;
use es_models::project::{CreateProjectDto, Project};
use es_models::role::Role;
use es_models::task::CreateTaskDto;
use es_models::user::NewUser;

use crate::stores::{MemoryProjectStore, MemoryTaskStore, MemoryUserStore};
use crate::{ProjectService, TaskService, UserService};

struct Fixture {
    users: UserService<MemoryUserStore>,
    projects: ProjectService<MemoryProjectStore, MemoryUserStore>,
    tasks: TaskService<MemoryTaskStore, MemoryProjectStore, MemoryUserStore>,
    bulletins:
        BulletinService<MemoryBulletinStore, MemoryProjectDirectory, MemoryDocumentStorage>,
    directory: Arc<MemoryProjectDirectory>,
}

fn fixture() -> Fixture {
    let user_store = Arc::new(MemoryUserStore::new());
    let project_store = Arc::new(MemoryProjectStore::new());
    let task_store = Arc::new(MemoryTaskStore::new());
    let directory = Arc::new(MemoryProjectDirectory::new());

    Fixture {
        users: UserService::new(user_store.clone()),
        projects: ProjectService::new(project_store.clone(), user_store.clone()),
        tasks: TaskService::new(task_store, project_store, user_store),
        bulletins: BulletinService::new(
            Arc::new(MemoryBulletinStore::new()),
            directory.clone(),
            Arc::new(MemoryDocumentStorage::new()),
            Arc::new(BulletinRegistry::with_defaults()),
        ),
        directory,
    }
}

fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        username: username.to_string(),
        full_name: username.to_string(),
        role,
        team_id: None,
    }
}

#[tokio::test]
async fn test_field_campaign_workflow() {
    let fx = fixture();

    let director = fx
        .users
        .register(new_user("marta", Role::Diretor), "s3nh4-forte")
        .await
        .unwrap();
    let responsible = fx
        .users
        .register(new_user("joao", Role::AnalistaTecnico), "s3nh4-forte")
        .await
        .unwrap();
    let mut helper_ids = Vec::new();
    for name in ["aux-a", "aux-b", "aux-c"] {
        let helper = fx
            .users
            .register(new_user(name, Role::AuxiliarTecnico), "s3nh4-forte")
            .await
            .unwrap();
        helper_ids.push(helper.id.unwrap());
    }

    // A director can manage projects.
    let project = fx
        .projects
        .create(CreateProjectDto {
            name: "Sondagem Porto Sul".into(),
            client_name: Some("Construtora Delta".into()),
            manager_id: director.id.unwrap(),
            status: None,
        })
        .await
        .unwrap();
    let project_id = project.id.unwrap();

    // Fill the task to the collaborator cap.
    let task = fx
        .tasks
        .create(
            project_id,
            CreateTaskDto {
                title: "Furo SP-01".into(),
                description: None,
                main_responsible_id: responsible.id.unwrap(),
                collaborator_ids: vec![helper_ids[0], helper_ids[1]],
            },
        )
        .await
        .unwrap();

    // The third collaborator must bounce off the cap.
    let err = fx
        .tasks
        .add_collaborator(task.id.unwrap(), helper_ids[2])
        .await
        .unwrap_err();
    match err {
        EsError::InvariantViolation { rule, .. } => {
            assert_eq!(rule, InvariantRule::CollaboratorLimit)
        }
        other => panic!("unexpected error: {other}"),
    }

    // The bulletin pipeline reads projects through its own directory.
    fx.directory.insert(project.clone()).await;

    let bulletin = fx
        .bulletins
        .create_bulletin(
            CreateBulletinRequest {
                type_tag: "spt".into(),
                project_id,
                executed_at: None,
                data: json!({
                    "initialDepth": 0.0,
                    "finalDepth": 14.45,
                    "blowsFirst30cm": 7,
                    "blowsLast30cm": 21,
                    "soilClassification": "Areia siltosa"
                }),
            },
            responsible.id.unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bulletin.bulletin_type(), "SPT");
    assert!(!bulletin.has_document());

    // First document read renders and stores; the second serves the same bytes.
    let (rendered, first) = fx
        .bulletins
        .get_bulletin_document(bulletin.id.unwrap())
        .await
        .unwrap();
    assert!(rendered.has_document());
    let report = String::from_utf8(first.to_vec()).unwrap();
    assert!(report.contains("Sondagem Porto Sul"));
    assert!(report.contains("Areia siltosa"));

    let (_, second) = fx
        .bulletins
        .get_bulletin_document(bulletin.id.unwrap())
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_bulletin_type_rejected() {
    let fx = fixture();

    let mut project = Project::new("Obra Existente", 1);
    project.id = Some(1);
    fx.directory.insert(project).await;

    let err = fx
        .bulletins
        .create_bulletin(
            CreateBulletinRequest {
                type_tag: "SEISMIC".into(),
                project_id: 1,
                executed_at: None,
                data: json!({}),
            },
            1,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EsError::UnsupportedBulletinType { .. }));
}
