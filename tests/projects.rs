//! Tests for the project lifecycle endpoints.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_health() {
    let test_state = create_test_app_state();
    let app = test_app(&test_state);

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_launch_scenario() {
    let test_state = create_test_app_state();
    let (u1, u2) = {
        let conn = test_state.state.db.get().unwrap();
        (
            create_test_user(&conn, "Ada", "Lovelace"),
            create_test_user(&conn, "Charles", "Babbage"),
        )
    };
    let app = test_app(&test_state);

    // Create
    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        Some(&u1.id),
        Some(json!({ "title": "Launch", "type": "personal", "endDate": "2025-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let project_id = body["project"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["project"]["title"], "Launch");
    assert_eq!(body["project"]["type"], "personal");
    assert_eq!(body["project"]["endDate"], 1735689600);
    assert_eq!(ids(&body["project"]["members"]), vec![u1.id.clone()]);
    assert_eq!(body["projectRole"]["role"], "admin");
    assert_eq!(body["projectRole"]["user"], u1.id.as_str());
    assert_eq!(body["projectRole"]["project"], project_id.as_str());
    assert_eq!(
        ids(&body["user"]["projects"]),
        vec![body["projectRole"]["id"].as_str().unwrap().to_string()]
    );

    // Add U2 as contributor
    let members_uri = format!("/projects/{}/members", project_id);
    let (status, body) = send(
        &app,
        "POST",
        &members_uri,
        Some(&u1.id),
        Some(json!({ "member": u2.id, "role": "contributor" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["project"]["members"]), vec![u1.id.clone(), u2.id.clone()]);
    assert_eq!(body["memberRole"]["role"], "contributor");
    assert_eq!(body["member"]["id"], u2.id.as_str());

    // U2 can now view the project
    let project_uri = format!("/projects/{}", project_id);
    let (status, _) = send(&app, "GET", &project_uri, Some(&u2.id), None).await;
    assert_eq!(status, StatusCode::OK);

    // Remove U2
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("{}/{}", members_uri, u2.id),
        Some(&u1.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["project"]["members"]), vec![u1.id.clone()]);
    assert!(ids(&body["member"]["projects"]).is_empty());
    {
        let conn = test_state.state.db.get().unwrap();
        assert!(queries::get_project_role(&conn, &u2.id, &project_id).unwrap().is_none());
    }

    // Delete
    let (status, body) = send(&app, "DELETE", &project_uri, Some(&u1.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project 'Launch' deleted");

    let conn = test_state.state.db.get().unwrap();
    assert!(queries::get_project_by_id(&conn, &project_id).unwrap().is_none());
    assert!(queries::list_project_roles_for_project(&conn, &project_id).unwrap().is_empty());
    let stored_u1 = queries::get_user_by_id(&conn, &u1.id).unwrap().unwrap();
    assert!(stored_u1.projects.is_empty());
}

#[tokio::test]
async fn test_delete_team_project_updates_team() {
    let test_state = create_test_app_state();
    let (owner, team) = {
        let conn = test_state.state.db.get().unwrap();
        let owner = create_test_user(&conn, "Ada", "Lovelace");
        let team = create_test_team(&conn, "Engines", &[&owner.id]);
        (owner, team)
    };
    let app = test_app(&test_state);

    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        Some(&owner.id),
        Some(json!({
            "title": "Difference",
            "type": "team",
            "team": team.id,
            "endDate": "2025-06-30T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let project_id = body["project"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["project"]["team"], team.id.as_str());

    {
        let conn = test_state.state.db.get().unwrap();
        let stored_team = queries::get_team_by_id(&conn, &team.id).unwrap().unwrap();
        assert_eq!(stored_team.projects, vec![project_id.clone()]);
    }

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/projects/{}", project_id),
        Some(&owner.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let conn = test_state.state.db.get().unwrap();
    let stored_team = queries::get_team_by_id(&conn, &team.id).unwrap().unwrap();
    assert!(stored_team.projects.is_empty());
}

#[tokio::test]
async fn test_create_project_validation_messages() {
    let test_state = create_test_app_state();
    let owner = {
        let conn = test_state.state.db.get().unwrap();
        create_test_user(&conn, "Ada", "Lovelace")
    };
    let app = test_app(&test_state);

    let cases = [
        (json!({ "type": "personal", "endDate": "2025-01-01" }), "title is required"),
        (json!({ "title": "Launch", "endDate": "2025-01-01" }), "type is required"),
        (json!({ "title": "Launch", "type": "personal" }), "endDate is required"),
        (
            json!({ "title": "Launch", "type": "team", "endDate": "2025-01-01" }),
            "team is required for team projects",
        ),
        (
            json!({ "title": "Launch", "type": "team", "team": "no-such-team", "endDate": "2025-01-01" }),
            "Team not found",
        ),
    ];

    for (input, expected) in cases {
        let (status, body) = send(&app, "POST", "/projects", Some(&owner.id), Some(input)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], expected);
    }

    let conn = test_state.state.db.get().unwrap();
    assert!(queries::list_personal_projects_for_user(&conn, &owner.id).unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_returns_message() {
    let test_state = create_test_app_state();
    let owner = {
        let conn = test_state.state.db.get().unwrap();
        create_test_user(&conn, "Ada", "Lovelace")
    };
    let app = test_app(&test_state);

    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        Some(&owner.id),
        Some(json!({ "title": "Launch", "type": "galactic", "endDate": "2025-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_update_project_only_changes_provided_fields() {
    let test_state = create_test_app_state();
    let (owner, project) = {
        let mut conn = test_state.state.db.get().unwrap();
        let owner = create_test_user(&conn, "Ada", "Lovelace");
        let created = create_test_project(&mut conn, &owner, "Launch", ProjectType::Personal, None);
        (owner, created.project)
    };
    let app = test_app(&test_state);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/projects/{}", project.id),
        Some(&owner.id),
        Some(json!({ "title": "Relaunch", "endDate": "2026-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Relaunch");
    assert_eq!(body["endDate"], 1767225600);
    assert_eq!(body["description"], project.description.unwrap().as_str());
    assert_eq!(body["startDate"], project.start_date);
    assert_eq!(ids(&body["members"]), vec![owner.id.clone()]);
}

#[tokio::test]
async fn test_add_member_validation() {
    let test_state = create_test_app_state();
    let (owner, project_id) = {
        let mut conn = test_state.state.db.get().unwrap();
        let owner = create_test_user(&conn, "Ada", "Lovelace");
        let created = create_test_project(&mut conn, &owner, "Launch", ProjectType::Personal, None);
        (owner, created.project.id)
    };
    let app = test_app(&test_state);
    let uri = format!("/projects/{}/members", project_id);

    let (status, body) = send(&app, "POST", &uri, Some(&owner.id), Some(json!({ "role": "admin" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "member is required");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&owner.id),
        Some(json!({ "member": "no-such-user", "role": "contributor" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(&owner.id),
        Some(json!({ "member": owner.id, "role": "contributor" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User is already a member of this project");
}

#[tokio::test]
async fn test_remove_non_member_returns_message() {
    let test_state = create_test_app_state();
    let (owner, outsider, project_id) = {
        let mut conn = test_state.state.db.get().unwrap();
        let owner = create_test_user(&conn, "Ada", "Lovelace");
        let outsider = create_test_user(&conn, "Mary", "Somerville");
        let created = create_test_project(&mut conn, &owner, "Launch", ProjectType::Personal, None);
        (owner, outsider, created.project.id)
    };
    let app = test_app(&test_state);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/projects/{}/members/{}", project_id, outsider.id),
        Some(&owner.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Project role not found");
}

#[tokio::test]
async fn test_show_project_expands_tasks() {
    let test_state = create_test_app_state();
    let (owner, project_id, task) = {
        let mut conn = test_state.state.db.get().unwrap();
        let owner = create_test_user(&conn, "Ada", "Lovelace");
        let created = create_test_project(&mut conn, &owner, "Launch", ProjectType::Personal, None);
        let task = create_test_task(&conn, &created.project.id, "Write notes", Some(&owner.id));
        (owner, created.project.id, task)
    };
    let app = test_app(&test_state);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/projects/{}", project_id),
        Some(&owner.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task.id.as_str());
    assert_eq!(tasks[0]["title"], "Write notes");
    assert_eq!(tasks[0]["dueDate"], 1735689600);
    assert_eq!(tasks[0]["status"], "todo");
    assert_eq!(tasks[0]["assignedTo"]["firstName"], "Ada");
    assert_eq!(tasks[0]["assignedTo"]["lastName"], "Lovelace");
    assert_eq!(tasks[0]["assignedTo"]["fullName"], "Ada Lovelace");
}

#[tokio::test]
async fn test_list_personal_projects() {
    let test_state = create_test_app_state();
    let (ada, charles, notes_id) = {
        let mut conn = test_state.state.db.get().unwrap();
        let ada = create_test_user(&conn, "Ada", "Lovelace");
        let charles = create_test_user(&conn, "Charles", "Babbage");
        let team = create_test_team(&conn, "Engines", &[&ada.id]);
        let notes = create_test_project(&mut conn, &ada, "Notes", ProjectType::Personal, None);
        create_test_project(&mut conn, &ada, "Difference", ProjectType::Team, Some(&team.id));
        create_test_project(&mut conn, &charles, "Gears", ProjectType::Personal, None);
        create_test_task(&conn, &notes.project.id, "Translate memoir", None);
        (ada, charles, notes.project.id)
    };
    let app = test_app(&test_state);

    let (status, body) = send(&app, "GET", "/projects/personal", Some(&ada.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], notes_id.as_str());
    assert_eq!(projects[0]["tasks"][0]["title"], "Translate memoir");
    assert!(projects[0]["tasks"][0]["assignedTo"].is_null());

    let (status, body) = send(&app, "GET", "/projects/personal", Some(&charles.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["title"], "Gears");
}
