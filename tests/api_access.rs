use anyhow::Result;
use axum::http::{Method, StatusCode};
use hr_tests::{TestApp, ids};
use serde_json::json;

#[tokio::test]
async fn health_needs_no_token() -> Result<()> {
    let app = TestApp::seeded().await?;
    let (status, body) = app.send(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["db_ok"], json!(true));
    Ok(())
}

#[tokio::test]
async fn api_requires_a_valid_bearer_token() -> Result<()> {
    let app = TestApp::seeded().await?;
    let (status, body) = app.send(Method::GET, "/api/employees", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/api/employees", "not-a-jwt").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "manager1", "password": "wrong" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_role_claim_is_forbidden() -> Result<()> {
    let app = TestApp::seeded().await?;
    let token = app.forge_token(3, 3, "Owner")?;
    let (status, body) = app.get("/api/employees", &token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn employee_directory_follows_the_hierarchy() -> Result<()> {
    let app = TestApp::seeded().await?;
    let hr = app.login("hradmin1").await?;
    let manager = app.login("manager1").await?;
    let employee = app.login("employee1").await?;

    let (_, all) = app.get("/api/employees", &hr).await?;
    assert_eq!(ids(&all), vec![1, 2, 3, 4]);
    let (_, team) = app.get("/api/employees", &manager).await?;
    assert_eq!(ids(&team), vec![1, 2, 4]);
    let (_, me) = app.get("/api/employees", &employee).await?;
    assert_eq!(ids(&me), vec![1]);

    let (status, _) = app.get("/api/employees/3", &manager).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.get("/api/employees/4", &manager).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Dan");
    let (status, _) = app.get("/api/employees/2", &employee).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/employees/999", &hr).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn employee_writes_are_gated_by_role_and_reach() -> Result<()> {
    let app = TestApp::seeded().await?;
    let hr = app.login("hradmin1").await?;
    let manager = app.login("manager1").await?;
    let new_hire = json!({
        "firstName": "Eve",
        "lastName": "Stone",
        "email": "eve@company.test",
        "role": "Designer",
        "managerId": 2
    });

    let (status, _) = app
        .send(Method::POST, "/api/employees", Some(&manager), Some(new_hire.clone()))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, created) = app
        .send(Method::POST, "/api/employees", Some(&hr), Some(new_hire))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let eve = created["id"].as_i64().unwrap_or_default();

    let edit = json!({
        "firstName": "Eve",
        "lastName": "Stone-Rivers",
        "email": "eve@company.test",
        "role": "Senior Designer",
        "managerId": 2
    });
    let (status, body) = app
        .send(Method::PUT, &format!("/api/employees/{eve}"), Some(&manager), Some(edit.clone()))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "Senior Designer");

    let (status, _) = app
        .send(Method::PUT, "/api/employees/3", Some(&manager), Some(edit))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/employees/{eve}"), Some(&manager), None)
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/employees/{eve}"), Some(&hr), None)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn goals_and_reviews_are_scoped() -> Result<()> {
    let app = TestApp::seeded().await?;
    let manager = app.login("manager1").await?;
    let employee = app.login("employee1").await?;

    let (_, goals) = app.get("/api/goals", &employee).await?;
    let owners: Vec<_> = goals
        .as_array()
        .into_iter()
        .flatten()
        .map(|g| g["employeeId"].as_i64())
        .collect();
    assert_eq!(owners, vec![Some(1)]);

    let dan_goal = app
        .org
        .goal_titled("Automate regression suite")
        .map(|g| g.id)
        .unwrap_or_default();
    let (status, _) = app.get(&format!("/api/goals/{dan_goal}"), &employee).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/api/goals/{dan_goal}"), &manager).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, reviews) = app.get("/api/reviews", &employee).await?;
    assert_eq!(reviews.as_array().map(Vec::len), Some(1));
    let (_, by_reviewee) = app.get("/api/reviews/reviewee/4", &employee).await?;
    assert_eq!(by_reviewee.as_array().map(Vec::len), Some(0));
    let (_, by_reviewee) = app.get("/api/reviews/reviewee/4", &manager).await?;
    assert_eq!(by_reviewee.as_array().map(Vec::len), Some(1));

    let (status, _) = app
        .send(
            Method::POST,
            "/api/reviews",
            Some(&employee),
            Some(json!({ "cycleId": 1, "templateId": 1, "reviewerId": 1, "revieweeId": 1, "rating": 4 })),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, created) = app
        .send(
            Method::POST,
            "/api/reviews",
            Some(&manager),
            Some(json!({ "cycleId": 2, "templateId": 1, "reviewerId": 2, "revieweeId": 4, "rating": 4 })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let review = created["id"].as_i64().unwrap_or_default();

    let (status, locked) = app
        .send(Method::PATCH, &format!("/api/reviews/{review}/lock"), Some(&manager), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(locked["isLocked"], true);
    Ok(())
}

#[tokio::test]
async fn analytics_and_departments_by_tier() -> Result<()> {
    let app = TestApp::seeded().await?;
    let hr = app.login("hradmin1").await?;
    let manager = app.login("manager1").await?;
    let employee = app.login("employee1").await?;

    let (status, _) = app.get("/api/analytics/summary", &employee).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, summary) = app.get("/api/analytics/summary", &manager).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["employeeCount"], 3);
    let (status, _) = app.get("/api/analytics/departments", &manager).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/analytics/departments", &hr).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, departments) = app.get("/api/departments", &employee).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(departments.as_array().map(Vec::len), Some(2));
    let (status, _) = app
        .send(
            Method::POST,
            "/api/departments",
            Some(&manager),
            Some(json!({ "name": "Finance" })),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(
            Method::POST,
            "/api/departments",
            Some(&hr),
            Some(json!({ "name": "Finance" })),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn registration_is_hr_only_and_profile_reflects_login() -> Result<()> {
    let app = TestApp::seeded().await?;
    let hr = app.login("hradmin1").await?;
    let manager = app.login("manager1").await?;
    let request = json!({
        "username": "dan",
        "password": "dan-password",
        "role": "Employee",
        "employeeId": 4
    });

    let (status, _) = app
        .send(Method::POST, "/api/auth/register", Some(&manager), Some(request.clone()))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(Method::POST, "/api/auth/register", Some(&hr), Some(request))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, profile) = app.get("/api/auth/profile", &manager).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "manager1");
    assert_eq!(profile["role"], "Manager");
    assert_eq!(profile["employee"]["id"], 2);
    Ok(())
}

#[tokio::test]
async fn review_edits_and_catalog_references() -> Result<()> {
    let app = TestApp::seeded().await?;
    let manager = app.login("manager1").await?;
    let employee = app.login("employee1").await?;
    let alice_review = app.org.review_of(1).map(|r| r.id).unwrap_or_default();

    let edit = json!({ "cycleId": 1, "templateId": 1, "reviewerId": 2, "revieweeId": 1, "rating": 5 });
    let (status, _) = app
        .send(Method::PUT, &format!("/api/reviews/{alice_review}"), Some(&employee), Some(edit))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reviews",
            Some(&manager),
            Some(json!({ "cycleId": 9999, "templateId": 1, "reviewerId": 2, "revieweeId": 1, "rating": 4 })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, review) = app.get(&format!("/api/reviews/{alice_review}"), &employee).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review["rating"], 4);
    assert_eq!(review["cycle"]["name"], "Q1 2025");
    assert_eq!(review["template"]["name"], "Annual Performance Review");

    let (status, cycles) = app.get("/api/review-cycles", &employee).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cycles.as_array().map(Vec::len), Some(3));
    let (_, templates) = app.get("/api/review-templates", &employee).await?;
    assert_eq!(templates.as_array().map(Vec::len), Some(3));
    Ok(())
}
